//! Template variables and feature flags.
//!
//! A `TemplateVars` is resolved once from CLI input and stays immutable for
//! the rest of the generation pass. Flags select which optional subsystems
//! (CLI stub, FastAPI stub, AI/ML research layout) survive pruning.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Optional subsystem toggled by one template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    IncludeCli,
    IncludeApi,
    IncludeAiResearch,
}

impl Flag {
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::IncludeCli => "include_cli",
            Flag::IncludeApi => "include_api",
            Flag::IncludeAiResearch => "include_ai_research",
        }
    }
}

/// Resolved feature flags for one generation pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlagSet {
    pub include_cli: bool,
    pub include_api: bool,
    pub include_ai_research: bool,
}

impl Default for FlagSet {
    fn default() -> Self {
        Self {
            include_cli: true,
            include_api: true,
            include_ai_research: true,
        }
    }
}

impl FlagSet {
    pub fn enabled(&self, flag: Flag) -> bool {
        match flag {
            Flag::IncludeCli => self.include_cli,
            Flag::IncludeApi => self.include_api,
            Flag::IncludeAiResearch => self.include_ai_research,
        }
    }
}

/// Variables available to every template file and templated path.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateVars {
    /// Human-readable project name (README, pyproject metadata).
    pub project_name: String,
    /// Python package name under `src/` (slug format: `[a-z0-9_]+`).
    pub package_name: String,
    #[serde(flatten)]
    pub flags: FlagSet,
}

impl TemplateVars {
    pub fn validate(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            bail!("project name must be non-empty");
        }
        validate_package_name(&self.package_name)?;
        Ok(())
    }
}

/// Derive a valid package name from a project name.
///
/// Lowercases, maps separators to underscores, and drops anything outside
/// `[a-z0-9_]`. A leading digit gets a `p` prefix.
pub fn derive_package_name(project_name: &str) -> String {
    let mut name = String::with_capacity(project_name.len());
    for ch in project_name.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            name.push(ch);
        } else if matches!(ch, '_' | '-' | ' ' | '.') && !name.ends_with('_') && !name.is_empty() {
            name.push('_');
        }
    }
    let name = name.trim_end_matches('_').to_string();
    if name.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
        format!("p{name}")
    } else {
        name
    }
}

fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("package name must be non-empty");
    }
    if name.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
        bail!("package name must not start with a digit");
    }
    if !name
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
    {
        bail!("package name must use [a-z0-9_] only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(package_name: &str) -> TemplateVars {
        TemplateVars {
            project_name: "My Project".to_string(),
            package_name: package_name.to_string(),
            flags: FlagSet::default(),
        }
    }

    #[test]
    fn accepts_valid_package_name() {
        vars("my_project2").validate().expect("valid");
    }

    #[test]
    fn rejects_bad_package_names() {
        assert!(vars("").validate().is_err());
        assert!(vars("2fast").validate().is_err());
        assert!(vars("My-Project").validate().is_err());
        assert!(vars("pkg/name").validate().is_err());
    }

    #[test]
    fn rejects_blank_project_name() {
        let mut bad = vars("pkg");
        bad.project_name = "  ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn derives_slug_from_display_name() {
        assert_eq!(derive_package_name("My ML Project"), "my_ml_project");
        assert_eq!(derive_package_name("demo-app.v2"), "demo_app_v2");
        assert_eq!(derive_package_name("2fast"), "p2fast");
    }

    #[test]
    fn default_flags_are_all_on() {
        let flags = FlagSet::default();
        assert!(flags.enabled(Flag::IncludeCli));
        assert!(flags.enabled(Flag::IncludeApi));
        assert!(flags.enabled(Flag::IncludeAiResearch));
    }
}
