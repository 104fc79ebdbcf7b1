//! Versioned prompt registry.
//!
//! Prompts live in one human-editable TOML document with two sections
//! (`system_prompts` and `user_templates`). Saving a prompt with an existing
//! id appends a new version rather than replacing the old one, and exports
//! the text to `archive/<id>_v<version>.txt` next to the registry for
//! line-based diffing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Registry section a prompt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRole {
    System,
    UserTemplate,
}

/// One stored prompt version. Entries are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptEntry {
    pub id: String,
    pub version: u32,
    pub description: String,
    pub text: String,
    /// RFC 3339 save instant.
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct RegistryDoc {
    system_prompts: Vec<PromptEntry>,
    user_templates: Vec<PromptEntry>,
}

/// Prompt registry backed by a TOML file.
#[derive(Debug)]
pub struct PromptRegistry {
    path: PathBuf,
    doc: RegistryDoc,
}

impl PromptRegistry {
    /// Load the registry at `path`. A missing file is an empty registry.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read registry {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("parse registry {}", path.display()))?
        } else {
            RegistryDoc::default()
        };
        Ok(Self { path, doc })
    }

    /// Entries in one section, oldest first.
    pub fn entries(&self, role: PromptRole) -> &[PromptEntry] {
        match role {
            PromptRole::System => &self.doc.system_prompts,
            PromptRole::UserTemplate => &self.doc.user_templates,
        }
    }

    /// Store a new version of `id` under `role` and archive its text.
    ///
    /// The version is one past the number of existing entries with that id
    /// in the section.
    pub fn save(
        &mut self,
        role: PromptRole,
        id: &str,
        description: &str,
        text: &str,
    ) -> Result<PromptEntry> {
        if id.trim().is_empty() {
            bail!("prompt id must be non-empty");
        }
        let section = match role {
            PromptRole::System => &mut self.doc.system_prompts,
            PromptRole::UserTemplate => &mut self.doc.user_templates,
        };
        let version = section.iter().filter(|entry| entry.id == id).count() as u32 + 1;
        let entry = PromptEntry {
            id: id.to_string(),
            version,
            description: description.to_string(),
            text: text.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        section.push(entry.clone());

        self.write_back()?;
        self.archive(&entry)?;
        debug!(id, version, "prompt saved");
        Ok(entry)
    }

    fn write_back(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(&self.doc).context("serialize registry")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("write registry {}", self.path.display()))
    }

    fn archive(&self, entry: &PromptEntry) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .join("archive");
        fs::create_dir_all(&dir).with_context(|| format!("create archive {}", dir.display()))?;
        let path = dir.join(format!("{}_v{}.txt", entry.id, entry.version));
        fs::write(&path, &entry.text)
            .with_context(|| format!("write archive {}", path.display()))
    }
}
