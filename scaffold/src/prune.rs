//! Conditional cleanup of a freshly materialized project tree.
//!
//! Every template entry is written to disk first; this pass then removes the
//! paths owned by disabled flags. Missing paths are skipped, so re-running
//! against an already pruned tree is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::vars::{Flag, FlagSet};

/// Paths owned by one feature flag, removed when that flag is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneRule {
    pub flag: Flag,
    /// Paths relative to the project root, in removal order.
    pub paths: Vec<PathBuf>,
}

/// Rule table matching the embedded template set.
pub fn default_rules(package_name: &str) -> Vec<PruneRule> {
    let pkg = Path::new("src").join(package_name);
    vec![
        PruneRule {
            flag: Flag::IncludeAiResearch,
            paths: vec![
                PathBuf::from("data"),
                PathBuf::from("experiments"),
                PathBuf::from("notebooks"),
                PathBuf::from("reports"),
                PathBuf::from("run_pipeline.py"),
                pkg.join("experiments.py"),
                PathBuf::from("tests/test_models.py"),
                PathBuf::from("tests/test_train.py"),
            ],
        },
        PruneRule {
            flag: Flag::IncludeApi,
            paths: vec![
                PathBuf::from("scripts"),
                pkg.join("api"),
                PathBuf::from("tests/test_api.py"),
            ],
        },
        PruneRule {
            flag: Flag::IncludeCli,
            paths: vec![pkg.join("cli.py"), PathBuf::from("tests/test_cli.py")],
        },
    ]
}

/// Remove every path whose owning flag is off.
///
/// Returns the actually-removed paths (relative to `root`) in removal order.
/// The first removal error aborts the pass; earlier removals stand.
pub fn prune(root: &Path, flags: &FlagSet, rules: &[PruneRule]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for rule in rules {
        if flags.enabled(rule.flag) {
            continue;
        }
        for rel in &rule.paths {
            let target = root.join(rel);
            if remove_if_exists(&target)? {
                debug!(flag = rule.flag.as_str(), path = %rel.display(), "removed");
                removed.push(rel.clone());
            }
        }
    }
    Ok(removed)
}

fn remove_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if path.is_dir() {
        fs::remove_dir_all(path).with_context(|| format!("remove {}", path.display()))?;
    } else {
        fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, "x").expect("write file");
    }

    fn flags(cli: bool, api: bool, ai: bool) -> FlagSet {
        FlagSet {
            include_cli: cli,
            include_api: api,
            include_ai_research: ai,
        }
    }

    #[test]
    fn keeps_everything_when_all_flags_on() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "src/demo/cli.py");
        touch(temp.path(), "src/demo/api/app.py");
        touch(temp.path(), "data/.gitkeep");

        let removed = prune(temp.path(), &flags(true, true, true), &default_rules("demo"))
            .expect("prune");
        assert!(removed.is_empty());
        assert!(temp.path().join("src/demo/cli.py").exists());
        assert!(temp.path().join("data/.gitkeep").exists());
    }

    #[test]
    fn removes_paths_for_disabled_flags() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "src/demo/cli.py");
        touch(temp.path(), "tests/test_cli.py");
        touch(temp.path(), "src/demo/api/app.py");

        let removed = prune(temp.path(), &flags(false, true, true), &default_rules("demo"))
            .expect("prune");
        assert_eq!(
            removed,
            vec![
                PathBuf::from("src/demo/cli.py"),
                PathBuf::from("tests/test_cli.py")
            ]
        );
        assert!(!temp.path().join("src/demo/cli.py").exists());
        assert!(temp.path().join("src/demo/api/app.py").exists());
    }

    #[test]
    fn directories_are_removed_recursively() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "src/demo/api/__init__.py");
        touch(temp.path(), "src/demo/api/app.py");
        touch(temp.path(), "scripts/serve.sh");

        prune(temp.path(), &flags(true, false, true), &default_rules("demo"))
            .expect("prune");
        assert!(!temp.path().join("src/demo/api").exists());
        assert!(!temp.path().join("scripts").exists());
        assert!(temp.path().join("src/demo").exists());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "src/demo/cli.py");
        touch(temp.path(), "data/raw.csv");

        let rules = default_rules("demo");
        let set = flags(false, true, false);
        let first = prune(temp.path(), &set, &rules).expect("first pass");
        assert!(!first.is_empty());

        let second = prune(temp.path(), &set, &rules).expect("second pass");
        assert!(second.is_empty());
    }

    #[test]
    fn partial_trees_prune_cleanly() {
        // Nothing materialized at all: every rule path is missing.
        let temp = tempdir().expect("tempdir");
        let removed = prune(
            temp.path(),
            &flags(false, false, false),
            &default_rules("demo"),
        )
        .expect("prune");
        assert!(removed.is_empty());
    }

    #[test]
    fn end_to_end_flag_table() {
        // include_cli=false, include_api=true, include_ai_research=false
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "cli_file");
        touch(temp.path(), "api_dir/app.py");
        touch(temp.path(), "data_dir/raw.csv");
        touch(temp.path(), "experiments_dir/.gitkeep");

        let rules = vec![
            PruneRule {
                flag: Flag::IncludeCli,
                paths: vec![PathBuf::from("cli_file")],
            },
            PruneRule {
                flag: Flag::IncludeApi,
                paths: vec![PathBuf::from("api_dir")],
            },
            PruneRule {
                flag: Flag::IncludeAiResearch,
                paths: vec![PathBuf::from("data_dir"), PathBuf::from("experiments_dir")],
            },
        ];
        let removed = prune(temp.path(), &flags(false, true, false), &rules).expect("prune");
        assert_eq!(
            removed,
            vec![
                PathBuf::from("cli_file"),
                PathBuf::from("data_dir"),
                PathBuf::from("experiments_dir")
            ]
        );
        assert!(temp.path().join("api_dir/app.py").exists());
    }

    #[test]
    fn overlapping_rule_paths_are_safe() {
        // A child of an already-removed directory is silently skipped.
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "data_dir/nested/file.txt");

        let rules = vec![PruneRule {
            flag: Flag::IncludeAiResearch,
            paths: vec![
                PathBuf::from("data_dir"),
                PathBuf::from("data_dir/nested/file.txt"),
            ],
        }];
        let removed = prune(temp.path(), &flags(true, true, false), &rules).expect("prune");
        assert_eq!(removed, vec![PathBuf::from("data_dir")]);
    }
}
