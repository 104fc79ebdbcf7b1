//! Project tree materialization and the generation manifest.
//!
//! Writes rendered templates under the destination root, then records what
//! was generated in `.scaffold/manifest.json`: variables, flags, a SHA-256
//! per surviving file, and the paths removed by the prune pass.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::template::RenderedFile;
use crate::vars::{FlagSet, TemplateVars};

/// Manifest path relative to the project root.
pub const MANIFEST_REL: &str = ".scaffold/manifest.json";

/// Record of one generation pass, persisted to `.scaffold/manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub project_name: String,
    pub package_name: String,
    pub flags: FlagSet,
    /// RFC 3339 generation instant.
    pub created_at: String,
    /// Relative path -> SHA-256 of contents, for every file that survived
    /// the prune pass.
    pub files: BTreeMap<String, String>,
    /// Paths removed by the prune pass, in removal order.
    pub pruned: Vec<String>,
}

/// Write rendered files under `root`, creating parent directories.
///
/// Refuses a non-empty destination unless `force` is set. Returns the
/// written paths (relative to `root`) in write order.
pub fn materialize(root: &Path, files: &[RenderedFile], force: bool) -> Result<Vec<PathBuf>> {
    if is_non_empty_dir(root)? && !force {
        return Err(anyhow!(
            "destination {} is not empty (use --force to write anyway)",
            root.display()
        ));
    }
    fs::create_dir_all(root).with_context(|| format!("create project root {}", root.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = root.join(&file.relative_path);
        write_file(&target, &file.contents)?;
        written.push(file.relative_path.clone());
    }
    debug!(root = %root.display(), files = written.len(), "project materialized");
    Ok(written)
}

/// Write the generation manifest for a completed pass.
///
/// Hashes every written file that still exists (pruned entries are skipped).
pub fn write_manifest(
    root: &Path,
    vars: &TemplateVars,
    written: &[PathBuf],
    pruned: &[PathBuf],
) -> Result<PathBuf> {
    let mut files = BTreeMap::new();
    for rel in written {
        let path = root.join(rel);
        if !path.exists() {
            continue;
        }
        files.insert(rel.display().to_string(), file_sha256(&path)?);
    }

    let manifest = Manifest {
        project_name: vars.project_name.clone(),
        package_name: vars.package_name.clone(),
        flags: vars.flags,
        created_at: Utc::now().to_rfc3339(),
        files,
        pruned: pruned.iter().map(|rel| rel.display().to_string()).collect(),
    };

    let manifest_path = root.join(MANIFEST_REL);
    let contents = serde_json::to_string_pretty(&manifest).context("serialize manifest")?;
    write_file(&manifest_path, &format!("{contents}\n"))?;
    Ok(manifest_path)
}

/// Load the manifest of a previously generated project.
pub fn read_manifest(root: &Path) -> Result<Manifest> {
    let path = root.join(MANIFEST_REL);
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read manifest {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse manifest {}", path.display()))
}

fn is_non_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries =
        fs::read_dir(path).with_context(|| format!("read {}", path.display()))?;
    Ok(entries.next().is_some())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write file {}", path.display()))
}

fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Ok(hex::encode(hasher.finalize()))
}
