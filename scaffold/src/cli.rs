//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::materialize;
use crate::prune;
use crate::template;
use crate::vars::{Flag, FlagSet, TemplateVars, derive_package_name};

/// Options for `scaffold new`.
#[derive(Debug, Clone, Default)]
pub struct NewOptions {
    pub name: Option<String>,
    pub package_name: Option<String>,
    pub flags: FlagSet,
    pub force: bool,
}

/// Generate a project skeleton at `dest`.
pub fn new_project(dest: &Path, options: &NewOptions) -> Result<()> {
    let vars = resolve_vars(dest, options)?;
    info!(
        project = %vars.project_name,
        package = %vars.package_name,
        "generating project"
    );

    let files = template::render(&vars).context("render templates")?;
    let written = materialize::materialize(dest, &files, options.force)?;
    debug!(files = written.len(), "materialized");

    let rules = prune::default_rules(&vars.package_name);
    let pruned = prune::prune(dest, &vars.flags, &rules)?;
    for path in &pruned {
        println!("pruned: {}", path.display());
    }

    materialize::write_manifest(dest, &vars, &written, &pruned)?;
    println!(
        "new: project={} package={} files={} pruned={} dest={}",
        vars.project_name,
        vars.package_name,
        written.len() - pruned_file_count(&written, &pruned),
        pruned.len(),
        dest.display()
    );
    Ok(())
}

/// List template entries and their owning flags.
pub fn list_templates() -> Result<()> {
    for file in template::template_set() {
        let owner = file.flag.map_or("always", Flag::as_str);
        println!("{}  [{}]", file.path, owner);
    }
    Ok(())
}

/// Re-run the prune pass against an existing project.
///
/// Flags come from the generation manifest, so a second invocation is a
/// no-op by construction.
pub fn prune_tree(dest: &Path) -> Result<()> {
    let manifest = materialize::read_manifest(dest)?;
    let rules = prune::default_rules(&manifest.package_name);
    let pruned = prune::prune(dest, &manifest.flags, &rules)?;
    if pruned.is_empty() {
        println!("prune: nothing to remove");
        return Ok(());
    }
    for path in &pruned {
        println!("pruned: {}", path.display());
    }
    Ok(())
}

fn resolve_vars(dest: &Path, options: &NewOptions) -> Result<TemplateVars> {
    let project_name = match &options.name {
        Some(name) => name.clone(),
        None => match dest.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => bail!("cannot derive a project name from {}", dest.display()),
        },
    };
    let package_name = options
        .package_name
        .clone()
        .unwrap_or_else(|| derive_package_name(&project_name));
    let vars = TemplateVars {
        project_name,
        package_name,
        flags: options.flags,
    };
    vars.validate()?;
    Ok(vars)
}

fn pruned_file_count(written: &[std::path::PathBuf], pruned: &[std::path::PathBuf]) -> usize {
    written
        .iter()
        .filter(|rel| pruned.iter().any(|removed| rel.starts_with(removed)))
        .count()
}
