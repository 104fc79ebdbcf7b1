//! Python project skeleton generator.
//!
//! Materializes an embedded template set (CLI, API, and AI/ML research
//! subsystems) into a destination directory, then prunes the paths owned by
//! disabled feature flags and records a generation manifest.

mod cli;
mod logging;
mod materialize;
mod prune;
mod template;
mod vars;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::vars::FlagSet;

#[derive(Parser)]
#[command(name = "scaffold", version, about = "Python project skeleton generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a project skeleton at the destination.
    New {
        dest: PathBuf,
        /// Project display name (defaults to the destination directory name).
        #[arg(long)]
        name: Option<String>,
        /// Python package name (defaults to a slug of the project name).
        #[arg(long)]
        package_name: Option<String>,
        /// Skip the argparse CLI stub.
        #[arg(long)]
        no_cli: bool,
        /// Skip the FastAPI stub and serving scripts.
        #[arg(long)]
        no_api: bool,
        /// Skip the AI/ML research layout (data, notebooks, experiments).
        #[arg(long)]
        no_ai_research: bool,
        /// Write into a non-empty destination.
        #[arg(long)]
        force: bool,
    },
    /// List template files and their owning flags.
    List,
    /// Re-run the cleanup pass using the flags recorded in the manifest.
    Prune { dest: PathBuf },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::New {
            dest,
            name,
            package_name,
            no_cli,
            no_api,
            no_ai_research,
            force,
        } => {
            let options = cli::NewOptions {
                name,
                package_name,
                flags: FlagSet {
                    include_cli: !no_cli,
                    include_api: !no_api,
                    include_ai_research: !no_ai_research,
                },
                force,
            };
            cli::new_project(&dest, &options)
        }
        Command::List => cli::list_templates(),
        Command::Prune { dest } => cli::prune_tree(&dest),
    }
}
