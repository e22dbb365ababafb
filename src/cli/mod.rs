//! Command-line interface for `pack_tool`.
//!
//! This module provides the CLI parsing and mode routing using clap.

pub mod commands;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::config::Config;
use crate::logging;

/// `pack_tool` (pack-tool) - Compendium pack import/export.
#[derive(Parser, Debug)]
#[command(name = "pack-tool")]
#[command(
    version,
    about = "Convert compendium packs between LevelDB stores and portable JSON",
    long_about = None,
    after_help = "Import is a full rebuild: the existing pack store is replaced."
)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["import", "export"])
))]
pub struct Cli {
    /// Rebuild the pack store from the JSON document
    #[arg(long)]
    pub import: bool,

    /// Write the pack store out as a JSON document
    #[arg(long)]
    pub export: bool,

    /// Portable JSON document path
    #[arg(long, value_name = "PATH")]
    pub json: PathBuf,

    /// Pack name, resolved inside the packs directory
    #[arg(long, value_name = "NAME")]
    pub pack: String,
}

/// Transcoding direction selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Import,
    Export,
}

impl Cli {
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.import { Mode::Import } else { Mode::Export }
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the selected
/// pipeline fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging().map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let workdir = std::env::current_dir().context("Cannot determine working directory")?;
    let config = Config::load(&workdir)?;
    execute(&cli, &config)
}

/// Dispatch a parsed command line against a loaded config.
///
/// # Errors
///
/// Returns the pipeline error with the pack and document paths as context.
pub fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let store_path = config.store_path(&cli.pack);
    let line = match cli.mode() {
        Mode::Export => commands::export::execute(&store_path, &cli.json, config)?,
        Mode::Import => commands::import::execute(&cli.json, &store_path, config)?,
    };
    println!("{line}");
    Ok(())
}
