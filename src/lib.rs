//! `pack_tool` - Compendium pack import/export
//!
//! This crate provides the `pack-tool` CLI on top of [`pack_lib`].
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration management (YAML file + environment)
//! - [`logging`] - `tracing` subscriber setup
//!
//! The store adapter and the transcoding pipelines live in `pack-lib`.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod logging;

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if configuration or the selected pipeline fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
