//! Export command implementation.

use anyhow::{Context, Result};
use pack_lib::Transcoder;
use std::path::Path;

use crate::config::Config;

/// Execute the export: pack store -> portable JSON.
///
/// Returns the summary line to print.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the document cannot be
/// written.
pub fn execute(store_path: &Path, json_path: &Path, config: &Config) -> Result<String> {
    let transcoder = Transcoder::with_settings(config.settings());
    let summary = transcoder.export(store_path, json_path).with_context(|| {
        format!(
            "Export of {} to {} failed",
            store_path.display(),
            json_path.display()
        )
    })?;

    if summary.skipped_folders > 0 {
        tracing::warn!(
            count = summary.skipped_folders,
            "Skipped folders without _id or name"
        );
    }

    Ok(format!(
        "Exported {} folders, {} items to {}",
        summary.folders,
        summary.items,
        json_path.display()
    ))
}
