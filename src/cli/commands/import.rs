//! Import command implementation.

use anyhow::{Context, Result};
use pack_lib::Transcoder;
use std::path::Path;

use crate::config::Config;

/// Execute the import: portable JSON -> freshly rebuilt pack store.
///
/// Returns the summary line to print.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or the store cannot be
/// rebuilt.
pub fn execute(json_path: &Path, store_path: &Path, config: &Config) -> Result<String> {
    let mut transcoder = Transcoder::with_settings(config.settings());
    let summary = transcoder.import(json_path, store_path).with_context(|| {
        format!(
            "Import of {} into {} failed",
            json_path.display(),
            store_path.display()
        )
    })?;

    Ok(format!(
        "Imported {} folders, {} items into {}",
        summary.folders,
        summary.items,
        store_path.display()
    ))
}
