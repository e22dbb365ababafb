//! Portable pack document I/O.
//!
//! The document is pretty-printed UTF-8 JSON with names as mapping keys,
//! sorted, so diffs stay small under version control.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{PackError, Result};
use crate::model::PortablePack;

/// Load a portable document.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, or `InputParse` if it is not a
/// JSON object with `folders`/`items` mappings.
pub fn load(path: &Path) -> Result<PortablePack> {
    let bytes = fs::read(path)?;
    parse(path, &bytes)
}

/// Parse portable document bytes; `path` only labels errors.
///
/// # Errors
///
/// Returns `InputParse` on malformed JSON or an unexpected shape.
pub fn parse(path: &Path, bytes: &[u8]) -> Result<PortablePack> {
    serde_json::from_slice(bytes).map_err(|e| PackError::InputParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Save a portable document with an atomic write.
///
/// Output is written to a temporary sibling and renamed into place, so a
/// failure never leaves a half-written document at `path`.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written, or `Json` if serialization fails.
pub fn save(path: &Path, pack: &PortablePack) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let result = write_document(&tmp_path, pack);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return result;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn write_document(path: &Path, pack: &PortablePack) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, pack)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
