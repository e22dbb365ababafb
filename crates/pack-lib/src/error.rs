//! Error types for `pack-lib`.
//!
//! Every failure in the export and import pipelines is fatal and surfaces
//! as one of these variants. The only tolerated anomalies (folders without
//! `_id`/`name`, unknown folder names) never reach this type.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Namespace;

/// Primary error type for pack-lib operations.
#[derive(Error, Debug)]
pub enum PackError {
    // === Store Errors ===
    /// The store path is missing, inaccessible, or not a LevelDB store.
    #[error("Cannot open pack store at {}: {reason}", .path.display())]
    StoreOpen { path: PathBuf, reason: String },

    /// A stored value is not valid UTF-8 JSON of the expected shape.
    #[error("Malformed record {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    /// The atomic batch commit (or the staging swap around it) failed.
    #[error("Cannot write pack store at {}: {reason}", .path.display())]
    StoreWrite { path: PathBuf, reason: String },

    // === Portable Document Errors ===
    /// The portable JSON document is malformed or has the wrong top-level shape.
    #[error("Cannot parse pack document {}: {reason}", .path.display())]
    InputParse { path: PathBuf, reason: String },

    // === Transcoding Errors ===
    /// Two records in one namespace share a name and the policy forbids it.
    #[error("Duplicate {namespace} name: {name}")]
    DuplicateName { namespace: Namespace, name: String },

    /// The identifier generator kept producing identifiers already in use.
    #[error("Could not generate a unique {namespace} id after {attempts} attempts")]
    IdExhausted { namespace: Namespace, attempts: usize },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PackError {
    #[must_use]
    pub fn store_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StoreOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn store_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StoreWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn malformed(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;
