//! LevelDB-backed pack store.
//!
//! Thin adapter over `rusty-leveldb`: full ordered scans for export, one
//! atomic write batch for import. A `PackStore` owns its database handle;
//! `close()` consumes it and `Drop` releases it on early-exit paths.

use std::fs;
use std::path::{Path, PathBuf};

use rusty_leveldb::{DB, LdbIterator, Options, WriteBatch};

use crate::error::{PackError, Result};
use crate::model::{Namespace, Record};

/// An open pack store.
pub struct PackStore {
    db: DB,
    path: PathBuf,
}

impl std::fmt::Debug for PackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackStore").field("path", &self.path).finish()
    }
}

impl PackStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open an existing store. Never creates one.
    ///
    /// # Errors
    ///
    /// Returns `StoreOpen` if the path does not exist or is not a store.
    pub fn open_for_read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(PackError::store_open(path, "no pack store at this path"));
        }
        let opt = Options {
            create_if_missing: false,
            ..Options::default()
        };
        let db = DB::open(path, opt).map_err(|e| PackError::store_open(path, e))?;
        tracing::debug!(path = %path.display(), "Opened pack store for read");
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Open a store for writing, creating it (and missing parents) if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreOpen` if the directory cannot be created or the
    /// database cannot be opened.
    pub fn open_for_write(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PackError::store_open(path, e))?;
        }
        let opt = Options {
            create_if_missing: true,
            ..Options::default()
        };
        let db = DB::open(path, opt).map_err(|e| PackError::store_open(path, e))?;
        tracing::debug!(path = %path.display(), "Opened pack store for write");
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Flush and release the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreWrite` if pending writes cannot be flushed.
    pub fn close(mut self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| PackError::store_write(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "Closed pack store");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All records in store key order.
    ///
    /// # Errors
    ///
    /// Returns `StoreOpen` if the iterator cannot be created, or
    /// `MalformedRecord` if a key is not UTF-8.
    pub fn records(&mut self) -> Result<Vec<Record>> {
        let mut iter = self
            .db
            .new_iter()
            .map_err(|e| PackError::store_open(&self.path, e))?;

        let mut records = Vec::new();
        let (mut key, mut value) = (Vec::new(), Vec::new());
        while iter.advance() {
            if !iter.current(&mut key, &mut value) {
                break;
            }
            let key = String::from_utf8(key.clone())
                .map_err(|e| PackError::malformed(String::from_utf8_lossy(&key), e))?;
            records.push(Record::new(key, value.clone()));
        }
        Ok(records)
    }

    /// One full scan, keeping only records in `namespace`.
    ///
    /// # Errors
    ///
    /// See [`PackStore::records`].
    pub fn scan(&mut self, namespace: Namespace) -> Result<Vec<Record>> {
        let mut records = self.records()?;
        records.retain(|record| record.key.starts_with(namespace.prefix()));
        Ok(records)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Apply all records as one synced, atomic batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreWrite` if the commit fails; none of the records are
    /// visible in that case.
    pub fn write_batch(&mut self, records: &[Record]) -> Result<()> {
        let mut batch = WriteBatch::new();
        for record in records {
            batch.put(record.key.as_bytes(), &record.value);
        }
        self.db
            .write(batch, true)
            .map_err(|e| PackError::store_write(&self.path, e))?;
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "Committed write batch"
        );
        Ok(())
    }
}

/// Recursively delete a store directory. Absent paths (including ones
/// under a regular file) are not an error; a stray file at the path is
/// removed as well.
///
/// # Errors
///
/// Returns `Io` if the path exists but cannot be removed.
pub fn remove_store(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
            ) =>
        {
            return Ok(());
        }
        Err(e) => return Err(PackError::Io(e)),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    tracing::debug!(path = %path.display(), "Removed pack store");
    Ok(())
}
