//! Import pipeline: portable document -> store.
//!
//! Import is a full rebuild. Records are synthesized with fresh ids and one
//! shared timestamp, committed into a staging store next to the target, and
//! only then swapped into place. A failure before the swap leaves the old
//! store untouched.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Map;

use super::Transcoder;
use crate::error::{PackError, Result};
use crate::model::{
    FOLDER_DOCUMENT_TYPE, FolderDocument, ItemDocument, Namespace, Ownership, PortablePack, Record,
    RecordKey,
};
use crate::portable;
use crate::store::{self, PackStore};
use crate::util::{Clock, IdGenerator, unique_id};

/// Counters reported by one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub folders: usize,
    pub items: usize,
    /// Items whose folder name matched no folder in the document.
    pub unresolved_folder_refs: usize,
}

impl<G: IdGenerator, C: Clock> Transcoder<G, C> {
    /// Rebuild the store at `store_path` from the document at `json_path`.
    ///
    /// Any existing store at `store_path` is replaced; none of its records
    /// survive.
    ///
    /// # Errors
    ///
    /// Returns `Io`/`InputParse` if the document cannot be read (the existing
    /// store is untouched), or `StoreOpen`/`StoreWrite` if the rebuild fails.
    pub fn import(&mut self, json_path: &Path, store_path: &Path) -> Result<ImportSummary> {
        tracing::info!(
            json = %json_path.display(),
            store = %store_path.display(),
            "Importing pack"
        );
        let pack = portable::load(json_path)?;
        let (records, summary) = self.build_records(&pack)?;

        let staging = sibling_path(store_path, "staging");
        stage_records(&staging, &records)?;
        swap_into_place(&staging, store_path)?;

        tracing::info!(
            folders = summary.folders,
            items = summary.items,
            "Import complete"
        );
        Ok(summary)
    }

    /// Synthesize the full set of store records for a portable document.
    ///
    /// Every folder gets its id before any item is processed, so item
    /// folder names resolve against a complete mapping.
    ///
    /// # Errors
    ///
    /// Returns `IdExhausted` if the id generator cannot produce unique ids,
    /// or `Json` if a document cannot be serialized.
    pub fn build_records(&mut self, pack: &PortablePack) -> Result<(Vec<Record>, ImportSummary)> {
        let stats = self.settings.stats(self.clock.now_millis());
        let mut summary = ImportSummary::default();
        let mut records = Vec::with_capacity(pack.folders.len() + pack.items.len());

        let mut taken = HashSet::new();
        let mut folder_ids: HashMap<&str, String> = HashMap::with_capacity(pack.folders.len());
        for name in pack.folders.keys() {
            let id = unique_id(&mut self.ids, &mut taken, Namespace::Folders)?;
            folder_ids.insert(name.as_str(), id);
        }

        for (name, folder) in &pack.folders {
            let id = folder_ids[name.as_str()].clone();
            let document = FolderDocument {
                name: name.clone(),
                id: id.clone(),
                folder_type: FOLDER_DOCUMENT_TYPE.to_string(),
                sorting: folder.sorting.clone(),
                sort: 0,
                color: folder.color.clone(),
                flags: Map::new(),
                stats: stats.clone(),
            };
            records.push(Record::from_document(
                &RecordKey::new(Namespace::Folders, id),
                &document,
            )?);
            summary.folders += 1;
        }

        let mut taken = HashSet::new();
        for (name, item) in &pack.items {
            let id = unique_id(&mut self.ids, &mut taken, Namespace::Items)?;
            let folder = item.folder.as_deref().and_then(|folder_name| {
                let resolved = folder_ids.get(folder_name).cloned();
                if resolved.is_none() {
                    tracing::warn!(
                        item = %name,
                        folder = folder_name,
                        "Item references an unknown folder; importing without folder"
                    );
                    summary.unresolved_folder_refs += 1;
                }
                resolved
            });

            let document = ItemDocument {
                name: name.clone(),
                item_type: item.item_type.clone(),
                id: id.clone(),
                img: self.settings.item_img.clone(),
                system: item.system.clone(),
                effects: Vec::new(),
                folder,
                sort: 0,
                ownership: Ownership::default(),
                flags: Map::new(),
                stats: stats.clone(),
            };
            records.push(Record::from_document(
                &RecordKey::new(Namespace::Items, id),
                &document,
            )?);
            summary.items += 1;
        }

        Ok((records, summary))
    }
}

fn write_store(path: &Path, records: &[Record]) -> Result<()> {
    let mut store = PackStore::open_for_write(path)?;
    store.write_batch(records)?;
    store.close()
}

/// Commit `records` into a fresh store at `staging`. On failure nothing is
/// left at `staging`.
fn stage_records(staging: &Path, records: &[Record]) -> Result<()> {
    store::remove_store(staging)?;
    write_store(staging, records).inspect_err(|_| {
        let _ = store::remove_store(staging);
    })
}

/// Replace `target` with the committed `staging` store.
///
/// The old store is parked at `<target>.previous` during the swap and put
/// back if the final rename fails. Any failure removes `staging`.
fn swap_into_place(staging: &Path, target: &Path) -> Result<()> {
    let previous = sibling_path(target, "previous");
    let had_previous = park_previous(target, &previous).inspect_err(|_| {
        let _ = store::remove_store(staging);
    })?;

    if let Err(e) = fs::rename(staging, target) {
        if had_previous {
            let _ = fs::rename(&previous, target);
        }
        let _ = store::remove_store(staging);
        return Err(PackError::store_write(target, e));
    }

    if had_previous {
        store::remove_store(&previous)?;
    }
    Ok(())
}

/// Move an existing `target` aside to `previous`. Returns whether there was
/// anything to move.
fn park_previous(target: &Path, previous: &Path) -> Result<bool> {
    store::remove_store(previous)?;
    if fs::symlink_metadata(target).is_err() {
        return Ok(false);
    }
    fs::rename(target, previous).map_err(|e| PackError::store_write(target, e))?;
    Ok(true)
}

/// `packs/items` + `staging` -> `packs/items.staging`.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
