//! Export pipeline: store -> portable document.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::de::DeserializeOwned;

use super::{DuplicatePolicy, Transcoder};
use crate::error::{PackError, Result};
use crate::model::{
    DEFAULT_SORTING, Namespace, PortableFolder, PortableItem, PortablePack, Record, RecordKey,
    StoredFolder, StoredItem,
};
use crate::portable;
use crate::store::PackStore;

/// Counters reported by one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub folders: usize,
    pub items: usize,
    /// Folder records without `_id` or `name`.
    pub skipped_folders: usize,
    /// Items whose folder id matched no exported folder.
    pub unresolved_folder_refs: usize,
    /// Records dropped because a later record had the same name.
    pub duplicate_names: usize,
}

impl<G, C> Transcoder<G, C> {
    /// Export the store at `store_path` to the portable document at `json_path`.
    ///
    /// The output file is only written once the whole store has been read.
    ///
    /// # Errors
    ///
    /// Returns `StoreOpen` if the store cannot be opened, `MalformedRecord`
    /// if a value is not valid JSON, `DuplicateName` under the strict
    /// policy, or `Io` if the document cannot be written.
    pub fn export(&self, store_path: &Path, json_path: &Path) -> Result<ExportSummary> {
        tracing::info!(
            store = %store_path.display(),
            json = %json_path.display(),
            "Exporting pack"
        );
        let mut store = PackStore::open_for_read(store_path)?;
        let (pack, summary) = self.export_document(&mut store)?;
        store.close()?;

        portable::save(json_path, &pack)?;
        tracing::info!(
            folders = summary.folders,
            items = summary.items,
            "Export complete"
        );
        Ok(summary)
    }

    /// Read an open store into a portable document.
    ///
    /// Folders are scanned first so item folder ids can be resolved to
    /// names regardless of physical record order.
    ///
    /// # Errors
    ///
    /// See [`Transcoder::export`].
    pub fn export_document(&self, store: &mut PackStore) -> Result<(PortablePack, ExportSummary)> {
        let policy = self.settings.duplicate_names;
        let mut pack = PortablePack::default();
        let mut summary = ExportSummary::default();

        // Pass 1: folders
        let mut folder_names: HashMap<String, String> = HashMap::new();
        for record in store.scan(Namespace::Folders)? {
            let folder: StoredFolder = parse_record(&record)?;
            let (Some(id), Some(name)) = (folder.id, folder.name) else {
                tracing::debug!(key = %record.key, "Skipping folder without _id or name");
                summary.skipped_folders += 1;
                continue;
            };

            folder_names.insert(id, name.clone());
            let entry = PortableFolder {
                color: folder.color,
                sorting: folder
                    .sorting
                    .unwrap_or_else(|| DEFAULT_SORTING.to_string()),
            };
            insert_named(
                &mut pack.folders,
                Namespace::Folders,
                name,
                entry,
                policy,
                &mut summary,
            )?;
        }

        // Pass 2: items
        for record in store.scan(Namespace::Items)? {
            let item: StoredItem = parse_record(&record)?;
            let record_id = RecordKey::parse(&record.key)
                .map(|key| key.id)
                .unwrap_or_default();

            if let Some(id) = item.id.as_deref() {
                if id != record_id {
                    tracing::warn!(key = %record.key, id, "Item _id does not match its key");
                }
            }

            let folder = match item.folder {
                None => None,
                Some(folder_id) => {
                    let resolved = folder_names.get(&folder_id).cloned();
                    if resolved.is_none() {
                        tracing::warn!(
                            key = %record.key,
                            folder = %folder_id,
                            "Item references an unknown folder; exporting without folder"
                        );
                        summary.unresolved_folder_refs += 1;
                    }
                    resolved
                }
            };

            let name = item.name.unwrap_or(record_id);
            let entry = PortableItem {
                item_type: item.item_type.unwrap_or_default(),
                system: item.system,
                folder,
            };
            insert_named(
                &mut pack.items,
                Namespace::Items,
                name,
                entry,
                policy,
                &mut summary,
            )?;
        }

        summary.folders = pack.folders.len();
        summary.items = pack.items.len();
        Ok((pack, summary))
    }
}

fn parse_record<T: DeserializeOwned>(record: &Record) -> Result<T> {
    serde_json::from_slice(&record.value).map_err(|e| PackError::malformed(&record.key, e))
}

/// Insert under `name`, applying the duplicate-name policy.
fn insert_named<V>(
    map: &mut BTreeMap<String, V>,
    namespace: Namespace,
    name: String,
    value: V,
    policy: DuplicatePolicy,
    summary: &mut ExportSummary,
) -> Result<()> {
    if map.contains_key(&name) {
        match policy {
            DuplicatePolicy::Error => {
                return Err(PackError::DuplicateName { namespace, name });
            }
            DuplicatePolicy::Warn => {
                tracing::warn!(
                    %namespace,
                    name = %name,
                    "Duplicate name; keeping the record read last"
                );
                summary.duplicate_names += 1;
            }
        }
    }
    map.insert(name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::TranscodeSettings;
    use serde_json::json;

    fn write_store(path: &Path, records: &[(&str, serde_json::Value)]) {
        let records: Vec<Record> = records
            .iter()
            .map(|(key, value)| Record::new(*key, serde_json::to_vec(value).unwrap()))
            .collect();
        let mut store = PackStore::open_for_write(path).unwrap();
        store.write_batch(&records).unwrap();
        store.close().unwrap();
    }

    fn export_store(path: &Path, settings: TranscodeSettings) -> Result<(PortablePack, ExportSummary)> {
        let transcoder = Transcoder::with_settings(settings);
        let mut store = PackStore::open_for_read(path)?;
        transcoder.export_document(&mut store)
    }

    #[test]
    fn test_export_resolves_folder_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack");
        // Item key sorts before the folder key it references.
        write_store(
            &path,
            &[
                (
                    "!items!AAAAAAAAAAAAAAAA",
                    json!({"_id": "AAAAAAAAAAAAAAAA", "name": "Sword", "type": "weapon",
                           "system": {"dmg": 5}, "folder": "zzzzzzzzzzzzzzzz", "sort": 0}),
                ),
                (
                    "!folders!zzzzzzzzzzzzzzzz",
                    json!({"_id": "zzzzzzzzzzzzzzzz", "name": "Weapons", "type": "Item",
                           "color": "#fff", "sorting": "m"}),
                ),
            ],
        );

        let (pack, summary) = export_store(&path, TranscodeSettings::default()).unwrap();
        assert_eq!(pack.items["Sword"].folder.as_deref(), Some("Weapons"));
        assert_eq!(pack.items["Sword"].system, json!({"dmg": 5}));
        assert_eq!(pack.folders["Weapons"].color.as_deref(), Some("#fff"));
        assert_eq!(pack.folders["Weapons"].sorting, "m");
        assert_eq!(summary.folders, 1);
        assert_eq!(summary.items, 1);
    }

    #[test]
    fn test_export_skips_incomplete_folders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack");
        write_store(
            &path,
            &[
                ("!folders!aaaaaaaaaaaaaaaa", json!({"name": "NoId"})),
                ("!folders!bbbbbbbbbbbbbbbb", json!({"_id": "bbbbbbbbbbbbbbbb"})),
                (
                    "!items!cccccccccccccccc",
                    json!({"_id": "cccccccccccccccc", "name": "Orphan", "type": "gear",
                           "system": {}, "folder": "bbbbbbbbbbbbbbbb"}),
                ),
            ],
        );

        let (pack, summary) = export_store(&path, TranscodeSettings::default()).unwrap();
        assert!(pack.folders.is_empty());
        assert_eq!(summary.skipped_folders, 2);
        assert!(pack.items["Orphan"].folder.is_none());
        assert_eq!(summary.unresolved_folder_refs, 1);
    }

    #[test]
    fn test_export_defaults_missing_sorting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack");
        write_store(
            &path,
            &[("!folders!aaaaaaaaaaaaaaaa", json!({"_id": "aaaaaaaaaaaaaaaa", "name": "Gear"}))],
        );

        let (pack, _) = export_store(&path, TranscodeSettings::default()).unwrap();
        assert_eq!(pack.folders["Gear"], PortableFolder::default());
    }

    #[test]
    fn test_export_ignores_foreign_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack");
        write_store(
            &path,
            &[
                ("!actors!aaaaaaaaaaaaaaaa", json!({"name": "Hero"})),
                ("!items!bbbbbbbbbbbbbbbb", json!({"name": "Rope", "type": "gear"})),
            ],
        );

        let (pack, _) = export_store(&path, TranscodeSettings::default()).unwrap();
        assert!(pack.folders.is_empty());
        assert_eq!(pack.items.keys().collect::<Vec<_>>(), vec!["Rope"]);
    }

    #[test]
    fn test_export_item_name_falls_back_to_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack");
        write_store(
            &path,
            &[("!items!bbbbbbbbbbbbbbbb", json!({"type": "gear", "system": {}}))],
        );

        let (pack, _) = export_store(&path, TranscodeSettings::default()).unwrap();
        assert!(pack.items.contains_key("bbbbbbbbbbbbbbbb"));
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack");
        write_store(
            &path,
            &[
                ("!items!aaaaaaaaaaaaaaaa", json!({"name": "Potion", "type": "first"})),
                ("!items!bbbbbbbbbbbbbbbb", json!({"name": "Potion", "type": "second"})),
            ],
        );

        let (pack, summary) = export_store(&path, TranscodeSettings::default()).unwrap();
        assert_eq!(pack.items["Potion"].item_type, "second");
        assert_eq!(summary.duplicate_names, 1);
        assert_eq!(summary.items, 1);
    }

    #[test]
    fn test_duplicate_names_strict_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack");
        write_store(
            &path,
            &[
                ("!items!aaaaaaaaaaaaaaaa", json!({"name": "Potion", "type": "first"})),
                ("!items!bbbbbbbbbbbbbbbb", json!({"name": "Potion", "type": "second"})),
            ],
        );

        let settings = TranscodeSettings {
            duplicate_names: DuplicatePolicy::Error,
            ..TranscodeSettings::default()
        };
        let err = export_store(&path, settings).unwrap_err();
        assert!(matches!(
            err,
            PackError::DuplicateName { namespace: Namespace::Items, ref name } if name == "Potion"
        ));
    }

    #[test]
    fn test_malformed_record_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("pack");
        let json_path = dir.path().join("pack.json");

        let mut store = PackStore::open_for_write(&store_path).unwrap();
        store
            .write_batch(&[Record::new("!items!aaaaaaaaaaaaaaaa", b"{not json".to_vec())])
            .unwrap();
        store.close().unwrap();

        let err = Transcoder::with_defaults()
            .export(&store_path, &json_path)
            .unwrap_err();
        assert!(matches!(err, PackError::MalformedRecord { ref key, .. } if key == "!items!aaaaaaaaaaaaaaaa"));
        assert!(!json_path.exists());
    }

    #[test]
    fn test_export_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let err = Transcoder::with_defaults()
            .export(&dir.path().join("nope"), &dir.path().join("out.json"))
            .unwrap_err();
        assert!(matches!(err, PackError::StoreOpen { .. }));
        assert!(!dir.path().join("out.json").exists());
    }
}
