//! Core data types for pack-lib.
//!
//! Two shapes of the same content live here: the store form written into
//! LevelDB (with the runtime's bookkeeping fields) and the portable form
//! kept under version control.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Sorting mode stamped on folders when the portable document omits it.
pub const DEFAULT_SORTING: &str = "a";

/// Document type every folder in an item pack carries.
pub const FOLDER_DOCUMENT_TYPE: &str = "Item";

/// Key namespace of a store record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Items,
    Folders,
}

impl Namespace {
    /// Key prefix used by the runtime, e.g. `!items!`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Items => "!items!",
            Self::Folders => "!folders!",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Folders => "folders",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed store key: `<prefix><id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub namespace: Namespace,
    pub id: String,
}

impl RecordKey {
    #[must_use]
    pub fn new(namespace: Namespace, id: impl Into<String>) -> Self {
        Self {
            namespace,
            id: id.into(),
        }
    }

    /// Parse a raw key. Returns `None` for keys outside the item and folder
    /// namespaces, or with an empty identifier.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        [Namespace::Items, Namespace::Folders]
            .into_iter()
            .find_map(|namespace| {
                raw.strip_prefix(namespace.prefix())
                    .filter(|id| !id.is_empty())
                    .map(|id| Self::new(namespace, id))
            })
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace.prefix(), self.id)
    }
}

/// A raw key/value pair as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: Vec<u8>,
}

impl Record {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Serialize a document under the given key.
    ///
    /// # Errors
    ///
    /// Returns `Json` if the document cannot be serialized.
    pub fn from_document<T: Serialize>(key: &RecordKey, document: &T) -> crate::Result<Self> {
        Ok(Self::new(key.to_string(), serde_json::to_vec(document)?))
    }
}

// ============================================================================
// Store form
// ============================================================================

/// Bookkeeping block the runtime expects on every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub compendium_source: Option<String>,
    pub duplicate_source: Option<String>,
    pub export_source: Option<String>,
    pub core_version: String,
    pub system_id: String,
    pub system_version: String,
    pub created_time: i64,
    pub modified_time: i64,
    pub last_modified_by: Option<String>,
}

/// Permission map; packs built here grant nothing beyond the default level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ownership {
    pub default: i64,
}

/// Item document as written into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub img: String,
    pub system: Value,
    pub effects: Vec<Value>,
    pub folder: Option<String>,
    pub sort: i64,
    pub ownership: Ownership,
    pub flags: Map<String, Value>,
    #[serde(rename = "_stats")]
    pub stats: Stats,
}

/// Folder document as written into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderDocument {
    pub name: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub folder_type: String,
    pub sorting: String,
    pub sort: i64,
    pub color: Option<String>,
    pub flags: Map<String, Value>,
    #[serde(rename = "_stats")]
    pub stats: Stats,
}

/// Lenient view of a stored folder; only the fields export needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredFolder {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub sorting: Option<String>,
}

/// Lenient view of a stored item; only the fields export needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredItem {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub system: Value,
    pub folder: Option<String>,
}

// ============================================================================
// Portable form
// ============================================================================

fn default_sorting() -> String {
    DEFAULT_SORTING.to_string()
}

/// An explicit `null` sorting falls back to the default like an absent one.
fn sorting_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_sorting))
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// The version-controlled pack document. Both mappings are keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortablePack {
    #[serde(default)]
    pub folders: BTreeMap<String, PortableFolder>,
    #[serde(default)]
    pub items: BTreeMap<String, PortableItem>,
}

impl PortablePack {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableFolder {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_sorting", deserialize_with = "sorting_or_default")]
    pub sorting: String,
}

impl Default for PortableFolder {
    fn default() -> Self {
        Self {
            color: None,
            sorting: default_sorting(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default = "empty_object")]
    pub system: Value,
    /// Folder *name*, resolved against `PortablePack::folders`.
    #[serde(default)]
    pub folder: Option<String>,
}

impl Default for PortableItem {
    fn default() -> Self {
        Self {
            item_type: String::new(),
            system: empty_object(),
            folder: None,
        }
    }
}
