//! Pack transcoding between the LevelDB store and the portable document.
//!
//! This module handles:
//! - Export: store -> portable JSON (bookkeeping stripped, folder ids
//!   resolved to folder names)
//! - Import: portable JSON -> store (fresh ids, synthesized bookkeeping,
//!   staged full rebuild)
//!
//! Identifier generation and the wall clock are injected through
//! [`IdGenerator`] and [`Clock`].

mod export;
mod import;

use serde::{Deserialize, Serialize};

use crate::model::Stats;
use crate::util::{Clock, IdGenerator, RandomIdGenerator, SystemClock};

pub use export::ExportSummary;
pub use import::ImportSummary;

/// Runtime core version stamped into `_stats.coreVersion`.
pub const DEFAULT_CORE_VERSION: &str = "13.346";
/// Game system id stamped into `_stats.systemId`.
pub const DEFAULT_SYSTEM_ID: &str = "gfl5r";
/// Game system version stamped into `_stats.systemVersion`.
pub const DEFAULT_SYSTEM_VERSION: &str = "1.0.0";
/// Icon given to every imported item.
pub const DEFAULT_ITEM_IMG: &str = "icons/svg/item-bag.svg";

/// What export does when two records in a namespace share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the record seen last and log a warning.
    #[default]
    Warn,
    /// Abort the export.
    Error,
}

/// Constants the transcoder stamps into regenerated documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeSettings {
    pub core_version: String,
    pub system_id: String,
    pub system_version: String,
    pub item_img: String,
    pub duplicate_names: DuplicatePolicy,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            core_version: DEFAULT_CORE_VERSION.to_string(),
            system_id: DEFAULT_SYSTEM_ID.to_string(),
            system_version: DEFAULT_SYSTEM_VERSION.to_string(),
            item_img: DEFAULT_ITEM_IMG.to_string(),
            duplicate_names: DuplicatePolicy::default(),
        }
    }
}

impl TranscodeSettings {
    /// Stats block for a document created and modified at `timestamp`.
    #[must_use]
    pub fn stats(&self, timestamp: i64) -> Stats {
        Stats {
            compendium_source: None,
            duplicate_source: None,
            export_source: None,
            core_version: self.core_version.clone(),
            system_id: self.system_id.clone(),
            system_version: self.system_version.clone(),
            created_time: timestamp,
            modified_time: timestamp,
            last_modified_by: None,
        }
    }
}

/// Runs export and import with an injected id source and clock.
#[derive(Debug, Clone)]
pub struct Transcoder<G = RandomIdGenerator, C = SystemClock> {
    ids: G,
    clock: C,
    settings: TranscodeSettings,
}

impl Transcoder {
    /// Random identifiers, the system clock, default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            RandomIdGenerator::new(),
            SystemClock,
            TranscodeSettings::default(),
        )
    }

    /// Random identifiers and the system clock with custom settings.
    #[must_use]
    pub fn with_settings(settings: TranscodeSettings) -> Self {
        Self::new(RandomIdGenerator::new(), SystemClock, settings)
    }
}

impl<G: IdGenerator, C: Clock> Transcoder<G, C> {
    #[must_use]
    pub const fn new(ids: G, clock: C, settings: TranscodeSettings) -> Self {
        Self {
            ids,
            clock,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &TranscodeSettings {
        &self.settings
    }
}
