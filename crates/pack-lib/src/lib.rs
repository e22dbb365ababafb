//! `pack-lib` — compendium pack transcoding.
//!
//! Converts item packs between the runtime's LevelDB store and a portable
//! JSON document suited to hand editing and version control.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use pack_lib::Transcoder;
//!
//! let mut transcoder = Transcoder::with_defaults();
//!
//! // Store -> JSON
//! transcoder.export(Path::new("packs/items"), Path::new("items.json")).unwrap();
//!
//! // JSON -> store (full rebuild with fresh ids)
//! transcoder.import(Path::new("items.json"), Path::new("packs/items")).unwrap();
//! ```

pub mod error;
pub mod model;
pub mod portable;
pub mod store;
pub mod transcode;
pub mod util;

pub use error::{PackError, Result};
pub use model::{Namespace, PortableFolder, PortableItem, PortablePack, Record, RecordKey};
pub use store::PackStore;
pub use transcode::{DuplicatePolicy, ExportSummary, ImportSummary, TranscodeSettings, Transcoder};
pub use util::{Clock, FixedClock, IdGenerator, RandomIdGenerator, SystemClock};
