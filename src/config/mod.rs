//! Configuration management for `pack_tool`.
//!
//! Configuration is loaded from a YAML file with support for:
//! - Workspace config (`pack-tool.yaml` in the working directory)
//! - An explicit file named by `PACK_TOOL_CONFIG`
//! - Environment variable overrides (`PACK_TOOL_PACKS_DIR`)
//!
//! Every key is optional; the defaults target the runtime the packs ship for.

use std::fs;
use std::path::{Path, PathBuf};

use pack_lib::{DuplicatePolicy, TranscodeSettings};
use serde::Deserialize;
use thiserror::Error;

/// Workspace config file name.
pub const CONFIG_FILE_NAME: &str = "pack-tool.yaml";
/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "PACK_TOOL_CONFIG";
/// Env var overriding `packs_dir`.
pub const PACKS_DIR_ENV: &str = "PACK_TOOL_PACKS_DIR";
/// Directory pack names are resolved against.
pub const DEFAULT_PACKS_DIR: &str = "packs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Resolved tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub packs_dir: PathBuf,
    pub core_version: String,
    pub system_id: String,
    pub system_version: String,
    pub item_img: String,
    pub duplicate_names: DuplicatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        let settings = TranscodeSettings::default();
        Self {
            packs_dir: PathBuf::from(DEFAULT_PACKS_DIR),
            core_version: settings.core_version,
            system_id: settings.system_id,
            system_version: settings.system_version,
            item_img: settings.item_img,
            duplicate_names: settings.duplicate_names,
        }
    }
}

impl Config {
    /// Load configuration for a run in `workdir`, honoring the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file is missing, or any config
    /// file cannot be read or parsed.
    pub fn load(workdir: &Path) -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let packs_dir = std::env::var_os(PACKS_DIR_ENV).map(PathBuf::from);
        Self::load_from(workdir, explicit.as_deref(), packs_dir)
    }

    /// Load configuration from explicit sources (no environment access).
    ///
    /// An explicit file must exist; the workspace file is optional.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(
        workdir: &Path,
        explicit: Option<&Path>,
        packs_dir_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => {
                let path = workdir.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(packs_dir) = packs_dir_override.filter(|p| !p.as_os_str().is_empty()) {
            tracing::debug!(packs_dir = %packs_dir.display(), "packs_dir overridden by environment");
            config.packs_dir = packs_dir;
        }
        Ok(config)
    }

    /// Parse a config file.
    ///
    /// # Errors
    ///
    /// Returns `Read` or `Parse` on failure.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse YAML config text. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input or unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Store path for a pack name.
    #[must_use]
    pub fn store_path(&self, pack: &str) -> PathBuf {
        self.packs_dir.join(pack)
    }

    /// Transcoder settings carried by this config.
    #[must_use]
    pub fn settings(&self) -> TranscodeSettings {
        TranscodeSettings {
            core_version: self.core_version.clone(),
            system_id: self.system_id.clone(),
            system_version: self.system_version.clone(),
            item_img: self.item_img.clone(),
            duplicate_names: self.duplicate_names,
        }
    }
}
