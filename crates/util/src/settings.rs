//! User settings for the sequencer editor.
//!
//! A small JSON file records the editor defaults: whether the advanced input
//! timing controls start enabled, an optional pattern restricting which source
//! keys are offered as inputs, and where the file-backed collection lives. The
//! file sits in the standard configuration directory
//! (`~/.config/sequencer/settings.json` on most platforms) unless
//! `SEQUENCER_SETTINGS_PATH` points elsewhere.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the settings file path.
pub const SETTINGS_PATH_ENV: &str = "SEQUENCER_SETTINGS_PATH";

/// Default filename for the JSON payload.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Collection file used when neither the settings nor the caller name one.
pub const DEFAULT_COLLECTION_FILE: &str = "sequences.json";

/// Error surfaced when reading or writing settings fails.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid candidate pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Persisted editor settings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerSettings {
    /// Start sessions with the advanced input timing controls exposed.
    pub advanced_input_config: bool,
    /// Regular expression a source key must match to be offered as an input.
    pub candidate_pattern: Option<String>,
    /// Location of the JSON collection used by the file-backed source.
    pub collection_path: Option<String>,
}

impl SequencerSettings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&default_settings_path())
    }

    /// Loads settings from `path`. A missing file yields defaults; an unreadable
    /// payload is logged and also yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(settings) => Ok(settings),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse settings file; using defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(SettingsError::Io(error)),
        }
    }

    /// Writes the settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Compiles the candidate pattern, if one is configured.
    pub fn candidate_filter(&self) -> Result<Option<Regex>, SettingsError> {
        let Some(pattern) = self.candidate_pattern.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        Regex::new(pattern).map(Some).map_err(|source| SettingsError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
    }

    /// Resolves the collection path, falling back to `sequences.json` in the
    /// working directory.
    pub fn collection_path(&self) -> PathBuf {
        match self.collection_path.as_deref() {
            Some(path) if !path.trim().is_empty() => expand_tilde(path),
            _ => PathBuf::from(DEFAULT_COLLECTION_FILE),
        }
    }
}

/// Resolves the settings file location, honoring `SEQUENCER_SETTINGS_PATH`.
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sequencer")
        .join(SETTINGS_FILE_NAME)
}
