//! Settings file with environment and command-line overrides.
//!
//! Default location: `<config dir>/audio-notes/config.toml`. Every key is
//! optional:
//!
//! ```toml
//! vault = "/home/me/Notes"
//! recordings_folder = "Recordings"
//! encoding_preference = ["mp3", "webm", "ogg", "wav"]
//! input_device = "USB Microphone"
//! max_duration_secs = 600
//! save_empty_recordings = false
//! trash = "local"
//! ```
//!
//! `AUDIO_NOTES_VAULT` overrides the vault from the file.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use audio_notes_core::{AudioEncoding, RecorderConfiguration, TrashMode};

pub const VAULT_ENV: &str = "AUDIO_NOTES_VAULT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vault: PathBuf,
    pub recordings_folder: String,
    pub encoding_preference: Vec<AudioEncoding>,
    pub input_device: Option<String>,
    pub max_duration_secs: Option<f64>,
    pub save_empty_recordings: bool,
    pub trash: TrashMode,
}

impl Default for Settings {
    fn default() -> Self {
        let recorder = RecorderConfiguration::default();
        Self {
            vault: default_vault_path(),
            recordings_folder: recorder.recordings_folder,
            encoding_preference: recorder.encoding_preference,
            input_device: None,
            max_duration_secs: None,
            save_empty_recordings: false,
            trash: TrashMode::Local,
        }
    }
}

/// `~/Documents/Audio Notes`, or `./Audio Notes` without a documents folder.
fn default_vault_path() -> PathBuf {
    dirs_next::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Audio Notes")
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("audio-notes").join("config.toml"))
}

impl Settings {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => p,
            None => return Ok(Self::default().with_env()),
        };

        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default().with_env());
        }

        let settings = Self::from_file(&path)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings.with_env())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn with_env(mut self) -> Self {
        if let Ok(vault) = env::var(VAULT_ENV) {
            if !vault.trim().is_empty() {
                self.vault = PathBuf::from(vault);
            }
        }
        self
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, vault: Option<PathBuf>, folder: Option<String>) -> Self {
        if let Some(vault) = vault {
            self.vault = vault;
        }
        if let Some(folder) = folder {
            self.recordings_folder = folder;
        }
        self
    }

    pub fn to_configuration(&self) -> RecorderConfiguration {
        RecorderConfiguration {
            vault_root: self.vault.clone(),
            recordings_folder: self.recordings_folder.clone(),
            encoding_preference: self.encoding_preference.clone(),
            input_device: self.input_device.clone(),
            max_duration_secs: self.max_duration_secs,
            save_empty_recordings: self.save_empty_recordings,
            trash: self.trash,
        }
    }
}
