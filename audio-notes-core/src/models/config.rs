use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::encoding::AudioEncoding;

/// What deleting a recording does with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrashMode {
    /// Move into the vault's `.trash` folder.
    #[default]
    Local,
    /// Remove the file outright.
    Permanent,
}

/// Configuration for recording into a vault.
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderConfiguration {
    /// Root directory of the vault.
    pub vault_root: PathBuf,

    /// Vault-relative folder recordings are saved in (default: `Recordings`).
    pub recordings_folder: String,

    /// Encodings to try, most preferred first. Empty means the built-in default.
    pub encoding_preference: Vec<AudioEncoding>,

    /// Input device name, or None for the system default.
    pub input_device: Option<String>,

    /// Maximum recording duration in seconds (None = unlimited).
    pub max_duration_secs: Option<f64>,

    /// Save zero-byte recordings instead of skipping them (default: false).
    pub save_empty_recordings: bool,

    pub trash: TrashMode,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        let folder = self.recordings_folder.trim_matches('/');
        if folder.is_empty() {
            return Err("recordings folder must not be empty".into());
        }
        if folder.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
            return Err(format!("invalid recordings folder: {}", self.recordings_folder));
        }
        if folder.starts_with(".trash") {
            return Err("recordings folder must not be inside .trash".into());
        }
        if let Some(max) = self.max_duration_secs {
            if max <= 0.0 {
                return Err("max duration must be positive".into());
            }
        }
        Ok(())
    }

    /// Recordings folder with surrounding slashes removed.
    pub fn folder(&self) -> &str {
        self.recordings_folder.trim_matches('/')
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            vault_root: PathBuf::from("."),
            recordings_folder: "Recordings".into(),
            encoding_preference: AudioEncoding::DEFAULT_PREFERENCE.to_vec(),
            input_device: None,
            max_duration_secs: None,
            save_empty_recordings: false,
            trash: TrashMode::Local,
        }
    }
}
