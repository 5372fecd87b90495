use std::path::PathBuf;

use crate::models::error::RecorderError;
use crate::models::recording::VaultFile;

/// The document store recordings live in.
///
/// Paths are vault-relative and `/`-separated (`Recordings/memo.wav`).
/// Implementations must reject absolute paths and `..` components.
pub trait Vault: Send + Sync {
    fn folder_exists(&self, folder: &str) -> Result<bool, RecorderError>;

    /// Create `folder` and any missing parents.
    fn create_folder(&self, folder: &str) -> Result<(), RecorderError>;

    /// Whether a file or folder exists at `path`.
    fn exists(&self, path: &str) -> Result<bool, RecorderError>;

    /// Write `data` to `path`, replacing any existing file.
    fn create_binary(&self, path: &str, data: &[u8]) -> Result<VaultFile, RecorderError>;

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, RecorderError>;

    /// Every file whose path starts with `prefix/`, in storage order.
    fn list_files(&self, prefix: &str) -> Result<Vec<VaultFile>, RecorderError>;

    /// A location a player can stream the file's bytes from.
    fn resource_path(&self, path: &str) -> Result<PathBuf, RecorderError>;

    /// Move the file out of the vault's visible tree.
    fn trash(&self, path: &str) -> Result<(), RecorderError>;

    /// Rename `from` to `to`. Fails with `NameCollision` if `to` exists.
    fn rename(&self, from: &str, to: &str) -> Result<VaultFile, RecorderError>;
}
