use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::models::error::RecorderError;
use crate::models::recording::{AudioBlob, SaveReceipt, VaultFile};
use crate::storage::naming;
use crate::traits::notifier::{Notice, Notifier};
use crate::traits::vault::Vault;

/// The recordings folder of a vault: save, list, rename, delete.
///
/// Names passed in are relative to the recordings folder (`memo.wav`, or
/// `old/memo.wav` for a file in a subfolder). Every failure, and every
/// completed change, is also surfaced to the user through the notifier.
pub struct RecordingLibrary<V: Vault> {
    vault: V,
    folder: String,
    extension: String,
    notifier: Arc<dyn Notifier>,
}

impl<V: Vault> RecordingLibrary<V> {
    pub fn new(
        vault: V,
        folder: impl Into<String>,
        extension: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            vault,
            folder: folder.into().trim_matches('/').to_string(),
            extension: extension.into(),
            notifier,
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn default_file_name(&self) -> String {
        naming::default_file_name(chrono::Utc::now(), &self.extension)
    }

    /// Vault path of a name relative to the recordings folder.
    pub fn path_of(&self, name: &str) -> String {
        naming::join(&self.folder, name.trim().trim_start_matches('/'))
    }

    /// Name of a listed file relative to the recordings folder.
    pub fn relative_name<'a>(&self, file: &'a VaultFile) -> &'a str {
        file.path
            .strip_prefix(self.folder.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&file.path)
    }

    /// Create the recordings folder if it does not exist yet.
    pub fn ensure_folder(&self) -> Result<(), RecorderError> {
        if !self.vault.folder_exists(&self.folder)? {
            log::info!("Creating recordings folder {}", self.folder);
            self.vault.create_folder(&self.folder)?;
        }
        Ok(())
    }

    /// Write `blob` into the recordings folder as `name`.
    ///
    /// The extension is enforced; an existing file of the same name is replaced.
    pub fn save(&self, blob: &AudioBlob, name: &str) -> Result<SaveReceipt, RecorderError> {
        let result = self.save_inner(blob, name);
        match &result {
            Ok(receipt) => self
                .notifier
                .notify(Notice::success(format!("Recording saved to {}", receipt.file.path))),
            Err(e) => self
                .notifier
                .notify(Notice::error(format!("Could not save recording: {}", e))),
        }
        result
    }

    fn save_inner(&self, blob: &AudioBlob, name: &str) -> Result<SaveReceipt, RecorderError> {
        let file_name = naming::normalize_file_name(name, &self.extension)?;
        self.ensure_folder()?;

        let path = naming::join(&self.folder, &file_name);
        let file = self.vault.create_binary(&path, &blob.bytes)?;
        let checksum = hex_encode(&Sha256::digest(&blob.bytes));

        log::info!(
            "Saved {} ({} bytes, {}, sha256 {})",
            file.path,
            file.size_bytes,
            blob.mime_type(),
            checksum
        );

        Ok(SaveReceipt {
            file,
            mime_type: blob.mime_type().to_string(),
            duration_secs: blob.duration_secs,
            checksum,
        })
    }

    /// Every file under the recordings folder, in storage order.
    pub fn list(&self) -> Result<Vec<VaultFile>, RecorderError> {
        self.vault.list_files(&self.folder).map_err(|e| {
            self.notifier
                .notify(Notice::error(format!("Could not list recordings: {}", e)));
            e
        })
    }

    /// Rename `name` to `new_name` within the same folder.
    ///
    /// The destination is checked before anything changes; on a collision
    /// both files are left untouched.
    pub fn rename(&self, name: &str, new_name: &str) -> Result<VaultFile, RecorderError> {
        let result = self.rename_inner(name, new_name);
        match &result {
            Ok(file) => self
                .notifier
                .notify(Notice::success(format!("Renamed {} to {}", name.trim(), file.name))),
            Err(RecorderError::NameCollision(_)) => self.notifier.notify(Notice::error(
                "Failed to rename file: a file with that name already exists",
            )),
            Err(e) => self.notifier.notify(Notice::error(format!("Failed to rename file: {}", e))),
        }
        result
    }

    fn rename_inner(&self, name: &str, new_name: &str) -> Result<VaultFile, RecorderError> {
        let from = self.path_of(name);
        let file_name = naming::normalize_file_name(new_name, &self.extension)?;
        let to = match from.rsplit_once('/') {
            Some((parent, _)) => naming::join(parent, &file_name),
            None => file_name,
        };

        if !self.vault.exists(&from)? {
            return Err(RecorderError::NotFound(from));
        }
        if self.vault.exists(&to)? {
            log::info!("Not renaming {}: {} already exists", from, to);
            return Err(RecorderError::NameCollision(to));
        }

        let file = self.vault.rename(&from, &to)?;
        log::info!("Renamed {} to {}", from, to);
        Ok(file)
    }

    /// Move `name` to the trash.
    pub fn delete(&self, name: &str) -> Result<(), RecorderError> {
        let path = self.path_of(name);
        match self.vault.trash(&path) {
            Ok(()) => {
                log::info!("Trashed {}", path);
                self.notifier.notify(Notice::success(format!("Deleted {}", name.trim())));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error(format!("Failed to delete file: {}", e)));
                Err(e)
            }
        }
    }

    /// Location a player can stream `name` from.
    pub fn resource_path(&self, name: &str) -> Result<PathBuf, RecorderError> {
        self.vault
            .resource_path(&self.path_of(name))
            .map_err(|e| self.report_open_failure(name, e))
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, RecorderError> {
        self.vault
            .read_binary(&self.path_of(name))
            .map_err(|e| self.report_open_failure(name, e))
    }

    fn report_open_failure(&self, name: &str, e: RecorderError) -> RecorderError {
        self.notifier
            .notify(Notice::error(format!("Could not open {}: {}", name.trim(), e)));
        e
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::TrashMode;
    use crate::models::encoding::AudioEncoding;
    use crate::storage::fs_vault::FsVault;
    use crate::testing::CollectingNotifier;
    use crate::traits::notifier::NoticeLevel;

    fn library(
        extension: &str,
    ) -> (tempfile::TempDir, Arc<CollectingNotifier>, RecordingLibrary<FsVault>) {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(CollectingNotifier::default());
        let library = RecordingLibrary::new(
            FsVault::new(dir.path(), TrashMode::Local),
            "Recordings",
            extension,
            notifier.clone(),
        );
        (dir, notifier, library)
    }

    fn blob(bytes: &[u8]) -> AudioBlob {
        AudioBlob {
            encoding: AudioEncoding::Mp3,
            bytes: bytes.to_vec(),
            duration_secs: 1.0,
        }
    }

    #[test]
    fn save_then_list_returns_exactly_that_file() {
        let (_dir, notifier, library) = library("mp3");
        let input = blob(&[7u8; 1234]);

        let receipt = library.save(&input, "Recording-0.mp3").unwrap();
        assert_eq!(receipt.file.path, "Recordings/Recording-0.mp3");
        assert_eq!(receipt.mime_type, "audio/mpeg");
        assert_eq!(receipt.checksum.len(), 64);

        let files = library.list().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "Recording-0.mp3");
        assert_eq!(files[0].size_bytes, input.len() as u64);
        assert_eq!(notifier.last().unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn save_creates_folder_and_enforces_extension() {
        let (dir, _notifier, library) = library("wav");
        assert!(!dir.path().join("Recordings").exists());

        let receipt = library.save(&blob(b"RIFF"), "standup").unwrap();
        assert_eq!(receipt.file.name, "standup.wav");
        assert!(dir.path().join("Recordings/standup.wav").is_file());
    }

    #[test]
    fn save_rejects_empty_name() {
        let (dir, notifier, library) = library("wav");
        assert_eq!(library.save(&blob(b"x"), "  "), Err(RecorderError::EmptyFileName));
        assert!(!dir.path().join("Recordings").exists());
        assert_eq!(notifier.last().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn save_overwrites_without_protection() {
        let (_dir, _notifier, library) = library("wav");
        library.save(&blob(b"first"), "a").unwrap();
        library.save(&blob(b"second!"), "a").unwrap();
        assert_eq!(library.read("a.wav").unwrap(), b"second!");
        assert_eq!(library.list().unwrap().len(), 1);
    }

    #[test]
    fn rename_onto_existing_name_changes_nothing() {
        let (_dir, notifier, library) = library("wav");
        library.save(&blob(b"original"), "a").unwrap();
        library.save(&blob(b"other"), "b").unwrap();

        let result = library.rename("a.wav", "b");
        assert_eq!(result, Err(RecorderError::NameCollision("Recordings/b.wav".into())));
        assert_eq!(library.read("a.wav").unwrap(), b"original");
        assert_eq!(library.read("b.wav").unwrap(), b"other");

        let notice = notifier.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("already exists"));
    }

    #[test]
    fn rename_moves_within_folder() {
        let (_dir, _notifier, library) = library("wav");
        library.save(&blob(b"x"), "a").unwrap();

        let renamed = library.rename("a.wav", " standup ").unwrap();
        assert_eq!(renamed.path, "Recordings/standup.wav");

        let names: Vec<String> = library.list().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["standup.wav"]);
    }

    #[test]
    fn rename_keeps_subfolder() {
        let (_dir, _notifier, library) = library("wav");
        library.vault().create_folder("Recordings/old").unwrap();
        library.vault().create_binary("Recordings/old/a.wav", b"x").unwrap();

        let renamed = library.rename("old/a.wav", "b").unwrap();
        assert_eq!(renamed.path, "Recordings/old/b.wav");
        assert_eq!(library.relative_name(&renamed), "old/b.wav");
    }

    #[test]
    fn rename_rejects_empty_and_missing() {
        let (_dir, _notifier, library) = library("wav");
        library.save(&blob(b"x"), "a").unwrap();
        assert_eq!(library.rename("a.wav", ""), Err(RecorderError::EmptyFileName));
        assert!(matches!(library.rename("zzz.wav", "b"), Err(RecorderError::NotFound(_))));
    }

    #[test]
    fn delete_removes_from_listing() {
        let (_dir, notifier, library) = library("wav");
        library.save(&blob(b"x"), "a").unwrap();
        library.save(&blob(b"y"), "b").unwrap();

        library.delete("a.wav").unwrap();
        let names: Vec<String> = library.list().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["b.wav"]);
        assert_eq!(notifier.last().unwrap(), Notice::success("Deleted a.wav"));
    }

    #[test]
    fn delete_missing_reports_error() {
        let (_dir, notifier, library) = library("wav");
        assert!(library.delete("nope.wav").is_err());
        assert_eq!(notifier.last().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn opening_missing_file_reports_error() {
        let (_dir, notifier, library) = library("wav");
        assert!(library.read("nope.wav").is_err());
        assert!(notifier.last().unwrap().message.starts_with("Could not open nope.wav"));
    }

    #[test]
    fn default_name_uses_extension() {
        let (_dir, _notifier, library) = library("ogg");
        let name = library.default_file_name();
        assert!(name.starts_with("Recording-"));
        assert!(name.ends_with(".ogg"));
    }
}
