use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::models::config::TrashMode;
use crate::models::error::RecorderError;
use crate::models::recording::VaultFile;
use crate::storage::naming;
use crate::traits::vault::Vault;

/// Folder deleted files are moved into when trashing locally.
pub const TRASH_FOLDER: &str = ".trash";

/// `Vault` over a plain directory tree.
///
/// ```text
/// <root>/
/// ├── Recordings/            recordings folder (configurable)
/// │   └── Recording-….wav
/// └── .trash/                local trash, hidden from listings
/// ```
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    trash_mode: TrashMode,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>, trash_mode: TrashMode) -> Self {
        Self {
            root: root.into(),
            trash_mode,
        }
    }

    /// Open an existing vault directory.
    pub fn open(root: impl Into<PathBuf>, trash_mode: TrashMode) -> Result<Self, RecorderError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RecorderError::StorageError(format!(
                "vault root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self::new(root, trash_mode))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault path onto the filesystem, refusing anything that escapes the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, RecorderError> {
        let relative = Path::new(path.trim_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(RecorderError::StorageError(format!(
                        "path {} is outside the vault",
                        path
                    )))
                }
            }
        }
        Ok(resolved)
    }

    fn describe(&self, vault_path: String, fs_path: &Path) -> Result<VaultFile, RecorderError> {
        let meta =
            fs::metadata(fs_path).map_err(|e| RecorderError::storage("failed to stat file", e))?;
        let name = vault_path
            .rsplit('/')
            .next()
            .unwrap_or(vault_path.as_str())
            .to_string();
        Ok(VaultFile {
            path: vault_path,
            name,
            size_bytes: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn walk(
        &self,
        dir: &Path,
        prefix: &str,
        out: &mut Vec<VaultFile>,
    ) -> Result<(), RecorderError> {
        let entries =
            fs::read_dir(dir).map_err(|e| RecorderError::storage("failed to list folder", e))?;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let vault_path = naming::join(prefix, &name);
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                self.walk(&entry.path(), &vault_path, out)?;
            } else if file_type.is_file() {
                out.push(self.describe(vault_path, &entry.path())?);
            }
        }
        Ok(())
    }

    /// First free path for `name` inside the trash folder (`memo.wav`, `memo 1.wav`, ...).
    fn trash_destination(&self, name: &str) -> Result<PathBuf, RecorderError> {
        let trash = self.resolve(TRASH_FOLDER)?;
        fs::create_dir_all(&trash)
            .map_err(|e| RecorderError::storage("failed to create trash folder", e))?;

        let candidate = trash.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }

        let (stem, extension) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (name, None),
        };
        let mut n = 1;
        loop {
            let numbered = match extension {
                Some(ext) => format!("{} {}.{}", stem, n, ext),
                None => format!("{} {}", stem, n),
            };
            let candidate = trash.join(numbered);
            if !candidate.exists() {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

impl Vault for FsVault {
    fn folder_exists(&self, folder: &str) -> Result<bool, RecorderError> {
        Ok(self.resolve(folder)?.is_dir())
    }

    fn create_folder(&self, folder: &str) -> Result<(), RecorderError> {
        let path = self.resolve(folder)?;
        fs::create_dir_all(&path)
            .map_err(|e| RecorderError::storage("failed to create folder", e))?;
        log::debug!("Created vault folder {}", path.display());
        Ok(())
    }

    fn exists(&self, path: &str) -> Result<bool, RecorderError> {
        Ok(self.resolve(path)?.exists())
    }

    fn create_binary(&self, path: &str, data: &[u8]) -> Result<VaultFile, RecorderError> {
        let target = self.resolve(path)?;
        fs::write(&target, data).map_err(|e| RecorderError::storage("failed to write file", e))?;
        self.describe(path.trim_matches('/').to_string(), &target)
    }

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, RecorderError> {
        let target = self.resolve(path)?;
        fs::read(&target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RecorderError::NotFound(path.to_string()),
            _ => RecorderError::storage("failed to read file", e),
        })
    }

    fn list_files(&self, prefix: &str) -> Result<Vec<VaultFile>, RecorderError> {
        let folder = self.resolve(prefix)?;
        let mut files = Vec::new();
        if folder.is_dir() {
            self.walk(&folder, prefix.trim_matches('/'), &mut files)?;
        }
        Ok(files)
    }

    fn resource_path(&self, path: &str) -> Result<PathBuf, RecorderError> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(RecorderError::NotFound(path.to_string()));
        }
        fs::canonicalize(&target).map_err(|e| RecorderError::storage("failed to resolve path", e))
    }

    fn trash(&self, path: &str) -> Result<(), RecorderError> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(RecorderError::NotFound(path.to_string()));
        }

        match self.trash_mode {
            TrashMode::Permanent => {
                fs::remove_file(&target)
                    .map_err(|e| RecorderError::storage("failed to delete file", e))?;
            }
            TrashMode::Local => {
                let name = target
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let destination = self.trash_destination(&name)?;
                fs::rename(&target, &destination)
                    .map_err(|e| RecorderError::storage("failed to move file to trash", e))?;
                log::debug!("Moved {} to {}", target.display(), destination.display());
            }
        }
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<VaultFile, RecorderError> {
        let source = self.resolve(from)?;
        let destination = self.resolve(to)?;
        if !source.is_file() {
            return Err(RecorderError::NotFound(from.to_string()));
        }
        if destination.exists() {
            return Err(RecorderError::NameCollision(to.to_string()));
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RecorderError::storage("failed to create folder", e))?;
        }
        fs::rename(&source, &destination)
            .map_err(|e| RecorderError::storage("failed to rename file", e))?;
        self.describe(to.trim_matches('/').to_string(), &destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(mode: TrashMode) -> (tempfile::TempDir, FsVault) {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path(), mode);
        (dir, vault)
    }

    #[test]
    fn rejects_paths_outside_root() {
        let (_dir, vault) = vault(TrashMode::Local);
        assert!(matches!(vault.exists("../etc/passwd"), Err(RecorderError::StorageError(_))));
        assert!(vault.create_binary("a/../../x", b"x").is_err());
    }

    #[test]
    fn open_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsVault::open(dir.path().join("missing"), TrashMode::Local).is_err());
        assert!(FsVault::open(dir.path(), TrashMode::Local).is_ok());
    }

    #[test]
    fn create_and_describe_file() {
        let (_dir, vault) = vault(TrashMode::Local);
        assert!(!vault.folder_exists("Recordings").unwrap());
        vault.create_folder("Recordings").unwrap();
        assert!(vault.folder_exists("Recordings").unwrap());

        let file = vault.create_binary("Recordings/a.wav", &[1, 2, 3]).unwrap();
        assert_eq!(file.path, "Recordings/a.wav");
        assert_eq!(file.name, "a.wav");
        assert_eq!(file.size_bytes, 3);
        assert!(file.modified.is_some());
        assert_eq!(vault.read_binary("Recordings/a.wav").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn list_is_recursive_and_skips_hidden_entries() {
        let (dir, vault) = vault(TrashMode::Local);
        vault.create_folder("Recordings/old").unwrap();
        vault.create_binary("Recordings/a.wav", b"a").unwrap();
        vault.create_binary("Recordings/old/b.wav", b"b").unwrap();
        vault.create_binary("Recordings/.hidden", b"h").unwrap();
        vault.create_binary("other.wav", b"o").unwrap();
        fs::create_dir_all(dir.path().join("Recordings/.cache")).unwrap();
        fs::write(dir.path().join("Recordings/.cache/c.wav"), b"c").unwrap();

        let mut paths: Vec<String> = vault
            .list_files("Recordings")
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        paths.sort();
        assert_eq!(paths, vec!["Recordings/a.wav", "Recordings/old/b.wav"]);
    }

    #[test]
    fn list_of_missing_folder_is_empty() {
        let (_dir, vault) = vault(TrashMode::Local);
        assert!(vault.list_files("Recordings").unwrap().is_empty());
    }

    #[test]
    fn local_trash_moves_with_numbered_suffix() {
        let (dir, vault) = vault(TrashMode::Local);
        vault.create_folder("Recordings").unwrap();

        vault.create_binary("Recordings/a.wav", b"first").unwrap();
        vault.trash("Recordings/a.wav").unwrap();
        vault.create_binary("Recordings/a.wav", b"second").unwrap();
        vault.trash("Recordings/a.wav").unwrap();

        assert!(!vault.exists("Recordings/a.wav").unwrap());
        assert_eq!(fs::read(dir.path().join(".trash/a.wav")).unwrap(), b"first");
        assert_eq!(fs::read(dir.path().join(".trash/a 1.wav")).unwrap(), b"second");
    }

    #[test]
    fn permanent_trash_removes() {
        let (dir, vault) = vault(TrashMode::Permanent);
        vault.create_binary("a.wav", b"x").unwrap();
        vault.trash("a.wav").unwrap();
        assert!(!dir.path().join("a.wav").exists());
        assert!(!dir.path().join(".trash").exists());
    }

    #[test]
    fn trash_missing_file_is_not_found() {
        let (_dir, vault) = vault(TrashMode::Local);
        assert_eq!(vault.trash("nope.wav"), Err(RecorderError::NotFound("nope.wav".into())));
    }

    #[test]
    fn rename_refuses_existing_destination() {
        let (_dir, vault) = vault(TrashMode::Local);
        vault.create_binary("a.wav", b"a").unwrap();
        vault.create_binary("b.wav", b"b").unwrap();

        assert_eq!(
            vault.rename("a.wav", "b.wav"),
            Err(RecorderError::NameCollision("b.wav".into()))
        );
        assert_eq!(vault.read_binary("a.wav").unwrap(), b"a");
        assert_eq!(vault.read_binary("b.wav").unwrap(), b"b");

        let renamed = vault.rename("a.wav", "c.wav").unwrap();
        assert_eq!(renamed.name, "c.wav");
        assert!(!vault.exists("a.wav").unwrap());
    }

    #[test]
    fn resource_path_is_absolute() {
        let (_dir, vault) = vault(TrashMode::Local);
        vault.create_binary("a.wav", b"a").unwrap();
        assert!(vault.resource_path("a.wav").unwrap().is_absolute());
        assert!(matches!(vault.resource_path("b.wav"), Err(RecorderError::NotFound(_))));
    }
}
