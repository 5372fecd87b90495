use chrono::{DateTime, Utc};
use serde::Serialize;

use super::encoding::AudioEncoding;

/// A finished, encoded recording held in memory.
///
/// Produced by the controller on stop. An empty blob (zero bytes) means
/// nothing was captured.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlob {
    pub encoding: AudioEncoding,
    pub bytes: Vec<u8>,
    pub duration_secs: f64,
}

impl AudioBlob {
    pub fn empty(encoding: AudioEncoding) -> Self {
        Self {
            encoding,
            bytes: Vec::new(),
            duration_secs: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.encoding.mime_type()
    }
}

/// A file stored in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultFile {
    /// Vault-relative path, `/`-separated.
    pub path: String,
    /// Final path component.
    pub name: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Returned by a successful save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveReceipt {
    pub file: VaultFile,
    pub mime_type: String,
    pub duration_secs: f64,
    /// SHA-256 of the written bytes, lowercase hex.
    pub checksum: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blob_has_no_bytes() {
        let blob = AudioBlob::empty(AudioEncoding::Wav);
        assert!(blob.is_empty());
        assert_eq!(blob.len(), 0);
        assert_eq!(blob.mime_type(), "audio/wav");
    }
}
