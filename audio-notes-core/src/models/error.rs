use thiserror::Error;

/// Errors that can occur while recording, encoding or storing audio notes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("microphone access denied")]
    PermissionDenied,

    #[error("no audio input device available")]
    DeviceNotAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("invalid session state: {0}")]
    InvalidState(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("file name must not be empty")]
    EmptyFileName,

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("a file named \"{0}\" already exists")]
    NameCollision(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl RecorderError {
    /// Wraps an I/O error with the operation that produced it.
    pub(crate) fn storage(context: &str, err: std::io::Error) -> Self {
        Self::StorageError(format!("{}: {}", context, err))
    }
}
