//! # audio-notes-core
//!
//! Platform-agnostic core of the vault audio recorder.
//!
//! Provides the recording session state machine, PCM processing, WAV I/O,
//! encoder selection and the recordings library on top of a vault.
//! Platform-specific backends (cpal) implement the `CaptureProvider` trait and
//! plug into the generic `RecordingController`.
//!
//! ## Architecture
//!
//! ```text
//! audio-notes-core (this crate)
//! ├── traits/       ← CaptureProvider, AudioEncoder, Vault, Notifier, SessionDelegate
//! ├── models/       ← RecorderError, SessionState, RecorderConfiguration, AudioBlob, etc.
//! ├── processing/   ← PCM helpers, WAV encode/decode, chunk buffer, waveform tap, encoders
//! ├── session/      ← RecordingController (generic orchestrator), LiveMonitor
//! ├── storage/      ← FsVault, RecordingLibrary, file naming
//! └── shell         ← RecorderShell (toggle, finish, browse)
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod shell;
pub mod storage;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioLevels, AudioSource, PcmAudio, StreamFormat, StreamInfo};
pub use models::config::{RecorderConfiguration, TrashMode};
pub use models::encoding::AudioEncoding;
pub use models::error::RecorderError;
pub use models::recording::{AudioBlob, SaveReceipt, VaultFile};
pub use models::state::SessionState;
pub use processing::encoders::{EncoderRegistry, WavEncoder};
pub use session::controller::RecordingController;
pub use session::monitor::LiveMonitor;
pub use shell::RecorderShell;
pub use storage::fs_vault::FsVault;
pub use storage::library::RecordingLibrary;
pub use traits::capture_provider::{AudioBufferCallback, CaptureProvider};
pub use traits::encoder::AudioEncoder;
pub use traits::notifier::{Notice, NoticeLevel, Notifier};
pub use traits::session_delegate::SessionDelegate;
pub use traits::vault::Vault;
