use std::sync::Arc;

use crate::models::audio_models::{AudioSource, StreamFormat};
use crate::models::error::RecorderError;

/// Callback invoked when an input buffer is available.
///
/// Parameters:
/// - `samples`: Interleaved f32 samples in `[-1.0, 1.0]`.
/// - `sample_rate`: The actual sample rate of the delivered audio.
/// - `channels`: Number of interleaved channels.
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Interface for platform-specific microphone sources.
///
/// Implemented by `CpalMicCapture` in `audio-notes-cpal`.
pub trait CaptureProvider: Send {
    /// Whether an input device is currently available.
    fn is_available(&self) -> bool;

    /// Open an audio-only input stream and start delivering buffers via `callback`.
    ///
    /// Fails with `PermissionDenied` when device access is refused and with
    /// `DeviceNotAvailable` when there is nothing to open. The callback fires on
    /// the backend's audio thread, so keep processing minimal.
    fn start(&mut self, callback: AudioBufferCallback) -> Result<StreamFormat, RecorderError>;

    /// Stop capturing and release the device stream.
    fn stop(&mut self) -> Result<(), RecorderError>;

    /// Information about the device backing this provider.
    fn device_info(&self) -> AudioSource;
}
