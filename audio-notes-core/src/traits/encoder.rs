use crate::models::audio_models::PcmAudio;
use crate::models::encoding::AudioEncoding;
use crate::models::error::RecorderError;

/// Turns captured PCM into the bytes of one audio file.
///
/// The registry asks `is_supported` before selecting an encoder, so an
/// encoder backed by an optional system library can decline at runtime.
pub trait AudioEncoder: Send + Sync {
    fn encoding(&self) -> AudioEncoding;

    fn is_supported(&self) -> bool {
        true
    }

    fn encode(&self, audio: &PcmAudio) -> Result<Vec<u8>, RecorderError>;
}
