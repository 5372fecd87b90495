use std::sync::Arc;

use crate::models::audio_models::PcmAudio;
use crate::models::encoding::AudioEncoding;
use crate::models::error::RecorderError;
use crate::processing::wav_format;
use crate::traits::encoder::AudioEncoder;

/// Built-in 16-bit PCM WAV encoder. Always supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder;

impl AudioEncoder for WavEncoder {
    fn encoding(&self) -> AudioEncoding {
        AudioEncoding::Wav
    }

    fn encode(&self, audio: &PcmAudio) -> Result<Vec<u8>, RecorderError> {
        if audio.channels == 0 || audio.sample_rate == 0 {
            return Err(RecorderError::EncodingFailed(format!(
                "invalid stream format: {} Hz, {} channels",
                audio.sample_rate, audio.channels
            )));
        }
        Ok(wav_format::encode_pcm16(&audio.samples, audio.sample_rate, audio.channels))
    }
}

/// The set of encoders available to the recorder.
///
/// Selection walks a preference list and takes the first supported encoding;
/// when nothing matches it falls back to the default encoder instead of failing.
#[derive(Clone)]
pub struct EncoderRegistry {
    encoders: Vec<Arc<dyn AudioEncoder>>,
    default: Arc<dyn AudioEncoder>,
}

impl EncoderRegistry {
    /// Registry with only the WAV encoder, which is also the fallback.
    pub fn builtin() -> Self {
        let wav: Arc<dyn AudioEncoder> = Arc::new(WavEncoder);
        Self {
            encoders: vec![Arc::clone(&wav)],
            default: wav,
        }
    }

    /// Registry with a caller-chosen fallback and no other encoders.
    pub fn with_default(default: Arc<dyn AudioEncoder>) -> Self {
        Self {
            encoders: Vec::new(),
            default,
        }
    }

    pub fn register(&mut self, encoder: Arc<dyn AudioEncoder>) {
        self.encoders.push(encoder);
    }

    pub fn is_supported(&self, encoding: AudioEncoding) -> bool {
        self.encoders
            .iter()
            .any(|e| e.encoding() == encoding && e.is_supported())
    }

    /// Pick the first supported encoding from `preferences`.
    pub fn select(&self, preferences: &[AudioEncoding]) -> Arc<dyn AudioEncoder> {
        for encoding in preferences {
            if let Some(encoder) = self
                .encoders
                .iter()
                .find(|e| e.encoding() == *encoding && e.is_supported())
            {
                log::debug!("Selected encoding {}", encoding);
                return Arc::clone(encoder);
            }
            log::debug!("Encoding {} not supported", encoding);
        }

        log::warn!(
            "None of {:?} is supported, falling back to {}",
            preferences,
            self.default.encoding()
        );
        Arc::clone(&self.default)
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
