use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::encoding::AudioEncoding;

/// An audio input device available for capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSource {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Native format of the stream a provider delivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFormat {
    pub sample_rate: f64,
    pub channels: u16,
}

/// Handle describing a live capture stream, returned by a successful start.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub session_id: Uuid,
    pub device: AudioSource,
    pub encoding: AudioEncoding,
}

/// Real-time input level metering (RMS and peak, 0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioLevels {
    pub level: f32,
    pub peak_level: f32,
}

/// Uncompressed interleaved audio, the input to every encoder and the output
/// of decoding for playback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PcmAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmAudio {
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
