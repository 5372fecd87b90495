//! # audio-notes-cpal
//!
//! Cross-platform cpal backend for audio-notes.
//!
//! Provides:
//! - `CpalMicCapture` — Microphone capture via the platform's default cpal host
//! - `DeviceEnumerator` — Input/output device enumeration
//! - `CpalPlayer` — Playback of saved WAV recordings on the default output
//! - `permissions` — Microphone access probe
//!
//! ## Platform Requirements
//! - Linux: ALSA development headers (`libasound2-dev`) for linking
//!
//! ## Usage
//! ```ignore
//! use audio_notes_core::{EncoderRegistry, RecorderConfiguration, RecordingController};
//! use audio_notes_cpal::CpalMicCapture;
//!
//! let mic = CpalMicCapture::default_device();
//! let registry = EncoderRegistry::builtin();
//! let config = RecorderConfiguration::default();
//! let mut controller = RecordingController::from_config(mic, &registry, &config)?;
//! controller.start()?;
//! ```

pub mod cpal_mic;
pub mod device_enumerator;
mod errors;
pub mod permissions;
pub mod playback;

pub use cpal_mic::CpalMicCapture;
pub use device_enumerator::DeviceEnumerator;
pub use playback::CpalPlayer;
