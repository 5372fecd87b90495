//! Audio device enumeration via the cpal default host.
//!
//! cpal exposes no stable device IDs, so the device name doubles as the ID.

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

use audio_notes_core::models::audio_models::AudioSource;
use audio_notes_core::models::error::RecorderError;

/// Audio device enumerator for the platform's default host.
pub struct DeviceEnumerator {
    host: Host,
}

impl Default for DeviceEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceEnumerator {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// Name of the audio backend in use (ALSA, CoreAudio, WASAPI, ...).
    pub fn host_name(&self) -> &'static str {
        self.host.id().name()
    }

    /// List input (microphone) devices.
    pub fn list_input_devices(&self) -> Result<Vec<AudioSource>, RecorderError> {
        let default_name = self.host.default_input_device().and_then(|d| d.name().ok());
        let devices = self
            .host
            .input_devices()
            .map_err(|e| {
                RecorderError::Unknown(format!("failed to enumerate input devices: {}", e))
            })?;
        Ok(describe_all(devices, default_name.as_deref()))
    }

    /// List output devices.
    pub fn list_output_devices(&self) -> Result<Vec<AudioSource>, RecorderError> {
        let default_name = self.host.default_output_device().and_then(|d| d.name().ok());
        let devices = self
            .host
            .output_devices()
            .map_err(|e| {
                RecorderError::Unknown(format!("failed to enumerate output devices: {}", e))
            })?;
        Ok(describe_all(devices, default_name.as_deref()))
    }

    pub fn default_input_device(&self) -> Result<Device, RecorderError> {
        self.host
            .default_input_device()
            .ok_or(RecorderError::DeviceNotAvailable)
    }

    pub fn default_output_device(&self) -> Result<Device, RecorderError> {
        self.host
            .default_output_device()
            .ok_or(RecorderError::DeviceNotAvailable)
    }

    /// Find an input device by name.
    ///
    /// An exact match wins; otherwise the first case-insensitive match is used.
    pub fn find_input_device(&self, name: &str) -> Result<Device, RecorderError> {
        let devices: Vec<Device> = self
            .host
            .input_devices()
            .map_err(|e| {
                RecorderError::Unknown(format!("failed to enumerate input devices: {}", e))
            })?
            .collect();
        let names: Vec<String> = devices
            .iter()
            .map(|d| d.name().unwrap_or_default())
            .collect();

        match pick_device(&names, name) {
            Some(index) => devices
                .into_iter()
                .nth(index)
                .ok_or(RecorderError::DeviceNotAvailable),
            None => {
                log::warn!("Input device {:?} not found among {:?}", name, names);
                Err(RecorderError::DeviceNotAvailable)
            }
        }
    }
}

fn describe_all(
    devices: impl Iterator<Item = Device>,
    default_name: Option<&str>,
) -> Vec<AudioSource> {
    devices
        .filter_map(|device| match device.name() {
            Ok(name) => Some(AudioSource {
                id: name.clone(),
                is_default: default_name == Some(name.as_str()),
                name,
            }),
            Err(e) => {
                log::debug!("Skipping device without a name: {}", e);
                None
            }
        })
        .collect()
}

/// Index of the device called `wanted`: exact match first, then case-insensitive.
fn pick_device(names: &[String], wanted: &str) -> Option<usize> {
    let wanted = wanted.trim();
    names
        .iter()
        .position(|n| n == wanted)
        .or_else(|| names.iter().position(|n| n.eq_ignore_ascii_case(wanted)))
}
