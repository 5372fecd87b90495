//! Microphone permission probe.
//!
//! On macOS, opening an input stream triggers the system consent prompt and
//! fails once the user has refused. Linux and Windows desktop apps are
//! normally allowed unless a privacy toggle blocks the device.

use cpal::traits::DeviceTrait;

use audio_notes_core::models::error::RecorderError;

use crate::device_enumerator::DeviceEnumerator;
use crate::errors;

/// Check if microphone access is available.
///
/// Builds (and immediately drops) an input stream on the default device.
/// Returns `Ok(false)` when there is no device or access is refused.
pub fn check_microphone_permission() -> Result<bool, RecorderError> {
    let enumerator = DeviceEnumerator::new();
    let device = match enumerator.default_input_device() {
        Ok(d) => d,
        Err(_) => return Ok(false), // No capture device
    };

    let probe = device
        .default_input_config()
        .map_err(errors::from_default_config)
        .and_then(|supported| {
            device
                .build_input_stream(
                    &supported.into(),
                    |_: &[f32], _: &cpal::InputCallbackInfo| {},
                    |err| log::debug!("Permission probe stream error: {}", err),
                    None,
                )
                .map_err(errors::from_build)
        });

    interpret(probe.map(drop))
}

fn interpret(probe: Result<(), RecorderError>) -> Result<bool, RecorderError> {
    match probe {
        Ok(()) => Ok(true),
        Err(RecorderError::PermissionDenied) | Err(RecorderError::DeviceNotAvailable) => Ok(false),
        Err(e) => {
            // The device exists but rejected the probe format; access itself is not refused.
            log::warn!("Unexpected error checking mic permission: {}", e);
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_and_missing_device_mean_no_access() {
        assert_eq!(interpret(Err(RecorderError::PermissionDenied)), Ok(false));
        assert_eq!(interpret(Err(RecorderError::DeviceNotAvailable)), Ok(false));
    }

    #[test]
    fn format_errors_do_not_mean_refusal() {
        assert_eq!(
            interpret(Err(RecorderError::ConfigurationFailed("sample format".into()))),
            Ok(true)
        );
        assert_eq!(interpret(Ok(())), Ok(true));
    }
}
