//! Mapping of cpal errors onto `RecorderError`.
//!
//! cpal has no dedicated permission error; backends report a refused
//! microphone as a backend-specific message, so that text is inspected.

use cpal::{BackendSpecificError, BuildStreamError, DefaultStreamConfigError, PlayStreamError};

use audio_notes_core::models::error::RecorderError;

const DENIAL_MARKERS: [&str; 4] = [
    "permission",
    "access denied",
    "access is denied",
    "not authorized",
];

fn from_backend(err: &BackendSpecificError, context: &str) -> RecorderError {
    let description = err.description.to_lowercase();
    if DENIAL_MARKERS.iter().any(|m| description.contains(m)) {
        RecorderError::PermissionDenied
    } else {
        RecorderError::ConfigurationFailed(format!("{}: {}", context, err.description))
    }
}

pub(crate) fn from_build(err: BuildStreamError) -> RecorderError {
    match err {
        BuildStreamError::DeviceNotAvailable => RecorderError::DeviceNotAvailable,
        BuildStreamError::BackendSpecific { err } => from_backend(&err, "failed to build stream"),
        other => RecorderError::ConfigurationFailed(format!("failed to build stream: {}", other)),
    }
}

pub(crate) fn from_default_config(err: DefaultStreamConfigError) -> RecorderError {
    match err {
        DefaultStreamConfigError::DeviceNotAvailable => RecorderError::DeviceNotAvailable,
        DefaultStreamConfigError::BackendSpecific { err } => {
            from_backend(&err, "no default stream config")
        }
        other => RecorderError::ConfigurationFailed(format!("no default stream config: {}", other)),
    }
}

pub(crate) fn from_play(err: PlayStreamError) -> RecorderError {
    match err {
        PlayStreamError::DeviceNotAvailable => RecorderError::DeviceNotAvailable,
        PlayStreamError::BackendSpecific { err } => from_backend(&err, "failed to start stream"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(description: &str) -> BackendSpecificError {
        BackendSpecificError {
            description: description.into(),
        }
    }

    #[test]
    fn device_loss_maps_to_device_not_available() {
        assert_eq!(
            from_build(BuildStreamError::DeviceNotAvailable),
            RecorderError::DeviceNotAvailable
        );
        assert_eq!(
            from_play(PlayStreamError::DeviceNotAvailable),
            RecorderError::DeviceNotAvailable
        );
    }

    #[test]
    fn refused_access_maps_to_permission_denied() {
        let err = BuildStreamError::BackendSpecific {
            err: backend("Access Denied by the user"),
        };
        assert_eq!(from_build(err), RecorderError::PermissionDenied);

        let err = DefaultStreamConfigError::BackendSpecific {
            err: backend("Microphone permission not granted"),
        };
        assert_eq!(from_default_config(err), RecorderError::PermissionDenied);
    }

    #[test]
    fn device_access_failure_is_not_a_denial() {
        let err = BuildStreamError::BackendSpecific {
            err: backend("cannot access device hw:1,0"),
        };
        let expected = "failed to build stream: cannot access device hw:1,0";
        assert_eq!(from_build(err), RecorderError::ConfigurationFailed(expected.into()));

        let err = PlayStreamError::BackendSpecific {
            err: backend("Access is denied."),
        };
        assert_eq!(from_play(err), RecorderError::PermissionDenied);
    }

    #[test]
    fn other_backend_errors_keep_description() {
        let err = BuildStreamError::BackendSpecific {
            err: backend("buffer size out of range"),
        };
        let expected = "failed to build stream: buffer size out of range";
        assert_eq!(from_build(err), RecorderError::ConfigurationFailed(expected.into()));
    }
}
