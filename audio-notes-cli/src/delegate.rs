use audio_notes_core::{AudioLevels, RecorderError, SessionDelegate, SessionState};

/// SessionDelegate that forwards session events to the log.
pub struct LoggingDelegate;

impl SessionDelegate for LoggingDelegate {
    fn on_state_changed(&self, state: &SessionState) {
        match state {
            SessionState::Armed { duration_secs } if *duration_secs > 0.0 => {
                log::trace!("Recording: {:.1}s", duration_secs)
            }
            _ => log::debug!("Session state: {}", state.label()),
        }
    }

    fn on_levels_updated(&self, levels: &AudioLevels) {
        log::trace!("Levels: rms {:.3}, peak {:.3}", levels.level, levels.peak_level);
    }

    fn on_error(&self, error: &RecorderError) {
        log::warn!("Session error: {}", error);
    }
}
