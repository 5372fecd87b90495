use crate::models::audio_models::AudioLevels;
use crate::models::error::RecorderError;
use crate::models::state::SessionState;

/// Event delegate for capture session notifications.
///
/// Methods may be called from the duration timer thread, not the caller's
/// thread. Implementations should marshal to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &SessionState);

    /// Called periodically with updated input levels while armed.
    fn on_levels_updated(&self, levels: &AudioLevels);

    /// Called when starting or finalizing a session fails.
    fn on_error(&self, error: &RecorderError);
}
