use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::AudioLevels;
use crate::models::state::SessionState;
use crate::processing::waveform::WaveformTap;
use crate::session::controller::SharedSession;

/// Cloneable read-only handle onto a controller's live session.
///
/// The recording view polls this on its own thread at display cadence while
/// the controller stays with the caller.
#[derive(Clone)]
pub struct LiveMonitor {
    shared: Arc<Mutex<SharedSession>>,
    waveform: Arc<Mutex<WaveformTap>>,
}

impl LiveMonitor {
    pub(crate) fn new(
        shared: Arc<Mutex<SharedSession>>,
        waveform: Arc<Mutex<WaveformTap>>,
    ) -> Self {
        Self { shared, waveform }
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn levels(&self) -> AudioLevels {
        self.shared.lock().levels
    }

    /// Seconds since the session started, 0 when idle.
    pub fn elapsed_secs(&self) -> f64 {
        self.shared.lock().elapsed_duration()
    }

    /// Time-domain trace of the most recent input, `width` points in `[-1, 1]`.
    pub fn trace(&self, width: usize) -> Vec<f32> {
        self.waveform.lock().trace(width)
    }
}
