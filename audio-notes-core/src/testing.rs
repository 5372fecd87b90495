//! Test doubles for unit tests here and in dependent crates (`testing` feature).

use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::audio_models::{AudioLevels, AudioSource, StreamFormat};
use crate::models::error::RecorderError;
use crate::models::state::SessionState;
use crate::traits::capture_provider::{AudioBufferCallback, CaptureProvider};
use crate::traits::notifier::{Notice, Notifier};
use crate::traits::session_delegate::SessionDelegate;

#[derive(Default)]
pub struct CaptureStats {
    starts: AtomicUsize,
    open_streams: AtomicIsize,
}

impl CaptureStats {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn open_streams(&self) -> isize {
        self.open_streams.load(Ordering::SeqCst)
    }
}

/// Provider that delivers a fixed list of buffers synchronously on start.
pub struct ScriptedCapture {
    script: Vec<Vec<f32>>,
    format: StreamFormat,
    failure: Option<RecorderError>,
    delay: Option<Duration>,
    open: bool,
    stats: Arc<CaptureStats>,
}

impl ScriptedCapture {
    pub fn new(script: Vec<Vec<f32>>) -> Self {
        Self {
            script,
            format: StreamFormat {
                sample_rate: 48000.0,
                channels: 1,
            },
            failure: None,
            delay: None,
            open: false,
            stats: Arc::new(CaptureStats::default()),
        }
    }

    pub fn failing(error: RecorderError) -> Self {
        let mut provider = Self::new(Vec::new());
        provider.failure = Some(error);
        provider
    }

    pub fn with_format(mut self, sample_rate: f64, channels: u16) -> Self {
        self.format = StreamFormat {
            sample_rate,
            channels,
        };
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn stats(&self) -> Arc<CaptureStats> {
        Arc::clone(&self.stats)
    }
}

impl CaptureProvider for ScriptedCapture {
    fn is_available(&self) -> bool {
        self.failure.is_none()
    }

    fn start(&mut self, callback: AudioBufferCallback) -> Result<StreamFormat, RecorderError> {
        if let Some(ref e) = self.failure {
            return Err(e.clone());
        }
        self.stats.starts.fetch_add(1, Ordering::SeqCst);
        self.stats.open_streams.fetch_add(1, Ordering::SeqCst);
        self.open = true;

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        for chunk in &self.script {
            callback(chunk, self.format.sample_rate, self.format.channels);
        }
        Ok(self.format)
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        if self.open {
            self.open = false;
            self.stats.open_streams.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn device_info(&self) -> AudioSource {
        AudioSource {
            id: "scripted".into(),
            name: "Scripted Microphone".into(),
            is_default: true,
        }
    }
}

#[derive(Default)]
pub struct CollectingDelegate {
    states: Mutex<Vec<&'static str>>,
    errors: Mutex<Vec<RecorderError>>,
}

impl CollectingDelegate {
    pub fn states(&self) -> Vec<&'static str> {
        self.states.lock().clone()
    }

    pub fn errors(&self) -> Vec<RecorderError> {
        self.errors.lock().clone()
    }
}

impl SessionDelegate for CollectingDelegate {
    fn on_state_changed(&self, state: &SessionState) {
        self.states.lock().push(state.label());
    }

    fn on_levels_updated(&self, _levels: &AudioLevels) {}

    fn on_error(&self, error: &RecorderError) {
        self.errors.lock().push(error.clone());
    }
}

#[derive(Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
