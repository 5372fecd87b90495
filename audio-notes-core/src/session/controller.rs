use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::audio_models::{AudioLevels, AudioSource, PcmAudio, StreamFormat, StreamInfo};
use crate::models::config::RecorderConfiguration;
use crate::models::encoding::AudioEncoding;
use crate::models::error::RecorderError;
use crate::models::recording::AudioBlob;
use crate::models::state::SessionState;
use crate::processing::chunks::ChunkBuffer;
use crate::processing::encoders::EncoderRegistry;
use crate::processing::pcm;
use crate::processing::waveform::WaveformTap;
use crate::session::monitor::LiveMonitor;
use crate::traits::capture_provider::{AudioBufferCallback, CaptureProvider};
use crate::traits::encoder::AudioEncoder;
use crate::traits::session_delegate::SessionDelegate;

/// Mutable session state shared with the capture callback and timer thread.
pub(crate) struct SharedSession {
    pub(crate) state: SessionState,
    pub(crate) levels: AudioLevels,
    pub(crate) capture_start: Option<Instant>,
    session_id: Option<Uuid>,
    chunks: ChunkBuffer,
    format: Option<StreamFormat>,
    /// Cleared at the start of finalize so late callbacks are ignored.
    accepting: bool,
    limit_logged: bool,
}

impl SharedSession {
    fn new() -> Self {
        Self {
            state: SessionState::Idle,
            levels: AudioLevels::default(),
            capture_start: None,
            session_id: None,
            chunks: ChunkBuffer::new(),
            format: None,
            accepting: false,
            limit_logged: false,
        }
    }

    pub(crate) fn elapsed_duration(&self) -> f64 {
        self.capture_start
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Owns the one capture session of the application.
///
/// ```text
/// [CaptureProvider] → callback ─┬→ [ChunkBuffer] ─(stop)→ [AudioEncoder] → AudioBlob
///                               └→ [WaveformTap] → LiveMonitor (recording view)
/// ```
///
/// Every transition goes through `&mut self`, so the state check and the
/// provider start can never interleave with another start.
pub struct RecordingController<P: CaptureProvider> {
    provider: P,
    encoder: Arc<dyn AudioEncoder>,
    max_duration_secs: Option<f64>,
    shared: Arc<Mutex<SharedSession>>,
    waveform: Arc<Mutex<WaveformTap>>,
    delegate: Option<Arc<dyn SessionDelegate>>,

    // Duration timer thread control
    timer_running: Arc<AtomicBool>,
    timer_handle: Option<thread::JoinHandle<()>>,
}

impl<P: CaptureProvider> RecordingController<P> {
    pub fn new(provider: P, encoder: Arc<dyn AudioEncoder>) -> Self {
        Self {
            provider,
            encoder,
            max_duration_secs: None,
            shared: Arc::new(Mutex::new(SharedSession::new())),
            waveform: Arc::new(Mutex::new(WaveformTap::default())),
            delegate: None,
            timer_running: Arc::new(AtomicBool::new(false)),
            timer_handle: None,
        }
    }

    /// Controller using the first supported encoding from the configuration.
    pub fn from_config(
        provider: P,
        registry: &EncoderRegistry,
        config: &RecorderConfiguration,
    ) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::ConfigurationFailed)?;
        let mut controller = Self::new(provider, registry.select(&config.encoding_preference));
        controller.max_duration_secs = config.max_duration_secs;
        Ok(controller)
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn set_max_duration(&mut self, max_duration_secs: Option<f64>) {
        self.max_duration_secs = max_duration_secs;
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn is_recording(&self) -> bool {
        !self.state().is_idle()
    }

    pub fn encoding(&self) -> AudioEncoding {
        self.encoder.encoding()
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    pub fn device_info(&self) -> AudioSource {
        self.provider.device_info()
    }

    /// Read-only view of the live session for visualisation.
    pub fn monitor(&self) -> LiveMonitor {
        LiveMonitor::new(Arc::clone(&self.shared), Arc::clone(&self.waveform))
    }

    /// Open the input stream and begin buffering. Transitions: idle → armed.
    pub fn start(&mut self) -> Result<StreamInfo, RecorderError> {
        {
            let s = self.shared.lock();
            if !s.state.is_idle() {
                return Err(RecorderError::InvalidState(format!(
                    "cannot start a recording while {}",
                    s.state.label()
                )));
            }
        }

        let session_id = Uuid::new_v4();
        {
            let mut s = self.shared.lock();
            s.chunks.clear();
            s.levels = AudioLevels::default();
            s.format = None;
            s.limit_logged = false;
            s.capture_start = Some(Instant::now());
            s.accepting = true;
        }
        self.waveform.lock().reset();

        let callback = self.capture_callback();
        let format = match self.provider.start(callback) {
            Ok(format) => format,
            Err(e) => {
                {
                    let mut s = self.shared.lock();
                    s.accepting = false;
                    s.capture_start = None;
                    s.chunks.clear();
                }
                log::warn!("Failed to start recording: {}", e);
                self.report_error(&e);
                return Err(e);
            }
        };

        {
            let mut s = self.shared.lock();
            s.session_id = Some(session_id);
            if s.format.is_none() {
                s.format = Some(format);
            }
        }
        self.set_state(SessionState::Armed { duration_secs: 0.0 });
        self.start_duration_timer();

        let device = self.provider.device_info();
        log::info!(
            "Recording session {} started on {} ({} Hz, {} ch, {})",
            session_id,
            device.name,
            format.sample_rate,
            format.channels,
            self.encoder.encoding()
        );

        Ok(StreamInfo {
            session_id,
            device,
            encoding: self.encoder.encoding(),
        })
    }

    /// Finalize the session into one encoded blob.
    /// Transitions: armed → finalizing → idle.
    ///
    /// With no active session this resolves to an empty blob.
    pub fn stop(&mut self) -> Result<AudioBlob, RecorderError> {
        {
            let s = self.shared.lock();
            match s.state {
                SessionState::Idle => {
                    log::debug!("Stop requested with no active session");
                    return Ok(AudioBlob::empty(self.encoder.encoding()));
                }
                SessionState::Finalizing => {
                    return Err(RecorderError::InvalidState("session is already finalizing".into()));
                }
                SessionState::Armed { .. } => {}
            }
        }

        self.set_state(SessionState::Finalizing);
        let (audio, session_id) = self.release_session();

        if audio.is_empty() {
            self.set_state(SessionState::Idle);
            log::info!("Recording session {:?} captured no audio", session_id);
            return Ok(AudioBlob::empty(self.encoder.encoding()));
        }

        let encoded = self.encoder.encode(&audio);
        self.set_state(SessionState::Idle);

        let bytes = encoded.map_err(|e| {
            log::error!("Failed to encode recording: {}", e);
            self.report_error(&e);
            e
        })?;

        log::info!(
            "Recording session {:?} finalized: {:.2}s, {} bytes",
            session_id,
            audio.duration_secs(),
            bytes.len()
        );

        Ok(AudioBlob {
            encoding: self.encoder.encoding(),
            bytes,
            duration_secs: audio.duration_secs(),
        })
    }

    /// Stop capturing and discard everything buffered. No-op when idle.
    pub fn cancel(&mut self) {
        if !self.state().is_armed() {
            return;
        }
        self.set_state(SessionState::Finalizing);
        let (audio, session_id) = self.release_session();
        self.set_state(SessionState::Idle);
        log::info!(
            "Recording session {:?} cancelled, discarded {} samples",
            session_id,
            audio.samples.len()
        );
    }

    // --- Internal helpers ---

    fn set_state(&self, new_state: SessionState) {
        self.shared.lock().state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    fn report_error(&self, error: &RecorderError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }

    /// Release the device and take what was buffered.
    fn release_session(&mut self) -> (PcmAudio, Option<Uuid>) {
        self.shared.lock().accepting = false;

        if let Err(e) = self.provider.stop() {
            log::warn!("Failed to stop capture provider: {}", e);
        }

        self.timer_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.timer_handle.take() {
            let _ = handle.join();
        }

        let mut s = self.shared.lock();
        let audio = match s.format.take() {
            Some(format) => s
                .chunks
                .take(format.sample_rate.round() as u32, format.channels),
            None => {
                s.chunks.clear();
                PcmAudio::default()
            }
        };
        s.capture_start = None;
        s.levels = AudioLevels::default();
        (audio, s.session_id.take())
    }

    fn capture_callback(&self) -> AudioBufferCallback {
        let shared = Arc::clone(&self.shared);
        let waveform = Arc::clone(&self.waveform);
        let max_duration = self.max_duration_secs;

        Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
            let mono = pcm::downmix_to_mono(samples, channels as usize);
            let levels = AudioLevels {
                level: pcm::rms_level(&mono),
                peak_level: pcm::peak_level(&mono),
            };

            {
                let mut s = shared.lock();
                if !s.accepting {
                    return;
                }

                if let Some(max) = max_duration {
                    if s.elapsed_duration() > max {
                        if !s.limit_logged {
                            log::warn!(
                                "Maximum duration of {}s reached, dropping further input",
                                max
                            );
                            s.limit_logged = true;
                        }
                        return;
                    }
                }

                match s.format {
                    None => {
                        s.format = Some(StreamFormat {
                            sample_rate,
                            channels,
                        });
                    }
                    Some(format)
                        if format.channels != channels
                            || (format.sample_rate - sample_rate).abs() > 0.5 =>
                    {
                        log::warn!(
                            "Dropping buffer with format {} Hz/{} ch, session is {} Hz/{} ch",
                            sample_rate,
                            channels,
                            format.sample_rate,
                            format.channels
                        );
                        return;
                    }
                    Some(_) => {}
                }

                s.chunks.push(samples);
                s.levels = levels;
            }

            waveform.lock().write(&mono);
        })
    }

    /// Start the duration update timer (250ms).
    fn start_duration_timer(&mut self) {
        self.timer_running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.timer_running);
        let shared = Arc::clone(&self.shared);
        let delegate = self.delegate.clone();

        let spawned = thread::Builder::new()
            .name("duration-timer".into())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(250));

                    let mut s = shared.lock();
                    if let SessionState::Armed { .. } = s.state {
                        let duration_secs = s.elapsed_duration();
                        s.state = SessionState::Armed { duration_secs };
                        let levels = s.levels;
                        drop(s);

                        if let Some(ref d) = delegate {
                            d.on_levels_updated(&levels);
                        }
                    }
                }
            });

        match spawned {
            Ok(handle) => self.timer_handle = Some(handle),
            Err(e) => {
                self.timer_running.store(false, Ordering::SeqCst);
                log::warn!("Failed to spawn duration timer: {}", e);
            }
        }
    }
}

impl<P: CaptureProvider> Drop for RecordingController<P> {
    fn drop(&mut self) {
        if self.state().is_armed() {
            log::debug!("Dropping controller with an armed session, releasing device");
            self.cancel();
        }
    }
}
