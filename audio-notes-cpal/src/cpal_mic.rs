//! cpal microphone capture provider.
//!
//! Opens an input stream on the default (or a named) device and delivers
//! interleaved f32 samples via the `AudioBufferCallback`. The cpal `Stream` is
//! not `Send` on every backend, so it is created, played and dropped on a
//! dedicated capture thread owned by the provider.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use parking_lot::Mutex;

use audio_notes_core::models::audio_models::{AudioSource, StreamFormat};
use audio_notes_core::models::error::RecorderError;
use audio_notes_core::traits::capture_provider::{AudioBufferCallback, CaptureProvider};

use crate::device_enumerator::DeviceEnumerator;
use crate::errors;

/// Microphone capture through cpal.
pub struct CpalMicCapture {
    device_name: Option<String>,
    active_name: String,
    running: Arc<AtomicBool>,
    capture_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalMicCapture {
    /// Create a capture for the system default microphone.
    pub fn default_device() -> Self {
        Self {
            device_name: None,
            active_name: "Default Microphone".into(),
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        }
    }

    /// Create a capture for a specific microphone by name.
    pub fn with_device(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            active_name: name.clone(),
            device_name: Some(name),
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        }
    }

    /// Default device when `name` is `None`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(name) => Self::with_device(name),
            None => Self::default_device(),
        }
    }

    fn join_capture_thread(&self) {
        if let Some(handle) = self.capture_handle.lock().take() {
            if handle.join().is_err() {
                log::error!("Mic capture thread panicked");
            }
        }
    }
}

impl CaptureProvider for CpalMicCapture {
    fn is_available(&self) -> bool {
        let enumerator = DeviceEnumerator::new();
        match self.device_name {
            Some(ref name) => enumerator.find_input_device(name).is_ok(),
            None => enumerator.default_input_device().is_ok(),
        }
    }

    fn start(&mut self, callback: AudioBufferCallback) -> Result<StreamFormat, RecorderError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(RecorderError::ConfigurationFailed(
                "mic capture already running".into(),
            ));
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let device_name = self.device_name.clone();
        let (init_tx, init_rx) =
            mpsc::sync_channel::<Result<(StreamFormat, String), RecorderError>>(1);

        let handle = thread::Builder::new()
            .name("cpal-mic-capture".into())
            .spawn(move || {
                match open_input_stream(device_name.as_deref(), callback) {
                    Ok((stream, format, name)) => {
                        let _ = init_tx.send(Ok((format, name)));
                        while running.load(Ordering::SeqCst) {
                            thread::sleep(Duration::from_millis(20));
                        }
                        drop(stream);
                        log::debug!("Mic input stream closed");
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e));
                    }
                }
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                RecorderError::Unknown(format!("failed to spawn mic thread: {}", e))
            })?;

        *self.capture_handle.lock() = Some(handle);

        match init_rx.recv() {
            Ok(Ok((format, name))) => {
                log::info!(
                    "Mic capture started on {} ({} Hz, {} ch)",
                    name,
                    format.sample_rate,
                    format.channels
                );
                self.active_name = name;
                Ok(format)
            }
            Ok(Err(e)) => {
                self.join_capture_thread();
                Err(e)
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                self.join_capture_thread();
                Err(RecorderError::Unknown("mic thread exited during setup".into()))
            }
        }
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        self.running.store(false, Ordering::SeqCst);
        self.join_capture_thread();
        Ok(())
    }

    fn device_info(&self) -> AudioSource {
        AudioSource {
            id: self.device_name.clone().unwrap_or_else(|| "default-mic".into()),
            name: self.active_name.clone(),
            is_default: self.device_name.is_none(),
        }
    }
}

impl Drop for CpalMicCapture {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.join_capture_thread();
    }
}

/// Open and play the input stream. Runs on the capture thread.
fn open_input_stream(
    device_name: Option<&str>,
    callback: AudioBufferCallback,
) -> Result<(Stream, StreamFormat, String), RecorderError> {
    let enumerator = DeviceEnumerator::new();
    let device = match device_name {
        Some(name) => enumerator.find_input_device(name)?,
        None => enumerator.default_input_device()?,
    };
    let name = device.name().unwrap_or_else(|_| "Unknown Microphone".into());

    let supported = device
        .default_input_config()
        .map_err(errors::from_default_config)?;
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.into();
    let format = StreamFormat {
        sample_rate: config.sample_rate.0 as f64,
        channels: config.channels,
    };

    log::debug!(
        "Opening {} on {}: {} Hz, {} ch, {:?}",
        name,
        enumerator.host_name(),
        config.sample_rate.0,
        config.channels,
        sample_format
    );

    let stream = match sample_format {
        SampleFormat::I16 => build_input_stream::<i16>(&device, &config, callback)?,
        SampleFormat::U16 => build_input_stream::<u16>(&device, &config, callback)?,
        SampleFormat::F32 => build_input_stream::<f32>(&device, &config, callback)?,
        other => {
            return Err(RecorderError::ConfigurationFailed(format!(
                "unsupported input sample format {:?}",
                other
            )))
        }
    };
    stream.play().map_err(errors::from_play)?;

    Ok((stream, format, name))
}

fn build_input_stream<T>(
    device: &Device,
    config: &StreamConfig,
    callback: AudioBufferCallback,
) -> Result<Stream, RecorderError>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let sample_rate = config.sample_rate.0 as f64;
    let channels = config.channels;
    let err_fn = |err| log::error!("Mic stream error: {}", err);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let samples: Vec<f32> =
                    data.iter().map(|&s| cpal::Sample::from_sample(s)).collect();
                callback(&samples, sample_rate, channels);
            },
            err_fn,
            None,
        )
        .map_err(errors::from_build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_device_info() {
        let mic = CpalMicCapture::with_device("USB Mic");
        let info = mic.device_info();
        assert_eq!(info.id, "USB Mic");
        assert_eq!(info.name, "USB Mic");
        assert!(!info.is_default);
    }

    #[test]
    fn default_device_info() {
        let info = CpalMicCapture::from_name(None).device_info();
        assert_eq!(info.id, "default-mic");
        assert!(info.is_default);
    }

    #[test]
    fn stop_without_start_is_ok() {
        let mut mic = CpalMicCapture::default_device();
        assert!(mic.stop().is_ok());
    }
}
