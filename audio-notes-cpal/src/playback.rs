//! Playback of saved recordings on the default output device.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};

use audio_notes_core::models::audio_models::PcmAudio;
use audio_notes_core::models::error::RecorderError;
use audio_notes_core::processing::{pcm, wav_format};

use crate::device_enumerator::DeviceEnumerator;
use crate::errors;

/// Blocking player for decoded recordings.
///
/// `play` returns once the audio has been drained or the stop flag was set
/// from another thread. The flag stays set until the owner clears it, so a
/// stop requested while a file is still being decoded is honoured.
#[derive(Clone)]
pub struct CpalPlayer {
    stop: Arc<AtomicBool>,
}

impl Default for CpalPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpalPlayer {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that interrupts a running `play` when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Clear a previous stop request before starting the next playback.
    pub fn rearm(&self) {
        self.stop.store(false, Ordering::SeqCst);
    }

    /// Decode a WAV file and play it.
    pub fn play_file(&self, path: &Path) -> Result<(), RecorderError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RecorderError::StorageError(format!("{}: {}", path.display(), e)))?;
        let audio = wav_format::decode(&bytes)?;
        log::info!(
            "Playing {} ({:.1}s, {} Hz, {} ch)",
            path.display(),
            audio.duration_secs(),
            audio.sample_rate,
            audio.channels
        );
        self.play(&audio)
    }

    pub fn play(&self, audio: &PcmAudio) -> Result<(), RecorderError> {
        if audio.is_empty() || self.stop.load(Ordering::SeqCst) {
            return Ok(());
        }

        let device = DeviceEnumerator::new().default_output_device()?;
        let supported = device
            .default_output_config()
            .map_err(errors::from_default_config)?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();

        let samples = Arc::new(prepare(audio, config.sample_rate.0, config.channels));
        let position = Arc::new(AtomicUsize::new(0));

        let stream = match sample_format {
            SampleFormat::I16 => build_output_stream::<i16>(&device, &config, &samples, &position)?,
            SampleFormat::U16 => build_output_stream::<u16>(&device, &config, &samples, &position)?,
            SampleFormat::F32 => build_output_stream::<f32>(&device, &config, &samples, &position)?,
            other => {
                return Err(RecorderError::ConfigurationFailed(format!(
                    "unsupported output sample format {:?}",
                    other
                )))
            }
        };
        stream.play().map_err(errors::from_play)?;

        while position.load(Ordering::SeqCst) < samples.len() {
            if self.stop.load(Ordering::SeqCst) {
                log::debug!("Playback stopped early");
                return Ok(());
            }
            thread::sleep(Duration::from_millis(20));
        }
        // Let the device drain its last buffer before the stream is dropped.
        thread::sleep(Duration::from_millis(150));
        Ok(())
    }
}

/// Convert `audio` to the output device's rate and channel layout.
pub fn prepare(audio: &PcmAudio, sample_rate: u32, channels: u16) -> Vec<f32> {
    let resampled = pcm::resample(
        &audio.samples,
        audio.channels as usize,
        audio.sample_rate as f64,
        sample_rate as f64,
    );
    pcm::remap_channels(&resampled, audio.channels as usize, channels as usize)
}

fn build_output_stream<T>(
    device: &Device,
    config: &StreamConfig,
    samples: &Arc<Vec<f32>>,
    position: &Arc<AtomicUsize>,
) -> Result<Stream, RecorderError>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let samples = Arc::clone(samples);
    let position = Arc::clone(position);
    let err_fn = |err| log::error!("Playback stream error: {}", err);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let start = position.load(Ordering::SeqCst);
                let available = samples.len().saturating_sub(start).min(data.len());

                for (out, &sample) in data.iter_mut().zip(&samples[start..start + available]) {
                    *out = T::from_sample(sample);
                }
                for out in data.iter_mut().skip(available) {
                    *out = T::EQUILIBRIUM;
                }
                position.store(start + available, Ordering::SeqCst);
            },
            err_fn,
            None,
        )
        .map_err(errors::from_build)
}
