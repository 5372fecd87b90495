//! Pure-math helpers over interleaved f32 sample buffers.
//!
//! No platform dependencies: used by the controller for metering, by the WAV
//! encoder for quantisation, and by playback to fit decoded audio to the
//! output device.

/// Downmix interleaved multi-channel audio to mono by averaging channels per frame.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let scale = 1.0 / channels as f32;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// Re-lay interleaved audio from `from` channels to `to` channels.
///
/// Mono is duplicated into every output channel; anything downmixed to mono is
/// averaged. Otherwise channels are copied by index and missing ones are silent.
pub fn remap_channels(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }
    if to == 1 {
        return downmix_to_mono(samples, from);
    }

    let frame_count = samples.len() / from;
    let mut output = vec![0.0f32; frame_count * to];
    for (frame, out) in samples.chunks_exact(from).zip(output.chunks_exact_mut(to)) {
        if from == 1 {
            out.fill(frame[0]);
        } else {
            let shared = from.min(to);
            out[..shared].copy_from_slice(&frame[..shared]);
        }
    }
    output
}

/// Linear interpolation resampling for interleaved audio with any channel count.
///
/// Returns input unchanged if rates match. Rates that are not positive and
/// finite leave the input unchanged as well.
pub fn resample(samples: &[f32], channels: usize, source_rate: f64, target_rate: f64) -> Vec<f32> {
    if (source_rate - target_rate).abs() < 0.01 || samples.is_empty() || channels == 0 {
        return samples.to_vec();
    }
    if !valid_rate(source_rate) || !valid_rate(target_rate) {
        log::warn!("Not resampling between {} Hz and {} Hz", source_rate, target_rate);
        return samples.to_vec();
    }

    let frame_count = samples.len() / channels;
    let ratio = target_rate / source_rate;
    let output_frames = (frame_count as f64 * ratio) as usize;
    if output_frames == 0 {
        return Vec::new();
    }

    let mut output = vec![0.0f32; output_frames * channels];
    for i in 0..output_frames {
        let source_index = i as f64 / ratio;
        let index = source_index as usize;
        let fraction = (source_index - index as f64) as f32;

        for ch in 0..channels {
            let out = &mut output[i * channels + ch];
            if index + 1 < frame_count {
                *out = samples[index * channels + ch] * (1.0 - fraction)
                    + samples[(index + 1) * channels + ch] * fraction;
            } else if index < frame_count {
                *out = samples[index * channels + ch];
            }
        }
    }
    output
}

fn valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Quantise one sample to 16-bit, clamping out-of-range values.
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

pub fn from_i16(sample: i16) -> f32 {
    sample as f32 / i16::MAX as f32
}

/// Convert f32 samples `[-1.0, 1.0]` to 16-bit PCM (little-endian bytes).
///
/// Output length = `samples.len() * 2` bytes.
pub fn convert_to_int16_pcm(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        data.extend_from_slice(&to_i16(sample).to_le_bytes());
    }
    data
}

/// RMS level of samples (0.0–1.0 for normalised audio).
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Peak absolute level of samples.
pub fn peak_level(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn downmix_stereo_to_mono() {
        let mono = downmix_to_mono(&[0.2, 0.8, 0.4, 0.6], 2);
        assert_eq!(mono.len(), 2);
        assert_relative_eq!(mono[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(mono[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn downmix_mono_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn remap_mono_to_stereo_duplicates() {
        assert_eq!(remap_channels(&[0.1, 0.2], 1, 2), vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn remap_stereo_to_quad_pads_with_silence() {
        assert_eq!(
            remap_channels(&[0.1, 0.2], 2, 4),
            vec![0.1, 0.2, 0.0, 0.0]
        );
    }

    #[test]
    fn remap_stereo_to_mono_averages() {
        let mono = remap_channels(&[1.0, 0.0], 2, 1);
        assert_relative_eq!(mono[0], 0.5);
    }

    #[test]
    fn convert_to_int16_pcm_values() {
        let pcm = convert_to_int16_pcm(&[0.0, 1.0, -1.0, 0.5]);
        assert_eq!(pcm.len(), 8);
        assert_eq!(i16::from_le_bytes([pcm[0], pcm[1]]), 0);
        assert_eq!(i16::from_le_bytes([pcm[2], pcm[3]]), i16::MAX);
        // -1.0 → -32767, not -32768
        assert_eq!(i16::from_le_bytes([pcm[4], pcm[5]]), -i16::MAX);
    }

    #[test]
    fn convert_clamps_out_of_range() {
        let pcm = convert_to_int16_pcm(&[2.0, -3.0]);
        assert_eq!(i16::from_le_bytes([pcm[0], pcm[1]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([pcm[2], pcm[3]]), -i16::MAX);
    }

    #[test]
    fn i16_round_trip_is_close() {
        assert_relative_eq!(from_i16(to_i16(0.25)), 0.25, epsilon = 1e-4);
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(resample(&samples, 1, 48000.0, 48000.0), samples);
    }

    #[test]
    fn resample_upsample_2x() {
        let result = resample(&[0.0, 1.0], 1, 24000.0, 48000.0);
        assert_eq!(result.len(), 4);
        assert_relative_eq!(result[0], 0.0, epsilon = 0.01);
        assert_relative_eq!(result[1], 0.5, epsilon = 0.1);
    }

    #[test]
    fn resample_ignores_zero_rates() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(resample(&samples, 1, 0.0, 48000.0), samples);
        assert_eq!(resample(&samples, 2, 48000.0, 0.0), samples);
    }

    #[test]
    fn resample_downsample_stereo_keeps_frames_interleaved() {
        let samples: Vec<f32> = (0..100).flat_map(|i| [i as f32, -(i as f32)]).collect();
        let result = resample(&samples, 2, 48000.0, 24000.0);
        assert_eq!(result.len(), 100);
        for frame in result.chunks_exact(2) {
            assert_relative_eq!(frame[0], -frame[1]);
        }
    }

    #[test]
    fn levels() {
        assert_eq!(rms_level(&[0.0, 0.0, 0.0]), 0.0);
        assert_relative_eq!(rms_level(&[1.0, 1.0, 1.0]), 1.0, epsilon = 1e-6);
        assert_relative_eq!(peak_level(&[0.1, -0.5, 0.3]), 0.5, epsilon = 1e-6);
    }
}
