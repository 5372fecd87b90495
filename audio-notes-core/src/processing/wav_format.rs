//! WAV file format utilities.
//!
//! Generates standard 44-byte RIFF WAV headers, encodes whole recordings and
//! decodes saved files for playback.

use crate::models::audio_models::PcmAudio;
use crate::models::error::RecorderError;
use crate::processing::pcm;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (placeholder: 36 + data_size)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(
    sample_rate: u32,
    bit_depth: u16,
    channels: u16,
    data_size: u32,
) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = sample_rate * channels as u32 * bit_depth as u32 / 8;
    let block_align = channels * bit_depth / 8;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes()); // PCM format size
    header[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Encode interleaved f32 samples as a complete 16-bit PCM WAV file.
pub fn encode_pcm16(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
    let pcm = pcm::convert_to_int16_pcm(samples);
    let header = generate_wav_header(sample_rate, 16, channels, pcm.len() as u32);

    let mut file = Vec::with_capacity(WAV_HEADER_SIZE + pcm.len());
    file.extend_from_slice(&header);
    file.extend_from_slice(&pcm);
    file
}

/// Decode a PCM (16-bit integer) or IEEE float (32-bit) WAV file.
///
/// Walks the RIFF chunk list, so files with extra chunks (`LIST`, `fact`)
/// before `data` decode too. A data size running past the end of the file is
/// clamped to what is present.
pub fn decode(bytes: &[u8]) -> Result<PcmAudio, RecorderError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(RecorderError::EncodingFailed("not a RIFF/WAVE file".into()));
    }

    let mut format: Option<(u16, u16, u32, u16)> = None;
    let mut offset = 12;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = u32::from_le_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]) as usize;
        let body_start = offset + 8;
        let body_end = body_start.saturating_add(size).min(bytes.len());
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(RecorderError::EncodingFailed("truncated fmt chunk".into()));
                }
                let code = u16::from_le_bytes([body[0], body[1]]);
                let channels = u16::from_le_bytes([body[2], body[3]]);
                let sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
                let bit_depth = u16::from_le_bytes([body[14], body[15]]);
                format = Some((code, channels, sample_rate, bit_depth));
            }
            b"data" => {
                let (code, channels, sample_rate, bit_depth) = format.ok_or_else(|| {
                    RecorderError::EncodingFailed("data chunk before fmt chunk".into())
                })?;
                if channels == 0 {
                    return Err(RecorderError::EncodingFailed("zero channels".into()));
                }
                if sample_rate == 0 {
                    return Err(RecorderError::EncodingFailed("zero sample rate".into()));
                }
                let samples = match (code, bit_depth) {
                    (FORMAT_PCM, 16) => body
                        .chunks_exact(2)
                        .map(|b| pcm::from_i16(i16::from_le_bytes([b[0], b[1]])))
                        .collect(),
                    (FORMAT_IEEE_FLOAT, 32) => body
                        .chunks_exact(4)
                        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                        .collect(),
                    _ => {
                        return Err(RecorderError::EncodingFailed(format!(
                            "unsupported WAV format {} with {} bits",
                            code, bit_depth
                        )))
                    }
                };
                return Ok(PcmAudio {
                    samples,
                    sample_rate,
                    channels,
                });
            }
            _ => {}
        }

        // Chunks are word aligned.
        offset = body_start.saturating_add(size).saturating_add(size & 1);
    }

    Err(RecorderError::EncodingFailed("no data chunk".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size_is_44_bytes() {
        let header = generate_wav_header(48000, 16, 2, 0);
        assert_eq!(header.len(), 44);
    }

    #[test]
    fn header_riff_magic() {
        let header = generate_wav_header(48000, 16, 2, 0);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_pcm_format() {
        let header = generate_wav_header(48000, 16, 2, 0);
        // Format code = 1 (PCM)
        assert_eq!(u16::from_le_bytes([header[20], header[21]]), 1);
        // fmt chunk size = 16
        assert_eq!(u32::from_le_bytes([header[16], header[17], header[18], header[19]]), 16);
    }

    #[test]
    fn header_48khz_stereo_16bit() {
        let header = generate_wav_header(48000, 16, 2, 9600);

        let channels = u16::from_le_bytes([header[22], header[23]]);
        assert_eq!(channels, 2);

        let sample_rate = u32::from_le_bytes([header[24], header[25], header[26], header[27]]);
        assert_eq!(sample_rate, 48000);

        let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
        assert_eq!(byte_rate, 192000); // 48000 * 2 * 16/8

        let block_align = u16::from_le_bytes([header[32], header[33]]);
        assert_eq!(block_align, 4); // 2 * 16/8

        let bit_depth = u16::from_le_bytes([header[34], header[35]]);
        assert_eq!(bit_depth, 16);

        let data_size = u32::from_le_bytes([header[40], header[41], header[42], header[43]]);
        assert_eq!(data_size, 9600);

        let chunk_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        assert_eq!(chunk_size, 36 + 9600);
    }

    #[test]
    fn encode_writes_exact_sizes() {
        let file = encode_pcm16(&[0.0, 0.5, -0.5, 1.0], 16000, 1);
        assert_eq!(file.len(), WAV_HEADER_SIZE + 8);

        let data_size = u32::from_le_bytes([file[40], file[41], file[42], file[43]]);
        assert_eq!(data_size, 8);
        let chunk_size = u32::from_le_bytes([file[4], file[5], file[6], file[7]]);
        assert_eq!(chunk_size as usize, file.len() - 8);
    }

    #[test]
    fn decode_reads_back_encoded_file() {
        let file = encode_pcm16(&[0.25, -0.25, 0.5, -0.5], 44100, 2);
        let audio = decode(&file).unwrap();

        assert_eq!(audio.sample_rate, 44100);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frame_count(), 2);
        assert!((audio.samples[0] - 0.25).abs() < 1e-3);
        assert!((audio.samples[3] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn decode_skips_unknown_chunks() {
        let encoded = encode_pcm16(&[0.5, 0.5], 8000, 1);

        // RIFF header + fmt chunk, then an odd-sized LIST chunk, then data.
        let mut file = encoded[..36].to_vec();
        file.extend_from_slice(b"LIST");
        file.extend_from_slice(&3u32.to_le_bytes());
        file.extend_from_slice(&[1, 2, 3, 0]);
        file.extend_from_slice(&encoded[36..]);

        let audio = decode(&file).unwrap();
        assert_eq!(audio.samples.len(), 2);
    }

    #[test]
    fn decode_rejects_non_wav() {
        assert!(matches!(decode(b"ID3 not a wav file"), Err(RecorderError::EncodingFailed(_))));
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn decode_rejects_unsupported_bit_depth() {
        let mut file = encode_pcm16(&[0.0; 4], 8000, 1);
        file[34..36].copy_from_slice(&24u16.to_le_bytes());
        assert!(decode(&file).is_err());
    }

    #[test]
    fn decode_rejects_zero_sample_rate() {
        let mut file = generate_wav_header(0, 16, 1, 8).to_vec();
        file.extend_from_slice(&[0u8; 8]);
        assert_eq!(
            decode(&file),
            Err(RecorderError::EncodingFailed("zero sample rate".into()))
        );
    }
}
