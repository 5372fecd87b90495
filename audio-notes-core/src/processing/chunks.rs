use crate::models::audio_models::PcmAudio;

/// Ordered sequence of captured buffers for one session.
///
/// Chunks are kept as delivered and only concatenated once, on finalize.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<f32>>,
    total_samples: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }
        self.total_samples += samples.len();
        self.chunks.push(samples.to_vec());
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }

    /// Concatenate all chunks into one buffer and leave this one empty.
    pub fn take(&mut self, sample_rate: u32, channels: u16) -> PcmAudio {
        let mut samples = Vec::with_capacity(self.total_samples);
        for chunk in self.chunks.drain(..) {
            samples.extend_from_slice(&chunk);
        }
        self.total_samples = 0;
        PcmAudio {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_samples = 0;
    }
}
