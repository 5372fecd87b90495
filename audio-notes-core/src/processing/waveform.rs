/// Bounded window over the most recent input samples, for live visualisation.
///
/// Capture callbacks write mono samples in; the recording view reads a
/// time-domain trace out on its own cadence. Reading does not consume, and
/// overflow drops the oldest samples.
#[derive(Debug)]
pub struct WaveformTap {
    buffer: Vec<f32>,
    write_index: usize,
    available: usize,
}

/// Default window: ~43 ms at 48 kHz, the analyser size the view was tuned for.
pub const DEFAULT_WINDOW: usize = 2048;

impl WaveformTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_index: 0,
            available: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    /// Append samples. If `samples` is larger than the window only its tail is kept.
    pub fn write(&mut self, samples: &[f32]) {
        let capacity = self.capacity();
        let samples = if samples.len() > capacity {
            &samples[samples.len() - capacity..]
        } else {
            samples
        };

        for &sample in samples {
            self.buffer[self.write_index] = sample;
            self.write_index = (self.write_index + 1) % capacity;
        }
        self.available = (self.available + samples.len()).min(capacity);
    }

    /// Held samples, oldest first.
    pub fn snapshot(&self) -> Vec<f32> {
        let capacity = self.capacity();
        let start = (self.write_index + capacity - self.available) % capacity;
        (0..self.available)
            .map(|i| self.buffer[(start + i) % capacity])
            .collect()
    }

    /// Time-domain trace with `width` points in `[-1.0, 1.0]`.
    ///
    /// Each point is the sample of largest magnitude in its slice of the
    /// window, sign preserved. Missing history renders as silence on the left.
    pub fn trace(&self, width: usize) -> Vec<f32> {
        let mut points = vec![0.0f32; width];
        if width == 0 || self.available == 0 {
            return points;
        }

        let samples = self.snapshot();
        let capacity = self.capacity();
        // Pad so the trace always spans a full window.
        let offset = capacity - samples.len();

        for (column, point) in points.iter_mut().enumerate() {
            let start = column * capacity / width;
            let end = ((column + 1) * capacity / width).max(start + 1);
            *point = (start..end)
                .filter(|&i| i >= offset)
                .map(|i| samples[i - offset])
                .fold(0.0f32, |acc, s| if s.abs() > acc.abs() { s } else { acc })
                .clamp(-1.0, 1.0);
        }
        points
    }

    pub fn reset(&mut self) {
        self.write_index = 0;
        self.available = 0;
        self.buffer.fill(0.0);
    }
}

impl Default for WaveformTap {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_oldest_first() {
        let mut tap = WaveformTap::new(10);
        tap.write(&[1.0, 2.0, 3.0]);
        assert_eq!(tap.snapshot(), vec![1.0, 2.0, 3.0]);
        // Reading does not consume.
        assert_eq!(tap.len(), 3);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut tap = WaveformTap::new(4);
        tap.write(&[1.0, 2.0, 3.0, 4.0]);
        tap.write(&[5.0, 6.0]);
        assert_eq!(tap.snapshot(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn write_larger_than_capacity_keeps_tail() {
        let mut tap = WaveformTap::new(3);
        tap.write(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(tap.snapshot(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn empty_trace_is_flat() {
        let tap = WaveformTap::new(8);
        assert_eq!(tap.trace(4), vec![0.0; 4]);
        assert!(tap.trace(0).is_empty());
    }

    #[test]
    fn trace_keeps_signed_peaks() {
        let mut tap = WaveformTap::new(4);
        tap.write(&[0.1, -0.9, 0.5, 0.2]);
        assert_eq!(tap.trace(2), vec![-0.9, 0.5]);
    }

    #[test]
    fn partial_window_is_right_aligned() {
        let mut tap = WaveformTap::new(4);
        tap.write(&[0.7, 0.7]);
        assert_eq!(tap.trace(4), vec![0.0, 0.0, 0.7, 0.7]);
    }

    #[test]
    fn trace_wider_than_window_repeats_samples() {
        let mut tap = WaveformTap::new(2);
        tap.write(&[0.25, -0.25]);
        assert_eq!(tap.trace(4), vec![0.25, 0.25, -0.25, -0.25]);
    }

    #[test]
    fn reset_clears() {
        let mut tap = WaveformTap::new(4);
        tap.write(&[1.0]);
        tap.reset();
        assert!(tap.is_empty());
        assert!(tap.snapshot().is_empty());
    }
}
