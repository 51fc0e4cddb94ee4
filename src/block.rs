//! Audio block: the unit of data moving through the queue.

use std::time::Duration;

/// A fixed-shape chunk of `channels × frames` interleaved `f32` samples.
///
/// `AudioBlock` is the fundamental unit handed from the capture callback to
/// the playback callback. The driver's own buffer is transient (it is reused
/// after the callback returns), so capture always copies into an owned block
/// before enqueueing; playback copies the samples back out into the driver's
/// output buffer.
///
/// # Example
///
/// ```
/// use loopback_audio::AudioBlock;
///
/// let block = AudioBlock::silence(1024, 2);
/// assert_eq!(block.frames(), 1024);
/// assert_eq!(block.samples.len(), 2048);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    /// Interleaved PCM samples in `f32` format, `[-1.0, 1.0]` nominal range.
    pub samples: Vec<f32>,

    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
}

impl AudioBlock {
    /// Creates a block that owns the given interleaved samples.
    pub fn new(samples: Vec<f32>, channels: u16) -> Self {
        Self { samples, channels }
    }

    /// Copies a driver-owned interleaved buffer into a new block.
    pub fn copy_interleaved(data: &[f32], channels: u16) -> Self {
        Self {
            samples: data.to_vec(),
            channels,
        }
    }

    /// Copies a driver-owned `i16` buffer into a new block, converting to `f32`.
    pub fn copy_interleaved_i16(data: &[i16], channels: u16) -> Self {
        Self {
            samples: data.iter().map(|&s| f32::from(s) / 32768.0).collect(),
            channels,
        }
    }

    /// Creates an all-zero block with exactly `channels × frames` samples.
    pub fn silence(frames: usize, channels: u16) -> Self {
        Self {
            samples: vec![0.0; frames * channels as usize],
            channels,
        }
    }

    /// Returns the number of audio frames in this block.
    ///
    /// A frame contains one sample per channel.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Returns the duration of this block at the given sample rate.
    pub fn duration(&self, sample_rate: u32) -> Duration {
        if sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(sample_rate))
    }

    /// Returns `true` if this block contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copies the block's samples into an output buffer.
    ///
    /// If the buffer is longer than the block, the remainder is zero-filled;
    /// if shorter, only the prefix is written. Either way the buffer keeps
    /// its exact shape, which is what the playback stream requires.
    pub fn write_into(&self, out: &mut [f32]) {
        let n = self.samples.len().min(out.len());
        out[..n].copy_from_slice(&self.samples[..n]);
        out[n..].fill(0.0);
    }

    /// Copies the block's samples into an `i16` output buffer.
    pub fn write_into_i16(&self, out: &mut [i16]) {
        let n = self.samples.len().min(out.len());
        for (dst, &src) in out[..n].iter_mut().zip(&self.samples[..n]) {
            *dst = (src * 32767.0).clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;
        }
        out[n..].fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_shape() {
        let block = AudioBlock::silence(1024, 2);
        assert_eq!(block.samples.len(), 2048);
        assert_eq!(block.frames(), 1024);
        assert!(block.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_copy_interleaved_owns_data() {
        let driver_buf = vec![0.1f32, 0.2, 0.3, 0.4];
        let block = AudioBlock::copy_interleaved(&driver_buf, 2);
        drop(driver_buf);
        assert_eq!(block.samples, vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(block.frames(), 2);
    }

    #[test]
    fn test_i16_conversion_round_trip() {
        let data = vec![0i16, i16::MAX, i16::MIN, 16384];
        let block = AudioBlock::copy_interleaved_i16(&data, 1);
        assert_eq!(block.samples[0], 0.0);
        assert!(block.samples[1] > 0.99);
        assert_eq!(block.samples[2], -1.0);

        let mut out = vec![0i16; 4];
        block.write_into_i16(&mut out);
        assert_eq!(out[0], 0);
        assert!(out[1] > 32000);
        assert!(out[2] < -32000);
    }

    #[test]
    fn test_duration() {
        let block = AudioBlock::silence(1024, 1);
        let d = block.duration(44100);
        // 1024 / 44100 ≈ 23.2ms
        assert!(d > Duration::from_millis(23) && d < Duration::from_millis(24));
    }

    #[test]
    fn test_duration_zero_rate() {
        let block = AudioBlock::silence(1024, 1);
        assert_eq!(block.duration(0), Duration::ZERO);
    }

    #[test]
    fn test_write_into_exact() {
        let block = AudioBlock::new(vec![0.5, -0.5], 1);
        let mut out = vec![1.0f32; 2];
        block.write_into(&mut out);
        assert_eq!(out, vec![0.5, -0.5]);
    }

    #[test]
    fn test_write_into_longer_buffer_zero_fills() {
        let block = AudioBlock::new(vec![0.5, -0.5], 1);
        let mut out = vec![1.0f32; 4];
        block.write_into(&mut out);
        assert_eq!(out, vec![0.5, -0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_write_into_shorter_buffer_truncates() {
        let block = AudioBlock::new(vec![0.1, 0.2, 0.3], 1);
        let mut out = vec![0.0f32; 2];
        block.write_into(&mut out);
        assert_eq!(out, vec![0.1, 0.2]);
    }

    #[test]
    fn test_zero_channels() {
        let block = AudioBlock::new(vec![0.0; 8], 0);
        assert_eq!(block.frames(), 0);
    }
}
