//! Synthetic block sources and sinks for tests and demos.
//!
//! These exercise the queue, handlers, and loss policies without touching a
//! device driver, so the whole pipeline can be tested on machines with no
//! audio hardware.

use std::f32::consts::TAU;

use crate::pipeline::{BlockSink, BlockSource};
use crate::AudioBlock;

/// Generates a continuous sine tone, one block per [`pull`](BlockSource::pull).
///
/// The phase carries across blocks, so consecutive blocks join without a
/// discontinuity.
pub struct SineSource {
    frequency: f32,
    sample_rate: f32,
    frames_per_block: usize,
    channels: u16,
    amplitude: f32,
    phase: f32,
}

impl SineSource {
    /// Creates a tone generator producing blocks of the given shape.
    pub fn new(frequency: f32, sample_rate: u32, frames_per_block: usize, channels: u16) -> Self {
        Self {
            frequency,
            sample_rate: sample_rate as f32,
            frames_per_block,
            channels,
            amplitude: 0.5,
            phase: 0.0,
        }
    }

    /// Sets the peak amplitude (default 0.5).
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }
}

impl BlockSource for SineSource {
    fn pull(&mut self) -> Option<AudioBlock> {
        let step = TAU * self.frequency / self.sample_rate;
        let mut samples = Vec::with_capacity(self.frames_per_block * self.channels as usize);
        for _ in 0..self.frames_per_block {
            let value = self.amplitude * self.phase.sin();
            for _ in 0..self.channels {
                samples.push(value);
            }
            self.phase = (self.phase + step) % TAU;
        }
        Some(AudioBlock::new(samples, self.channels))
    }
}

/// Produces all-zero blocks of a fixed shape.
pub struct SilenceSource {
    frames_per_block: usize,
    channels: u16,
}

impl SilenceSource {
    /// Creates a silence generator producing blocks of the given shape.
    pub fn new(frames_per_block: usize, channels: u16) -> Self {
        Self {
            frames_per_block,
            channels,
        }
    }
}

impl BlockSource for SilenceSource {
    fn pull(&mut self) -> Option<AudioBlock> {
        Some(AudioBlock::silence(self.frames_per_block, self.channels))
    }
}

/// Generates deterministic white noise from a linear congruential generator.
pub struct NoiseSource {
    frames_per_block: usize,
    channels: u16,
    amplitude: f32,
    state: u32,
}

impl NoiseSource {
    /// Creates a noise generator with a fixed seed.
    pub fn new(frames_per_block: usize, channels: u16) -> Self {
        Self {
            frames_per_block,
            channels,
            amplitude: 0.1,
            state: 12345,
        }
    }

    /// Sets the peak amplitude (default 0.1).
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    fn next_sample(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12345);
        let unit = (self.state >> 16) as f32 / 32768.0 - 1.0;
        unit * self.amplitude
    }
}

impl BlockSource for NoiseSource {
    fn pull(&mut self) -> Option<AudioBlock> {
        let mut samples = Vec::with_capacity(self.frames_per_block * self.channels as usize);
        for _ in 0..self.frames_per_block * self.channels as usize {
            samples.push(self.next_sample());
        }
        Some(AudioBlock::new(samples, self.channels))
    }
}

/// Accumulates every accepted block, for inspection in tests.
#[derive(Default)]
pub struct CollectorSink {
    blocks: Vec<AudioBlock>,
}

impl CollectorSink {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks accepted so far, in arrival order.
    pub fn blocks(&self) -> &[AudioBlock] {
        &self.blocks
    }

    /// Total samples across all accepted blocks.
    pub fn total_samples(&self) -> usize {
        self.blocks.iter().map(|b| b.samples.len()).sum()
    }

    /// Consumes the sink, returning the collected blocks.
    pub fn into_blocks(self) -> Vec<AudioBlock> {
        self.blocks
    }
}

impl BlockSink for CollectorSink {
    fn accept(&mut self, block: AudioBlock) -> bool {
        self.blocks.push(block);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_has_expected_shape_and_range() {
        let mut source = SineSource::new(440.0, 44_100, 256, 2);
        let block = source.pull().unwrap();

        assert_eq!(block.frames(), 256);
        assert_eq!(block.channels, 2);
        assert!(block.samples.iter().all(|s| s.abs() <= 0.5));
        // A 440 Hz tone is not silence.
        assert!(block.samples.iter().any(|s| s.abs() > 0.01));
    }

    #[test]
    fn test_sine_phase_is_continuous_across_blocks() {
        let mut source = SineSource::new(1000.0, 48_000, 64, 1);
        let first = source.pull().unwrap();
        let second = source.pull().unwrap();

        let last = first.samples[63];
        let next = second.samples[0];
        // One sample step at 1 kHz / 48 kHz moves the waveform only a little.
        assert!((next - last).abs() < 0.1);
    }

    #[test]
    fn test_silence_source_is_silent() {
        let mut source = SilenceSource::new(128, 1);
        let block = source.pull().unwrap();
        assert_eq!(block.frames(), 128);
        assert!(block.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_noise_is_deterministic() {
        let mut a = NoiseSource::new(64, 1);
        let mut b = NoiseSource::new(64, 1);
        assert_eq!(a.pull().unwrap().samples, b.pull().unwrap().samples);
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let mut source = NoiseSource::new(1024, 1).with_amplitude(0.25);
        let block = source.pull().unwrap();
        assert!(block.samples.iter().all(|s| s.abs() <= 0.25));
    }

    #[test]
    fn test_collector_keeps_arrival_order() {
        let mut sink = CollectorSink::new();
        assert!(sink.accept(AudioBlock::new(vec![1.0], 1)));
        assert!(sink.accept(AudioBlock::new(vec![2.0], 1)));

        assert_eq!(sink.blocks().len(), 2);
        assert_eq!(sink.blocks()[0].samples, vec![1.0]);
        assert_eq!(sink.blocks()[1].samples, vec![2.0]);
        assert_eq!(sink.total_samples(), 2);
    }
}
