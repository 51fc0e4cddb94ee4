//! Configuration types for the pass-through pipeline.

use std::time::Duration;

use crate::LoopbackError;

/// Specifies which audio device to use for one side of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeviceSelection {
    /// Use the system's default device for the direction in question.
    #[default]
    SystemDefault,
    /// Use a specific device by name.
    ByName(String),
    /// Use a device by its enumeration index (as printed by
    /// [`list_devices`](crate::list_devices)).
    ByIndex(usize),
}

/// Immutable configuration for a pass-through run.
///
/// Produced once by the caller (typically an interactive resolver, see
/// `demos/passthrough.rs`) and consumed at stream-open time. Nothing in the
/// pipeline mutates it afterwards.
///
/// # Example
///
/// ```
/// use loopback_audio::LoopbackConfig;
///
/// let config = LoopbackConfig {
///     sample_rate: 48_000,
///     channels: 2,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LoopbackConfig {
    /// Frames per second, in Hz.
    pub sample_rate: u32,

    /// Frames per block. Lower values reduce latency but tighten the
    /// callback deadline (`block_size / sample_rate` seconds).
    pub block_size: u32,

    /// Number of channels captured and played (1 = mono, 2 = stereo).
    pub channels: u16,

    /// Input device selection.
    pub input: DeviceSelection,

    /// Output device selection.
    pub output: DeviceSelection,

    /// Capacity of the bounded block queue between capture and playback.
    ///
    /// Each slot holds one block, so the maximum added latency is
    /// `queue_capacity × block_size / sample_rate` seconds.
    pub queue_capacity: usize,

    /// Minimum interval between occupancy display updates.
    pub display_interval: Duration,
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_size: 1024,
            channels: 1,
            input: DeviceSelection::SystemDefault,
            output: DeviceSelection::SystemDefault,
            queue_capacity: 10,
            display_interval: Duration::from_millis(500),
        }
    }
}

impl LoopbackConfig {
    /// Checks that the configuration is usable before any stream is opened.
    pub fn validate(&self) -> Result<(), LoopbackError> {
        if self.sample_rate == 0 {
            return Err(LoopbackError::InvalidConfig {
                reason: "sample rate must be non-zero".to_string(),
            });
        }
        if self.block_size == 0 {
            return Err(LoopbackError::InvalidConfig {
                reason: "block size must be non-zero".to_string(),
            });
        }
        if self.channels == 0 {
            return Err(LoopbackError::InvalidConfig {
                reason: "channel count must be non-zero".to_string(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(LoopbackError::InvalidConfig {
                reason: "queue capacity must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the hard deadline of one audio callback.
    pub fn block_duration(&self) -> Duration {
        Duration::from_secs_f64(f64::from(self.block_size) / f64::from(self.sample_rate))
    }

    /// Returns the number of samples in one block (`channels × block_size`).
    pub fn samples_per_block(&self) -> usize {
        self.block_size as usize * self.channels as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoopbackConfig::default();
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.channels, 1);
        assert_eq!(config.queue_capacity, 10);
        assert_eq!(config.display_interval, Duration::from_millis(500));
        assert_eq!(config.input, DeviceSelection::SystemDefault);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_block_duration() {
        let config = LoopbackConfig::default();
        // 1024 / 44100 ≈ 23.2ms
        let d = config.block_duration();
        assert!(d > Duration::from_millis(23) && d < Duration::from_millis(24));
    }

    #[test]
    fn test_samples_per_block() {
        let config = LoopbackConfig {
            channels: 2,
            block_size: 512,
            ..Default::default()
        };
        assert_eq!(config.samples_per_block(), 1024);
    }

    #[test]
    fn test_rejects_zero_fields() {
        for config in [
            LoopbackConfig {
                sample_rate: 0,
                ..Default::default()
            },
            LoopbackConfig {
                block_size: 0,
                ..Default::default()
            },
            LoopbackConfig {
                channels: 0,
                ..Default::default()
            },
            LoopbackConfig {
                queue_capacity: 0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(LoopbackError::InvalidConfig { .. })
            ));
        }
    }
}
