//! Error types for loopback-audio.
//!
//! Errors here are fatal: they prevent the pipeline from starting, or (for
//! [`LoopbackError::Stream`]) they ended a running pipeline. Overflow and
//! underflow are *not* errors — one block is lost or replaced with silence
//! and processing continues; those surface as [`LoopbackEvent`]s instead.
//!
//! [`LoopbackEvent`]: crate::LoopbackEvent

/// Fatal errors from opening or running the pass-through pipeline.
#[derive(Debug, thiserror::Error)]
pub enum LoopbackError {
    /// No default input device is configured on this system.
    #[error("no default input device configured")]
    NoDefaultInputDevice,

    /// No default output device is configured on this system.
    #[error("no default output device configured")]
    NoDefaultOutputDevice,

    /// The requested audio device was not found.
    #[error("device not found: {name}")]
    DeviceNotFound {
        /// Name of the device that wasn't found.
        name: String,
    },

    /// A device index from the enumeration table is out of range.
    #[error("device index {index} out of range ({available} devices available)")]
    DeviceIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// How many devices the host reported.
        available: usize,
    },

    /// The device's sample format is not supported by this crate.
    #[error("unsupported sample format: {format}")]
    UnsupportedFormat {
        /// The format that wasn't supported.
        format: String,
    },

    /// The device cannot provide the requested channel count.
    #[error("requested {requested} channels but device supports at most {max}")]
    UnsupportedChannelCount {
        /// Channels the configuration asked for.
        requested: u16,
        /// Maximum channels the device reports.
        max: u16,
    },

    /// The configuration failed validation before any stream was opened.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with it.
        reason: String,
    },

    /// An error from the underlying audio backend (CPAL) during open/start.
    #[error("audio backend error: {0}")]
    Backend(String),

    /// The driver reported a failure while the streams were running.
    ///
    /// Returned by [`Session::stop()`](crate::Session::stop) after the
    /// failure already triggered the shutdown path.
    #[error("audio stream failed: {0}")]
    Stream(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_not_found_display() {
        let err = LoopbackError::DeviceNotFound {
            name: "USB Mic".to_string(),
        };
        assert_eq!(err.to_string(), "device not found: USB Mic");
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = LoopbackError::DeviceIndexOutOfRange {
            index: 7,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "device index 7 out of range (3 devices available)"
        );
    }

    #[test]
    fn test_unsupported_channel_count_display() {
        let err = LoopbackError::UnsupportedChannelCount {
            requested: 8,
            max: 2,
        };
        assert!(err.to_string().contains("8 channels"));
        assert!(err.to_string().contains("at most 2"));
    }
}
