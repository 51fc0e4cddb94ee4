//! Builder for assembling and starting a pass-through session.

use std::sync::Arc;
use std::time::Duration;

use crate::console::spawn_stop_reader;
use crate::device::{InputDevice, OutputDevice};
use crate::monitor::spawn_monitor;
use crate::pipeline::{bounded, CaptureHandler, PipelineContext, PlaybackHandler};
use crate::session::{Phase, Session};
use crate::{DeviceSelection, EventCallback, LoopbackConfig, LoopbackError};

/// Entry point for the crate.
///
/// `Loopback` itself holds nothing; it exists so the API reads
/// `Loopback::builder()...start()`.
pub struct Loopback;

impl Loopback {
    /// Creates a builder with default configuration.
    pub fn builder() -> LoopbackBuilder {
        LoopbackBuilder::new()
    }
}

/// Configures and starts a pass-through [`Session`].
///
/// # Example
///
/// ```no_run
/// use loopback_audio::Loopback;
///
/// # fn main() -> Result<(), loopback_audio::LoopbackError> {
/// let session = Loopback::builder()
///     .sample_rate(48_000)
///     .channels(2)
///     .console_stop(true)
///     .start()?;
///
/// session.wait();
/// session.stop()?;
/// # Ok(())
/// # }
/// ```
pub struct LoopbackBuilder {
    config: LoopbackConfig,
    event_callback: Option<EventCallback>,
    console_stop: bool,
}

impl Default for LoopbackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoopbackConfig::default(),
            event_callback: None,
            console_stop: false,
        }
    }

    /// Replaces the entire configuration at once.
    pub fn config(mut self, config: LoopbackConfig) -> Self {
        self.config = config;
        self
    }

    /// Selects the input device.
    pub fn input(mut self, selection: DeviceSelection) -> Self {
        self.config.input = selection;
        self
    }

    /// Selects the output device.
    pub fn output(mut self, selection: DeviceSelection) -> Self {
        self.config.output = selection;
        self
    }

    /// Sets the sample rate in Hz.
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Sets the block size in frames.
    pub fn block_size(mut self, block_size: u32) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Sets the channel count.
    pub fn channels(mut self, channels: u16) -> Self {
        self.config.channels = channels;
        self
    }

    /// Sets the queue capacity in blocks.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Sets the minimum interval between occupancy events.
    pub fn display_interval(mut self, interval: Duration) -> Self {
        self.config.display_interval = interval;
        self
    }

    /// Registers a callback for runtime events.
    ///
    /// The callback runs on the monitor thread, never on an audio thread,
    /// so it may block (e.g. write to the console).
    pub fn on_event(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    /// Enables the console reader thread that stops the session when a
    /// `"stop"` line (case-insensitive) is typed on standard input.
    pub fn console_stop(mut self, enabled: bool) -> Self {
        self.console_stop = enabled;
        self
    }

    /// Validates the configuration, opens both streams, and starts the
    /// monitor thread.
    ///
    /// The capture stream is opened first; if the playback stream then fails
    /// to open, the capture stream is closed before this returns, so a failed
    /// start never leaks a stream.
    ///
    /// # Errors
    ///
    /// Any device resolution, format, or stream-open failure; the
    /// configuration errors from [`LoopbackConfig::validate`].
    pub fn start(self) -> Result<Session, LoopbackError> {
        self.config.validate()?;

        let context = Arc::new(PipelineContext::new(self.config.queue_capacity));
        context.set_phase(Phase::Starting);

        let (producer, consumer) = bounded(self.config.queue_capacity);
        let capture = CaptureHandler::new(producer, context.clone(), self.config.channels);
        let playback = PlaybackHandler::new(consumer, context.clone());

        let input = InputDevice::open(&self.config.input)?;
        let output = OutputDevice::open(&self.config.output)?;
        tracing::info!(
            input = %input.name(),
            output = %output.name(),
            sample_rate = self.config.sample_rate,
            block_size = self.config.block_size,
            channels = self.config.channels,
            queue_capacity = self.config.queue_capacity,
            "starting pass-through"
        );

        // Guards close their streams on drop, so an error from either `?`
        // below tears down anything already opened.
        let input_guard = input.start(&self.config, capture, context.clone())?;
        let output_guard = output.start(&self.config, playback, context.clone())?;

        let monitor = spawn_monitor(
            context.clone(),
            context.stop_signal().clone(),
            self.config.display_interval,
            self.event_callback,
        )
        .map_err(|e| LoopbackError::Backend(format!("monitor thread: {e}")))?;

        if self.console_stop {
            spawn_stop_reader(context.stop_signal().clone())
                .map_err(|e| LoopbackError::Backend(format!("console thread: {e}")))?;
        }

        context.set_phase(Phase::Running);
        Ok(Session::new(context, input_guard, output_guard, monitor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_config() {
        let builder = Loopback::builder()
            .sample_rate(48_000)
            .block_size(512)
            .channels(2)
            .queue_capacity(16)
            .display_interval(Duration::from_millis(250))
            .input(DeviceSelection::ByIndex(3));

        assert_eq!(builder.config.sample_rate, 48_000);
        assert_eq!(builder.config.block_size, 512);
        assert_eq!(builder.config.channels, 2);
        assert_eq!(builder.config.queue_capacity, 16);
        assert_eq!(builder.config.display_interval, Duration::from_millis(250));
        assert_eq!(builder.config.input, DeviceSelection::ByIndex(3));
        assert_eq!(builder.config.output, DeviceSelection::SystemDefault);
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let result = Loopback::builder().queue_capacity(0).start();
        assert!(matches!(result, Err(LoopbackError::InvalidConfig { .. })));
    }

    #[test]
    fn test_start_fails_for_unknown_device() {
        // Runs without hardware: resolution fails before any stream opens.
        let result = Loopback::builder()
            .input(DeviceSelection::ByName("no-such-device".to_string()))
            .start();
        assert!(result.is_err());
    }

    // Requires a machine with audio devices; run manually.
    #[test]
    #[ignore = "requires audio hardware"]
    fn test_start_and_stop_default_devices() {
        let session = Loopback::builder().start().unwrap();
        assert_eq!(session.phase(), crate::Phase::Running);
        std::thread::sleep(Duration::from_millis(200));
        session.stop().unwrap();
    }
}
