//! CPAL device wrappers: enumeration, stream opening, RAII stream guards.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, Stream, StreamConfig};

use crate::pipeline::{CaptureHandler, PipelineContext, PlaybackHandler};
use crate::{DeviceSelection, LoopbackConfig, LoopbackError};

/// One row of the device enumeration table.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Enumeration index, usable as [`DeviceSelection::ByIndex`].
    pub index: usize,
    /// Device name as reported by the host.
    pub name: String,
    /// Maximum input channels, 0 if the device cannot capture.
    pub max_input_channels: u16,
    /// Maximum output channels, 0 if the device cannot play.
    pub max_output_channels: u16,
    /// Default sample rate in Hz, 0 if the device reports none.
    pub default_sample_rate: u32,
    /// Whether this is the system's default input device.
    pub is_default_input: bool,
    /// Whether this is the system's default output device.
    pub is_default_output: bool,
}

/// Lists every audio device the default host knows about.
///
/// # Errors
///
/// Returns an error if the audio host cannot be enumerated at all;
/// per-device query failures degrade to zeroed fields instead.
pub fn list_devices() -> Result<Vec<DeviceInfo>, LoopbackError> {
    let host = cpal::default_host();
    let default_input = host.default_input_device().and_then(|d| d.name().ok());
    let default_output = host.default_output_device().and_then(|d| d.name().ok());

    let devices = host
        .devices()
        .map_err(|e| LoopbackError::Backend(e.to_string()))?;

    let mut infos = Vec::new();
    for (index, device) in devices.enumerate() {
        let name = device.name().unwrap_or_else(|_| format!("device {index}"));

        let max_input_channels = device
            .supported_input_configs()
            .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
            .unwrap_or(0);
        let max_output_channels = device
            .supported_output_configs()
            .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
            .unwrap_or(0);

        let default_sample_rate = device
            .default_output_config()
            .or_else(|_| device.default_input_config())
            .map(|c| c.sample_rate())
            .unwrap_or(0);

        infos.push(DeviceInfo {
            index,
            is_default_input: default_input.as_deref() == Some(name.as_str()),
            is_default_output: default_output.as_deref() == Some(name.as_str()),
            name,
            max_input_channels,
            max_output_channels,
            default_sample_rate,
        });
    }

    Ok(infos)
}

#[derive(Clone, Copy)]
enum Direction {
    Input,
    Output,
}

fn resolve_device(
    host: &cpal::Host,
    selection: &DeviceSelection,
    direction: Direction,
) -> Result<Device, LoopbackError> {
    match selection {
        DeviceSelection::SystemDefault => match direction {
            Direction::Input => host
                .default_input_device()
                .ok_or(LoopbackError::NoDefaultInputDevice),
            Direction::Output => host
                .default_output_device()
                .ok_or(LoopbackError::NoDefaultOutputDevice),
        },
        DeviceSelection::ByName(name) => {
            let devices = match direction {
                Direction::Input => host.input_devices(),
                Direction::Output => host.output_devices(),
            }
            .map_err(|e| LoopbackError::Backend(e.to_string()))?;

            for device in devices {
                if let Ok(candidate) = device.name() {
                    if candidate == *name {
                        return Ok(device);
                    }
                }
            }
            Err(LoopbackError::DeviceNotFound { name: name.clone() })
        }
        DeviceSelection::ByIndex(index) => {
            let devices: Vec<Device> = host
                .devices()
                .map_err(|e| LoopbackError::Backend(e.to_string()))?
                .collect();
            let available = devices.len();
            devices
                .into_iter()
                .nth(*index)
                .ok_or(LoopbackError::DeviceIndexOutOfRange {
                    index: *index,
                    available,
                })
        }
    }
}

/// Builds the CPAL stream config for one side of the pipeline.
///
/// The fixed buffer size is what makes blocks arrive with the configured
/// shape; the handlers still tolerate odd-sized buffers defensively.
fn stream_config(config: &LoopbackConfig) -> StreamConfig {
    StreamConfig {
        channels: config.channels,
        sample_rate: config.sample_rate,
        buffer_size: BufferSize::Fixed(config.block_size),
    }
}

fn check_channels(
    requested: u16,
    supported: Result<u16, LoopbackError>,
) -> Result<(), LoopbackError> {
    let max = supported?;
    if requested > max {
        return Err(LoopbackError::UnsupportedChannelCount { requested, max });
    }
    Ok(())
}

fn stream_error_handler(
    side: &'static str,
    context: Arc<PipelineContext>,
) -> impl FnMut(cpal::StreamError) + Send + 'static {
    move |error| {
        tracing::error!(%error, side, "audio stream failed mid-run");
        context.record_failure(format!("{side} stream: {error}"));
    }
}

fn backend_err(e: impl std::fmt::Display) -> LoopbackError {
    LoopbackError::Backend(e.to_string())
}

/// An opened (but not yet started) input device.
pub struct InputDevice {
    device: Device,
}

impl InputDevice {
    /// Resolves the selection against the default host.
    pub fn open(selection: &DeviceSelection) -> Result<Self, LoopbackError> {
        let host = cpal::default_host();
        Ok(Self {
            device: resolve_device(&host, selection, Direction::Input)?,
        })
    }

    /// Returns the device name.
    pub fn name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "unknown".to_string())
    }

    /// Opens and starts the capture stream.
    ///
    /// The handler runs on the driver's real-time thread; the returned guard
    /// must be kept alive for capture to continue.
    pub fn start(
        &self,
        config: &LoopbackConfig,
        mut handler: CaptureHandler,
        context: Arc<PipelineContext>,
    ) -> Result<StreamGuard, LoopbackError> {
        let supported = self.device.default_input_config().map_err(backend_err)?;
        check_channels(
            config.channels,
            self.device
                .supported_input_configs()
                .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
                .map_err(backend_err),
        )?;

        let cpal_config = stream_config(config);
        let stream = match supported.sample_format() {
            SampleFormat::F32 => self
                .device
                .build_input_stream(
                    &cpal_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        handler.capture_interleaved(data);
                    },
                    stream_error_handler("input", context),
                    None,
                )
                .map_err(backend_err)?,
            SampleFormat::I16 => self
                .device
                .build_input_stream(
                    &cpal_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        handler.capture_interleaved_i16(data);
                    },
                    stream_error_handler("input", context),
                    None,
                )
                .map_err(backend_err)?,
            format => {
                return Err(LoopbackError::UnsupportedFormat {
                    format: format!("{format:?}"),
                });
            }
        };

        stream.play().map_err(backend_err)?;
        tracing::debug!(device = %self.name(), "input stream started");
        Ok(StreamGuard { _stream: stream })
    }
}

/// An opened (but not yet started) output device.
pub struct OutputDevice {
    device: Device,
}

impl OutputDevice {
    /// Resolves the selection against the default host.
    pub fn open(selection: &DeviceSelection) -> Result<Self, LoopbackError> {
        let host = cpal::default_host();
        Ok(Self {
            device: resolve_device(&host, selection, Direction::Output)?,
        })
    }

    /// Returns the device name.
    pub fn name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "unknown".to_string())
    }

    /// Opens and starts the playback stream.
    pub fn start(
        &self,
        config: &LoopbackConfig,
        mut handler: PlaybackHandler,
        context: Arc<PipelineContext>,
    ) -> Result<StreamGuard, LoopbackError> {
        let supported = self.device.default_output_config().map_err(backend_err)?;
        check_channels(
            config.channels,
            self.device
                .supported_output_configs()
                .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
                .map_err(backend_err),
        )?;

        let cpal_config = stream_config(config);
        let stream = match supported.sample_format() {
            SampleFormat::F32 => self
                .device
                .build_output_stream(
                    &cpal_config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        handler.fill(data);
                    },
                    stream_error_handler("output", context),
                    None,
                )
                .map_err(backend_err)?,
            SampleFormat::I16 => self
                .device
                .build_output_stream(
                    &cpal_config,
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        handler.fill_i16(data);
                    },
                    stream_error_handler("output", context),
                    None,
                )
                .map_err(backend_err)?,
            format => {
                return Err(LoopbackError::UnsupportedFormat {
                    format: format!("{format:?}"),
                });
            }
        };

        stream.play().map_err(backend_err)?;
        tracing::debug!(device = %self.name(), "output stream started");
        Ok(StreamGuard { _stream: stream })
    }
}

/// A running audio stream.
///
/// The stream stays live while this guard exists; dropping it closes the
/// stream, and the driver synchronizes against in-flight callbacks before
/// the drop returns. Every open therefore has exactly one matching close,
/// on every exit path.
pub struct StreamGuard {
    _stream: Stream,
}
