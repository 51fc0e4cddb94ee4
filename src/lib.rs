//! # loopback-audio
//!
//! Real-time microphone-to-speaker pass-through with a bounded block queue.
//!
//! `loopback-audio` captures audio from an input device via CPAL, hands it
//! through a lock-free bounded queue, and plays it back on an output device.
//! The queue never blocks either side: a full queue drops the newly captured
//! block, an empty queue substitutes exact-shape silence, and both losses are
//! counted and reported off the real-time path.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use loopback_audio::{event_callback, Loopback, LoopbackEvent};
//!
//! let session = Loopback::builder()
//!     .sample_rate(44_100)
//!     .channels(1)
//!     .block_size(1024)
//!     .on_event(event_callback(|e| {
//!         if let LoopbackEvent::Occupancy { occupied, capacity } = e {
//!             print!("\rqueue: {occupied}/{capacity}");
//!         }
//!     }))
//!     .console_stop(true)   // type "stop" to end the session
//!     .start()?;
//!
//! session.wait();           // blocks until the stop signal is set
//! session.stop()?;
//! ```
//!
//! ## Architecture
//!
//! The crate maintains a strict thread boundary:
//!
//! - **Driver threads**: capture and playback callbacks that only copy
//!   samples and touch atomics, never allocate locks or print
//! - **Bounded queue**: lock-free SPSC ring of whole blocks between them
//! - **Monitor thread**: turns the shared counters into rate-limited events
//!
//! Console output, logging, and event callbacks all happen on the monitor
//! thread, so a slow terminal can never glitch the audio.

#![warn(missing_docs)]
// Audio code requires intentional numeric casts between sample formats
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless
)]
// unwrap/expect allowed in tests only
#![allow(clippy::unwrap_used)]
// These doc lints are too strict for internal implementation details
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

mod block;
mod builder;
mod config;
mod console;
mod device;
mod error;
mod event;
mod monitor;
pub mod pipeline;
mod session;
mod signal;
pub mod synthetic;

pub use block::AudioBlock;
pub use builder::{Loopback, LoopbackBuilder};
pub use config::{DeviceSelection, LoopbackConfig};
pub use console::{is_stop_command, spawn_stop_reader};
pub use device::{list_devices, DeviceInfo, InputDevice, OutputDevice, StreamGuard};
pub use error::LoopbackError;
pub use event::{event_callback, EventCallback, LoopbackEvent};
pub use monitor::DisplayGate;
pub use pipeline::{BlockSink, BlockSource, PipelineContext};
pub use session::{Phase, Session, SessionStats};
pub use signal::StopSignal;
