//! The bounded hand-off between capture and playback.
//!
//! This module is the core of the crate: the block queue, the two real-time
//! callback handlers, and the shared [`PipelineContext`] they report into.
//! The capability traits [`BlockSource`] and [`BlockSink`] sit at the queue
//! seams so the overflow/underflow policies can be exercised with synthetic
//! sources and sinks (see [`crate::synthetic`]) instead of a device driver.

mod capture;
mod playback;
pub mod queue;

pub use capture::CaptureHandler;
pub use playback::PlaybackHandler;
pub use queue::{bounded, QueueConsumer, QueueProducer};

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::session::Phase;
use crate::{AudioBlock, StopSignal};

/// Anything that produces audio blocks.
///
/// The playback side of the queue is a `BlockSource`; so are the synthetic
/// generators used in tests and demos.
pub trait BlockSource {
    /// Produces the next block, or `None` if nothing is available right now.
    fn pull(&mut self) -> Option<AudioBlock>;
}

/// Anything that consumes audio blocks.
///
/// The capture side of the queue is a `BlockSink`. Implementations decide
/// their own full/slow policy; the return value reports whether the block
/// was kept.
pub trait BlockSink {
    /// Consumes one block. Returns `false` if the block was discarded.
    fn accept(&mut self, block: AudioBlock) -> bool;
}

/// Shared state owned by one pass-through pipeline.
///
/// The context carries the loss counters, the occupancy sample, the
/// lifecycle phase and the stop signal. It is passed by `Arc` into the
/// capture and playback handlers and the monitor thread, so multiple
/// independent pipelines can coexist and unit tests can build a context
/// without any device.
///
/// All fields are atomics (or a short mutex off the audio path): the
/// real-time callbacks only ever do atomic stores and adds here.
pub struct PipelineContext {
    queue_capacity: usize,
    stop: StopSignal,
    phase: AtomicU8,
    overflows: AtomicU64,
    underflows: AtomicU64,
    blocks_captured: AtomicU64,
    blocks_played: AtomicU64,
    occupancy: AtomicUsize,
    // Written only by driver error callbacks, read once at shutdown.
    failure: Mutex<Option<String>>,
}

impl PipelineContext {
    /// Creates a fresh context for a queue of the given capacity.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            queue_capacity,
            stop: StopSignal::new(),
            phase: AtomicU8::new(Phase::Idle as u8),
            overflows: AtomicU64::new(0),
            underflows: AtomicU64::new(0),
            blocks_captured: AtomicU64::new(0),
            blocks_played: AtomicU64::new(0),
            occupancy: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    /// The stop signal shared by every part of this pipeline.
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Queue capacity in blocks.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub(crate) fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }

    /// Total captured blocks dropped on a full queue.
    pub fn overflows(&self) -> u64 {
        self.overflows.load(Ordering::SeqCst)
    }

    /// Total output blocks replaced with silence on an empty queue.
    pub fn underflows(&self) -> u64 {
        self.underflows.load(Ordering::SeqCst)
    }

    /// Total blocks successfully enqueued by the capture side.
    pub fn blocks_captured(&self) -> u64 {
        self.blocks_captured.load(Ordering::SeqCst)
    }

    /// Total blocks successfully dequeued by the playback side.
    pub fn blocks_played(&self) -> u64 {
        self.blocks_played.load(Ordering::SeqCst)
    }

    /// Most recently sampled queue occupancy, in blocks.
    pub fn occupancy(&self) -> usize {
        self.occupancy.load(Ordering::SeqCst)
    }

    pub(crate) fn note_capture(&self, occupied: usize) {
        self.blocks_captured.fetch_add(1, Ordering::SeqCst);
        self.occupancy.store(occupied, Ordering::SeqCst);
    }

    pub(crate) fn note_overflow(&self) {
        self.overflows.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn note_playback(&self, occupied: usize) {
        self.blocks_played.fetch_add(1, Ordering::SeqCst);
        self.occupancy.store(occupied, Ordering::SeqCst);
    }

    pub(crate) fn note_underflow(&self) {
        self.underflows.fetch_add(1, Ordering::SeqCst);
    }

    /// Records a fatal mid-stream driver failure and triggers shutdown.
    ///
    /// Only the first failure is kept; the message is reported by
    /// [`Session::stop()`](crate::Session::stop).
    pub fn record_failure(&self, message: impl Into<String>) {
        let mut slot = self.failure.lock();
        if slot.is_none() {
            *slot = Some(message.into());
        }
        drop(slot);
        self.stop.set();
    }

    pub(crate) fn take_failure(&self) -> Option<String> {
        self.failure.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_starts_clean() {
        let ctx = PipelineContext::new(10);
        assert_eq!(ctx.queue_capacity(), 10);
        assert_eq!(ctx.phase(), Phase::Idle);
        assert_eq!(ctx.overflows(), 0);
        assert_eq!(ctx.underflows(), 0);
        assert_eq!(ctx.blocks_captured(), 0);
        assert_eq!(ctx.blocks_played(), 0);
        assert_eq!(ctx.occupancy(), 0);
        assert!(!ctx.stop_signal().is_set());
    }

    #[test]
    fn test_counters_increment_independently() {
        let ctx = PipelineContext::new(4);
        ctx.note_capture(1);
        ctx.note_capture(2);
        ctx.note_overflow();
        ctx.note_playback(1);
        ctx.note_underflow();

        assert_eq!(ctx.blocks_captured(), 2);
        assert_eq!(ctx.overflows(), 1);
        assert_eq!(ctx.blocks_played(), 1);
        assert_eq!(ctx.underflows(), 1);
        assert_eq!(ctx.occupancy(), 1);
    }

    #[test]
    fn test_first_failure_wins_and_stops() {
        let ctx = PipelineContext::new(4);
        ctx.record_failure("device unplugged");
        ctx.record_failure("second failure");

        assert!(ctx.stop_signal().is_set());
        assert_eq!(ctx.take_failure().as_deref(), Some("device unplugged"));
        assert_eq!(ctx.take_failure(), None);
    }
}
