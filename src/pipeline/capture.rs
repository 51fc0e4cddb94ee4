//! Capture-side handler: driver buffer in, queue push, overflow policy.

use std::sync::Arc;

use crate::pipeline::{BlockSink, PipelineContext, QueueProducer};
use crate::AudioBlock;

/// Consumes captured blocks and pushes them into the bounded queue.
///
/// Invoked (via [`capture_interleaved`](Self::capture_interleaved)) on the
/// driver's real-time input thread once per captured block. The driver's
/// buffer is copied into an owned [`AudioBlock`] first — the driver reuses
/// its buffer the moment the callback returns, so it must never be aliased.
///
/// On a full queue the block is permanently dropped and the overflow counter
/// is incremented; there is no backpressure path to the hardware. The
/// diagnostic for the drop is emitted later by the monitor thread, never
/// from here.
pub struct CaptureHandler {
    queue: QueueProducer,
    context: Arc<PipelineContext>,
    channels: u16,
}

impl CaptureHandler {
    /// Creates a handler that feeds the given queue half.
    pub fn new(queue: QueueProducer, context: Arc<PipelineContext>, channels: u16) -> Self {
        Self {
            queue,
            context,
            channels,
        }
    }

    /// Copies a driver-owned `f32` buffer into a block and enqueues it.
    pub fn capture_interleaved(&mut self, data: &[f32]) {
        let block = AudioBlock::copy_interleaved(data, self.channels);
        self.accept(block);
    }

    /// Copies a driver-owned `i16` buffer into a block and enqueues it.
    pub fn capture_interleaved_i16(&mut self, data: &[i16]) {
        let block = AudioBlock::copy_interleaved_i16(data, self.channels);
        self.accept(block);
    }
}

impl BlockSink for CaptureHandler {
    /// Pushes one owned block. Returns `false` if the queue was full and the
    /// block was dropped.
    fn accept(&mut self, block: AudioBlock) -> bool {
        match self.queue.try_push(block) {
            Ok(()) => {
                self.context.note_capture(self.queue.occupied());
                true
            }
            Err(_dropped) => {
                self.context.note_overflow();
                false
            }
        }
    }
}
