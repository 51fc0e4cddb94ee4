//! Playback-side handler: queue pop, output buffer fill, silence policy.

use std::sync::Arc;

use crate::pipeline::{BlockSource, PipelineContext, QueueConsumer};
use crate::AudioBlock;

/// Pops blocks from the bounded queue and fills the driver's output buffer.
///
/// Invoked (via [`fill`](Self::fill)) on the driver's real-time output
/// thread whenever the hardware needs the next block. On an empty queue the
/// buffer is filled with silence of exactly the requested shape — a wrong
/// size would corrupt the stream — and the underflow counter is incremented.
pub struct PlaybackHandler {
    queue: QueueConsumer,
    context: Arc<PipelineContext>,
}

impl PlaybackHandler {
    /// Creates a handler that drains the given queue half.
    pub fn new(queue: QueueConsumer, context: Arc<PipelineContext>) -> Self {
        Self { queue, context }
    }

    /// Fills a driver-owned `f32` output buffer.
    ///
    /// Copies the oldest queued block, or zeros the whole buffer on
    /// underflow. The buffer always comes back fully written.
    pub fn fill(&mut self, out: &mut [f32]) {
        match self.pull() {
            Some(block) => block.write_into(out),
            None => out.fill(0.0),
        }
    }

    /// Fills a driver-owned `i16` output buffer.
    pub fn fill_i16(&mut self, out: &mut [i16]) {
        match self.pull() {
            Some(block) => block.write_into_i16(out),
            None => out.fill(0),
        }
    }
}

impl BlockSource for PlaybackHandler {
    /// Pops the oldest block. `None` means underflow: the counter has been
    /// incremented and the caller substitutes silence.
    fn pull(&mut self) -> Option<AudioBlock> {
        match self.queue.try_pop() {
            Some(block) => {
                self.context.note_playback(self.queue.occupied());
                Some(block)
            }
            None => {
                self.context.note_underflow();
                None
            }
        }
    }
}
