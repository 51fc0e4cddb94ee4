//! Bounded block queue between the capture and playback callbacks.
//!
//! A thin wrapper over a lock-free SPSC ring holding whole [`AudioBlock`]s.
//! Both ends are non-blocking and allocation-free: `try_push` moves the block
//! in, `try_pop` moves it out. That keeps the critical path short enough for
//! the hardware deadline (`block_size / sample_rate` per callback).

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;

use crate::AudioBlock;

/// Creates a bounded block queue with the given capacity.
///
/// Returns the producer half (for the capture callback) and the consumer
/// half (for the playback callback). The invariant `0 ≤ len ≤ capacity`
/// holds at all times, and FIFO order is preserved across successful
/// push/pop pairs.
///
/// # Panics
///
/// Panics if `capacity` is zero; [`LoopbackConfig::validate`] rejects that
/// before any queue is built.
///
/// [`LoopbackConfig::validate`]: crate::LoopbackConfig::validate
pub fn bounded(capacity: usize) -> (QueueProducer, QueueConsumer) {
    assert!(capacity > 0, "queue capacity must be non-zero");
    let ring = HeapRb::<AudioBlock>::new(capacity);
    let (producer, consumer) = ring.split();

    (
        QueueProducer {
            inner: producer,
            capacity,
        },
        QueueConsumer {
            inner: consumer,
            capacity,
        },
    )
}

/// The enqueue half of the block queue. Owned by the capture side.
pub struct QueueProducer {
    inner: ringbuf::HeapProd<AudioBlock>,
    capacity: usize,
}

impl QueueProducer {
    /// Appends a block unless the queue is full.
    ///
    /// On a full queue the block is handed back immediately so the caller
    /// can apply its drop policy. Never blocks.
    pub fn try_push(&mut self, block: AudioBlock) -> Result<(), AudioBlock> {
        self.inner.try_push(block)
    }

    /// Blocks currently queued, as seen from the producer side.
    pub fn occupied(&self) -> usize {
        self.inner.occupied_len()
    }

    /// Queue capacity in blocks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` when a push would fail.
    pub fn is_full(&self) -> bool {
        self.occupied() == self.capacity
    }
}

/// The dequeue half of the block queue. Owned by the playback side.
pub struct QueueConsumer {
    inner: ringbuf::HeapCons<AudioBlock>,
    capacity: usize,
}

impl QueueConsumer {
    /// Removes and returns the oldest block, or `None` if the queue is
    /// empty. Never blocks.
    pub fn try_pop(&mut self) -> Option<AudioBlock> {
        self.inner.try_pop()
    }

    /// Blocks currently queued, as seen from the consumer side.
    pub fn occupied(&self) -> usize {
        self.inner.occupied_len()
    }

    /// Queue capacity in blocks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` when a pop would fail.
    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }
}
