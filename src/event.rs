//! Runtime events for monitoring pipeline health.
//!
//! Events are non-fatal notifications. The pipeline keeps running after any
//! event is emitted — they exist for display and metrics, not error handling.
//! All events are emitted from the monitor thread, never from the real-time
//! audio callbacks, so the callback registered via
//! [`LoopbackBuilder::on_event`](crate::LoopbackBuilder::on_event) may block
//! (e.g. write to the console).

use std::sync::Arc;

/// Runtime events emitted while the pass-through is running.
///
/// # Example
///
/// ```
/// use loopback_audio::LoopbackEvent;
///
/// fn handle_event(event: LoopbackEvent) {
///     match event {
///         LoopbackEvent::Occupancy { occupied, capacity } => {
///             print!("\rqueue: {:3.0}%", 100.0 * occupied as f64 / capacity as f64);
///         }
///         LoopbackEvent::Overflow { dropped, total } => {
///             eprintln!("input overflow: dropped {dropped} block(s), {total} total");
///         }
///         LoopbackEvent::Underflow { missed, total } => {
///             eprintln!("output underflow: {missed} silent block(s), {total} total");
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub enum LoopbackEvent {
    /// Periodic queue fill-level sample, rate-limited to the configured
    /// display interval.
    Occupancy {
        /// Blocks currently queued.
        occupied: usize,
        /// Queue capacity in blocks.
        capacity: usize,
    },

    /// Captured blocks were dropped because the queue was full.
    ///
    /// There is no backpressure path to the hardware; dropping is the only
    /// valid policy at this layer.
    Overflow {
        /// Blocks dropped since the previous event.
        dropped: u64,
        /// Total blocks dropped this session.
        total: u64,
    },

    /// Output blocks were replaced with silence because the queue was empty.
    Underflow {
        /// Silent blocks substituted since the previous event.
        missed: u64,
        /// Total silent blocks this session.
        total: u64,
    },
}

/// Callback type for receiving runtime events.
pub type EventCallback = Arc<dyn Fn(LoopbackEvent) + Send + Sync>;

/// Creates an [`EventCallback`] from a closure.
///
/// Convenience so callers don't wrap in `Arc` by hand.
///
/// # Example
///
/// ```
/// use loopback_audio::{event_callback, LoopbackEvent};
///
/// let callback = event_callback(|event| {
///     println!("got event: {event:?}");
/// });
/// ```
pub fn event_callback<F>(f: F) -> EventCallback
where
    F: Fn(LoopbackEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
