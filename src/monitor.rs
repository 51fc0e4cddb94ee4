//! Occupancy monitor: rate-limited reporting off the real-time path.
//!
//! The audio callbacks only store atomics; this module's thread turns them
//! into [`LoopbackEvent`]s at a bounded rate. Console I/O (or anything else
//! a registered callback does) therefore never runs on a driver thread.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::pipeline::PipelineContext;
use crate::{EventCallback, LoopbackEvent, StopSignal};

/// How often the monitor thread wakes to check the gate and the stop signal.
/// Kept well under typical display intervals so shutdown stays prompt.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Throttles display updates to at most one per interval.
///
/// The current time is an explicit input, so the throttling logic is
/// deterministically testable without wall-clock waits.
///
/// # Example
///
/// ```
/// use loopback_audio::DisplayGate;
/// use std::time::{Duration, Instant};
///
/// let mut gate = DisplayGate::new(Duration::from_millis(500));
/// let t0 = Instant::now();
/// assert!(gate.ready(t0));
/// assert!(!gate.ready(t0 + Duration::from_millis(100)));
/// assert!(gate.ready(t0 + Duration::from_millis(500)));
/// ```
#[derive(Debug)]
pub struct DisplayGate {
    interval: Duration,
    last: Option<Instant>,
}

impl DisplayGate {
    /// Creates a gate that opens at most once per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` if an update is due at `now`, and if so records the
    /// emission time. The first call is always due.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Spawns the monitor thread for a running pipeline.
///
/// Each time the gate opens it emits one `Occupancy` event, plus `Overflow`
/// and `Underflow` events for any loss-counter movement since the previous
/// opening. Exits promptly once the stop signal is set.
pub(crate) fn spawn_monitor(
    context: Arc<PipelineContext>,
    stop: StopSignal,
    interval: Duration,
    callback: Option<EventCallback>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("loopback-monitor".to_string())
        .spawn(move || run_monitor(&context, &stop, interval, callback.as_ref()))
}

fn run_monitor(
    context: &PipelineContext,
    stop: &StopSignal,
    interval: Duration,
    callback: Option<&EventCallback>,
) {
    let mut gate = DisplayGate::new(interval);
    let mut reported_overflows = 0u64;
    let mut reported_underflows = 0u64;

    while !stop.is_set() {
        thread::sleep(POLL_INTERVAL.min(interval));
        if !gate.ready(Instant::now()) {
            continue;
        }

        let occupied = context.occupancy();
        let capacity = context.queue_capacity();
        emit(
            callback,
            LoopbackEvent::Occupancy { occupied, capacity },
        );
        tracing::trace!(occupied, capacity, "queue occupancy");

        let overflows = context.overflows();
        if overflows > reported_overflows {
            let dropped = overflows - reported_overflows;
            reported_overflows = overflows;
            tracing::warn!(dropped, total = overflows, "input overflow, blocks dropped");
            emit(
                callback,
                LoopbackEvent::Overflow {
                    dropped,
                    total: overflows,
                },
            );
        }

        let underflows = context.underflows();
        if underflows > reported_underflows {
            let missed = underflows - reported_underflows;
            reported_underflows = underflows;
            tracing::warn!(
                missed,
                total = underflows,
                "output underflow, silence substituted"
            );
            emit(
                callback,
                LoopbackEvent::Underflow {
                    missed,
                    total: underflows,
                },
            );
        }
    }
}

fn emit(callback: Option<&EventCallback>, event: LoopbackEvent) {
    if let Some(callback) = callback {
        callback(event);
    }
}
