//! Pass-through session lifecycle.

use std::sync::Arc;
use std::thread;

use crate::device::StreamGuard;
use crate::pipeline::PipelineContext;
use crate::{LoopbackError, StopSignal};

/// Lifecycle phase of a pipeline.
///
/// Transitions: `Idle → Starting → Running → Stopping → Stopped`, with
/// `Starting → Stopped` on a failed open. `Stopped` is terminal; no further
/// callbacks fire once it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// No streams opened yet.
    Idle = 0,
    /// Streams are being opened.
    Starting = 1,
    /// Both streams are live; audio is flowing.
    Running = 2,
    /// Teardown in progress.
    Stopping = 3,
    /// Terminal: streams closed, threads stopped.
    Stopped = 4,
}

impl Phase {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Starting,
            2 => Self::Running,
            3 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

/// Counters snapshot for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Blocks successfully enqueued by the capture callback.
    pub blocks_captured: u64,
    /// Blocks successfully dequeued by the playback callback.
    pub blocks_played: u64,
    /// Captured blocks dropped on a full queue.
    pub overflows: u64,
    /// Output blocks replaced with silence on an empty queue.
    pub underflows: u64,
    /// Most recently sampled queue occupancy, in blocks.
    pub queue_occupied: usize,
}

/// Handle to a running pass-through session.
///
/// Returned by [`LoopbackBuilder::start()`](crate::LoopbackBuilder::start)
/// once both streams are live. Audio flows on driver-managed threads until
/// [`stop()`](Session::stop) is called or the handle is dropped; the handle
/// itself does nothing but wait, observe, and tear down.
///
/// # Example
///
/// ```ignore
/// let session = Loopback::builder().start()?;
/// session.wait();   // blocks until the stop signal is set
/// session.stop()?;  // closes both streams, reports any driver failure
/// ```
pub struct Session {
    context: Arc<PipelineContext>,
    // Stream guards close their CPAL streams on drop; the driver waits out
    // in-flight callbacks before the drop returns.
    input: Option<StreamGuard>,
    output: Option<StreamGuard>,
    monitor: Option<thread::JoinHandle<()>>,
}

impl Session {
    pub(crate) fn new(
        context: Arc<PipelineContext>,
        input: StreamGuard,
        output: StreamGuard,
        monitor: thread::JoinHandle<()>,
    ) -> Self {
        Self {
            context,
            input: Some(input),
            output: Some(output),
            monitor: Some(monitor),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.context.phase()
    }

    /// Returns `true` while the stop signal has not been set.
    pub fn is_running(&self) -> bool {
        !self.context.stop_signal().is_set()
    }

    /// A clone of the session's stop signal, for wiring external stop
    /// sources (interrupt handlers, remote commands).
    pub fn stop_signal(&self) -> StopSignal {
        self.context.stop_signal().clone()
    }

    /// The shared pipeline context, for observing counters directly.
    pub fn context(&self) -> &Arc<PipelineContext> {
        &self.context
    }

    /// Blocks the calling thread until the stop signal is set.
    ///
    /// This is the controlling thread's single blocking wait; the signal may
    /// come from the console reader, an interrupt handler, or a mid-stream
    /// driver failure.
    pub fn wait(&self) {
        self.context.stop_signal().wait();
    }

    /// Current counter snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            blocks_captured: self.context.blocks_captured(),
            blocks_played: self.context.blocks_played(),
            overflows: self.context.overflows(),
            underflows: self.context.underflows(),
            queue_occupied: self.context.occupancy(),
        }
    }

    /// Stops the session: sets the stop signal, closes both streams, and
    /// joins the monitor thread.
    ///
    /// # Errors
    ///
    /// Returns [`LoopbackError::Stream`] if the driver reported a failure
    /// while the streams were running; the shutdown itself still completes.
    pub fn stop(mut self) -> Result<(), LoopbackError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), LoopbackError> {
        if self.context.phase() == Phase::Stopped {
            return Ok(());
        }
        self.context.set_phase(Phase::Stopping);
        self.context.stop_signal().set();

        // Closing the streams stops the callbacks; the driver synchronizes
        // against in-flight invocations before each drop returns.
        drop(self.input.take());
        drop(self.output.take());

        if let Some(handle) = self.monitor.take() {
            let _ = handle.join();
        }

        self.context.set_phase(Phase::Stopped);
        tracing::info!(stats = ?self.stats(), "pass-through stopped");

        match self.context.take_failure() {
            Some(message) => Err(LoopbackError::Stream(message)),
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Dropped without explicit stop(): tear down anyway, discarding any
        // driver failure (there is nobody left to report it to).
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_round_trip() {
        for phase in [
            Phase::Idle,
            Phase::Starting,
            Phase::Running,
            Phase::Stopping,
            Phase::Stopped,
        ] {
            assert_eq!(Phase::from_u8(phase as u8), phase);
        }
    }

    #[test]
    fn test_unknown_phase_maps_to_stopped() {
        assert_eq!(Phase::from_u8(200), Phase::Stopped);
    }

    #[test]
    fn test_stats_default() {
        let stats = SessionStats::default();
        assert_eq!(stats.blocks_captured, 0);
        assert_eq!(stats.overflows, 0);
        assert_eq!(stats.underflows, 0);
    }
}
