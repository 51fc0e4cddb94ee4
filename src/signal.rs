//! Shared stop signal with set-once semantics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// A shared one-shot stop signal: set exactly once, observed by many.
///
/// The first caller of [`set`](StopSignal::set) wins; later calls are no-ops.
/// Any number of observers may block in [`wait`](StopSignal::wait) or poll
/// [`is_set`](StopSignal::is_set); once set, every observer sees the same
/// final state.
///
/// Cloning is cheap (an `Arc` copy) and all clones refer to the same signal.
///
/// # Example
///
/// ```
/// use loopback_audio::StopSignal;
///
/// let signal = StopSignal::new();
/// let observer = signal.clone();
///
/// std::thread::spawn(move || {
///     signal.set();
/// });
///
/// observer.wait(); // returns once set
/// assert!(observer.is_set());
/// ```
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    set: AtomicBool,
    lock: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    /// Creates a new, unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signal and wakes all waiters.
    ///
    /// Returns `true` if this call was the one that set it, `false` if it was
    /// already set.
    pub fn set(&self) -> bool {
        if self.inner.set.swap(true, Ordering::SeqCst) {
            return false;
        }
        let mut flagged = self.inner.lock.lock();
        *flagged = true;
        self.inner.condvar.notify_all();
        true
    }

    /// Returns `true` once the signal has been set.
    pub fn is_set(&self) -> bool {
        self.inner.set.load(Ordering::SeqCst)
    }

    /// Blocks the calling thread until the signal is set.
    ///
    /// Returns immediately if it is already set.
    pub fn wait(&self) {
        if self.is_set() {
            return;
        }
        let mut flagged = self.inner.lock.lock();
        while !*flagged {
            self.inner.condvar.wait(&mut flagged);
        }
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("set", &self.is_set())
            .finish()
    }
}
