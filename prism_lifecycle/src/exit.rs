//! Exit callbacks and background workers joined at finalization.

use prism_core::{Status, StatusResult};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, warn};

/// Maximum number of low-level exit callbacks.
pub const MAX_EXIT_CALLBACKS: usize = 32;

/// A callback run once during finalization.
pub type ExitCallback = Box<dyn FnOnce() + Send>;

/// Callbacks registered for finalization.
///
/// High-level callbacks run before teardown starts, while modules still
/// exist. Low-level callbacks run after everything else is gone. Both run
/// last registered first.
#[derive(Default)]
pub struct ExitCallbacks {
    high: Vec<ExitCallback>,
    low: SmallVec<[ExitCallback; 4]>,
}

impl ExitCallbacks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a high-level callback.
    pub fn at_exit(&mut self, callback: ExitCallback) {
        self.high.push(callback);
    }

    /// Register a low-level callback.
    ///
    /// Fails once [`MAX_EXIT_CALLBACKS`] are registered.
    pub fn register(&mut self, callback: ExitCallback) -> StatusResult {
        if self.low.len() >= MAX_EXIT_CALLBACKS {
            return Err(Status::error(
                "register_exit_callback",
                "too many exit callbacks registered",
            ));
        }
        self.low.push(callback);
        Ok(())
    }

    /// Run and drop the high-level callbacks.
    pub fn run_high(&mut self) {
        let count = self.high.len();
        while let Some(callback) = self.high.pop() {
            callback();
        }
        if count > 0 {
            debug!(count, "exit callbacks ran");
        }
    }

    /// Run and drop the low-level callbacks.
    pub fn run_low(&mut self) {
        while let Some(callback) = self.low.pop() {
            callback();
        }
    }

    /// Number of pending callbacks, high then low.
    #[must_use]
    pub fn pending(&self) -> (usize, usize) {
        (self.high.len(), self.low.len())
    }
}

impl fmt::Debug for ExitCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (high, low) = self.pending();
        f.debug_struct("ExitCallbacks")
            .field("high", &high)
            .field("low", &low)
            .finish()
    }
}

// =============================================================================
// Workers
// =============================================================================

/// Background threads that stop when the runtime finalizes.
///
/// Workers poll the shared shutdown flag; finalization raises it and joins
/// every thread before any other teardown step.
#[derive(Debug)]
pub struct Workers {
    shutdown: Arc<AtomicBool>,
    handles: Vec<(String, thread::JoinHandle<()>)>,
}

impl Workers {
    /// Create an empty pool with the flag lowered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            handles: Vec::new(),
        }
    }

    /// The flag workers poll.
    #[must_use]
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Track a spawned worker.
    pub fn register(&mut self, name: impl Into<String>, handle: thread::JoinHandle<()>) {
        self.handles.push((name.into(), handle));
    }

    /// Number of tracked workers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if no worker is tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Raise the flag, join every worker and lower the flag again.
    pub fn join_all(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        for (name, handle) in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!(worker = %name, "worker panicked before shutdown");
            } else {
                debug!(worker = %name, "worker joined");
            }
        }
        self.shutdown.store(false, Ordering::Release);
    }
}

impl Default for Workers {
    fn default() -> Self {
        Self::new()
    }
}
