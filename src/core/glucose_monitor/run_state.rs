//! Liveness of one monitoring run.
//!
//! A run is live from `start` until `stop` retires it. Ticks check liveness
//! under the lock guarding the state they are about to write, and `stop`
//! retires the run while holding those same locks, so nothing from a retired
//! run lands after `stop` returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct RunState {
    live: AtomicBool,
    ticking: AtomicBool,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            live: AtomicBool::new(true),
            ticking: AtomicBool::new(false),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Stop publishing anything from this run
    pub fn retire(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Whether a tick of this run is still executing
    pub fn is_ticking(&self) -> bool {
        self.ticking.load(Ordering::SeqCst)
    }

    /// Mark a tick as in flight until the guard is dropped
    pub fn begin_tick(self: &Arc<Self>) -> TickGuard {
        self.ticking.store(true, Ordering::SeqCst);
        TickGuard(Arc::clone(self))
    }
}

/// Clears the in-flight mark on drop, panics included
pub struct TickGuard(Arc<RunState>);

impl Drop for TickGuard {
    fn drop(&mut self) {
        self.0.ticking.store(false, Ordering::SeqCst);
    }
}
