//! Coordination with a host-wide lock around the numeric section.
//!
//! A host runtime (an embedding interpreter, a GUI thread, a job scheduler)
//! may require callers to hold a global lock while touching its objects.
//! Feature extraction never touches host objects, so the adapter hands the
//! lock back for the duration of the computation and takes it again before
//! returning, on success and on error alike.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A lock the calling thread holds on entry and must hold again on return.
pub trait CoordinationLock: Send + Sync {
    /// Give up the lock. Called once when a [`ReleasedRegion`] is entered.
    fn release(&self);

    /// Take the lock back, blocking until it is available.
    fn reacquire(&self);
}

/// RAII guard for the region in which the coordination lock is not held.
///
/// The lock is reacquired when the guard is dropped, including during
/// unwinding and early `?` returns.
#[must_use = "the lock is reacquired as soon as the guard is dropped"]
pub struct ReleasedRegion<'a> {
    lock: &'a dyn CoordinationLock,
}

impl<'a> ReleasedRegion<'a> {
    pub fn enter(lock: &'a dyn CoordinationLock) -> Self {
        lock.release();
        tracing::trace!("coordination lock released");
        Self { lock }
    }
}

impl Drop for ReleasedRegion<'_> {
    fn drop(&mut self) {
        self.lock.reacquire();
        tracing::trace!("coordination lock reacquired");
    }
}

/// No host lock to coordinate with.
#[derive(Debug, Default, Clone, Copy)]
pub struct Uncoordinated;

impl CoordinationLock for Uncoordinated {
    fn release(&self) {}
    fn reacquire(&self) {}
}

/// A single-holder baton.
///
/// Threads that stand in for the host take it with [`ExclusiveLock::hold`];
/// a [`ReleasedRegion`] entered by the holder lets other threads take it
/// until the region ends.
#[derive(Debug, Default)]
pub struct ExclusiveLock {
    held: Mutex<bool>,
    available: Condvar,
}

impl ExclusiveLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the baton is free, then take it.
    pub fn hold(&self) -> Holder<'_> {
        self.acquire();
        Holder { lock: self }
    }

    /// Whether some thread currently holds the baton.
    pub fn is_held(&self) -> bool {
        *self.state()
    }

    fn state(&self) -> MutexGuard<'_, bool> {
        // The flag is a plain bool, it stays meaningful after a panic
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) {
        let mut held = self.state();
        while *held {
            held = self
                .available
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
    }

    fn free(&self) {
        *self.state() = false;
        self.available.notify_all();
    }
}

impl CoordinationLock for ExclusiveLock {
    fn release(&self) {
        self.free();
    }

    fn reacquire(&self) {
        self.acquire();
    }
}

/// Ownership of an [`ExclusiveLock`]; frees it on drop.
#[must_use = "the baton is freed as soon as the holder is dropped"]
pub struct Holder<'a> {
    lock: &'a ExclusiveLock,
}

impl Drop for Holder<'_> {
    fn drop(&mut self) {
        self.lock.free();
    }
}
