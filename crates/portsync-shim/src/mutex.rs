//! Mutual-exclusion object over the native raw mutex.
//!
//! `parking_lot::RawMutex` is guard-free, which is what a pass-through
//! lock/unlock calling convention needs: the lock is not tied to a
//! scope, and releasing it is a separate call that may happen inside
//! the condition-variable wait choreography. The wrapper adds nothing
//! beyond a distinct, non-interchangeable type for the handle.

use std::fmt;

use parking_lot::RawMutex;
use parking_lot::lock_api::RawMutex as _;

/// Opaque mutual-exclusion object. Not guaranteed reentrant.
///
/// Lifecycle: init → {lock/unlock}* → destroy. Use after destroy and
/// unlock without holding the lock are caller-contract violations the
/// shim does not guard against.
pub struct ShimMutex {
    raw: RawMutex,
}

impl ShimMutex {
    /// Prepare a mutex for use. Attributes of the emulated portable API
    /// carry no behavior on this platform, so none are accepted.
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawMutex::INIT }
    }

    /// Acquire the mutex, blocking until it is free.
    pub fn lock(&self) {
        self.raw.lock();
    }

    /// Try to acquire the mutex without blocking.
    pub fn try_lock(&self) -> bool {
        self.raw.try_lock()
    }

    /// Release the mutex.
    ///
    /// # Safety
    ///
    /// The calling thread must currently hold the mutex. Unlocking a
    /// mutex that is not held is undefined, matching the native
    /// primitive's contract.
    pub unsafe fn unlock(&self) {
        // SAFETY: forwarded caller contract.
        unsafe { self.raw.unlock() }
    }

    /// Whether any thread currently holds the mutex. Diagnostic only:
    /// the answer may be stale by the time the caller observes it.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }

    pub(crate) fn raw(&self) -> &RawMutex {
        &self.raw
    }
}

impl Default for ShimMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShimMutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShimMutex")
            .field("locked", &self.is_locked())
            .finish()
    }
}
