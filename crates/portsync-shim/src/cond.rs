//! Condition variable over the host park/unpark primitive.
//!
//! The wait choreography is the one piece of this shim with non-trivial
//! semantics. `parking_lot_core::park` provides the atomicity the
//! contract needs: the waiter is enqueued under the parking-lot bucket
//! lock *before* `before_sleep` runs, and the paired mutex is released
//! inside `before_sleep`. A signaling thread can therefore only observe
//! the mutex unlocked once the waiter is already queued, so no wake
//! issued between unlock and sleep can be lost. On every return path
//! (unpark, timeout, spurious wake) the mutex is reacquired before the
//! call returns.
//!
//! Waiters may still wake spuriously; callers must re-check their wait
//! predicate in a loop, including after a timed wait that reports
//! success.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use parking_lot::lock_api::RawMutex;
use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN, ParkResult};

use portsync_core::deadline::{self, Timespec};
use portsync_core::status::ShimError;

use crate::mutex::ShimMutex;

/// Current wall-clock reading as a [`Timespec`].
///
/// Deadlines handed to [`ShimCond::timed_wait`] are understood to be on
/// this clock.
#[must_use]
pub fn wall_clock_now() -> Timespec {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since_epoch) => Timespec::new(
            since_epoch.as_secs() as i64,
            i64::from(since_epoch.subsec_nanos()),
        ),
        // A pre-1970 clock still yields a usable "now" of the epoch.
        Err(_) => Timespec::new(0, 0),
    }
}

/// Opaque signaling object. Owns no lock; every wait call pairs it with
/// exactly one caller-supplied mutex for the duration of that call.
///
/// The parking key is this condvar's address, so distinct condvars never
/// share a wait queue. The backing primitive needs no explicit teardown;
/// dropping the value is the whole destroy story.
pub struct ShimCond {
    /// Threads currently blocked in wait/timed-wait. Registered under
    /// the bucket lock on the way in, deregistered on the way out.
    waiters: AtomicUsize,
}

impl ShimCond {
    /// Prepare a condition variable for use.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            waiters: AtomicUsize::new(0),
        }
    }

    fn key(&self) -> usize {
        self as *const ShimCond as usize
    }

    /// Whether any thread is currently blocked on this condvar.
    /// Diagnostic only; the answer may be stale immediately.
    #[must_use]
    pub fn has_waiters(&self) -> bool {
        self.waiters.load(Ordering::Acquire) > 0
    }

    /// Block until signaled, broadcast, or spuriously woken.
    ///
    /// Equivalent to [`timed_wait`](Self::timed_wait) with no deadline.
    /// The caller must hold `mutex`; it is released atomically with the
    /// block and reacquired before this returns.
    pub fn wait(&self, mutex: &ShimMutex) -> Result<(), ShimError> {
        self.timed_wait(mutex, None)
    }

    /// Block until woken or until an absolute wall-clock deadline.
    ///
    /// `None` waits indefinitely. A concrete deadline is converted to a
    /// relative whole-millisecond budget against the current wall clock;
    /// an already-passed deadline still attempts the wait once with the
    /// minimal positive budget. Returns `Ok(())` when woken at or before
    /// the boundary and `Err(TimedOut)` when the budget elapses with no
    /// wake. The mutex is reacquired before returning in both cases.
    pub fn timed_wait(
        &self,
        mutex: &ShimMutex,
        deadline: Option<Timespec>,
    ) -> Result<(), ShimError> {
        let budget = deadline::wait_budget(deadline, wall_clock_now().tv_sec);
        let timeout = budget.map(|budget| Instant::now() + budget);

        let validate = || {
            // Runs under the bucket lock: the waiter becomes visible to
            // signalers before the mutex is released.
            self.waiters.fetch_add(1, Ordering::SeqCst);
            true
        };
        let before_sleep = || {
            // The calling thread is already enqueued; releasing the
            // mutex here closes the unlock-to-sleep window.
            //
            // SAFETY: caller contract, the mutex is held by this thread
            // at wait entry.
            unsafe { mutex.raw().unlock() }
        };

        // SAFETY: the key is this condvar's address and is only ever
        // parked on with these closures; none of them panics or calls
        // back into the parking lot for this key.
        let result = unsafe {
            parking_lot_core::park(
                self.key(),
                validate,
                before_sleep,
                |_, _| {},
                DEFAULT_PARK_TOKEN,
                timeout,
            )
        };

        self.waiters.fetch_sub(1, Ordering::SeqCst);

        // Reacquire before returning, timeout included.
        mutex.lock();

        match result {
            ParkResult::Unparked(_) | ParkResult::Invalid => Ok(()),
            ParkResult::TimedOut => Err(ShimError::TimedOut),
        }
    }

    /// Wake at most one blocked waiter; which one is unspecified.
    ///
    /// Returns how many threads were released (0 or 1). Waking with no
    /// waiters is a no-op, not an error.
    pub fn signal(&self) -> usize {
        if !self.has_waiters() {
            return 0;
        }
        // SAFETY: same key as the park calls; the callback is trivial.
        let unparked = unsafe {
            parking_lot_core::unpark_one(self.key(), |_| DEFAULT_UNPARK_TOKEN)
        };
        unparked.unparked_threads
    }

    /// Wake every waiter present at the moment of the call.
    ///
    /// Returns how many threads were released.
    pub fn broadcast(&self) -> usize {
        if !self.has_waiters() {
            return 0;
        }
        // SAFETY: same key as the park calls.
        unsafe { parking_lot_core::unpark_all(self.key(), DEFAULT_UNPARK_TOKEN) }
    }
}

impl Default for ShimCond {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShimCond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShimCond")
            .field("waiters", &self.waiters.load(Ordering::Relaxed))
            .finish()
    }
}
