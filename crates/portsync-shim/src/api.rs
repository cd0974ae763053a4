//! Flat parity surface.
//!
//! Free functions with the original portable calling convention: every
//! operation returns `0` for success and `1` for failure, absent
//! arguments are expressed as `Option` and rejected before any native
//! primitive is touched, and `cond_timedwait` collapses a timeout into
//! the generic failure code. Callers that need to distinguish a timeout
//! from a native failure use the typed surface instead.

use portsync_core::deadline::Timespec;
use portsync_core::status::{FAIL, OK, code_of};

use crate::cond::ShimCond;
use crate::mutex::ShimMutex;
use crate::thread::{self, ThreadId, ThreadStart};

/// Start a thread running `start(arg)`. Writes the new handle to
/// `thread_out` on success; writes nothing on failure.
pub fn thread_create(
    start: Option<ThreadStart>,
    arg: usize,
    thread_out: Option<&mut ThreadId>,
) -> i32 {
    let (Some(start), Some(out)) = (start, thread_out) else {
        return FAIL;
    };
    match thread::spawn(start, arg) {
        Ok(id) => {
            *out = id;
            OK
        }
        Err(err) => err.code(),
    }
}

/// Block until `id` finishes. The thread's return value is written to
/// `retval_out` when a slot is supplied; passing `None` reproduces the
/// original contract, which discarded it.
pub fn thread_join(id: ThreadId, retval_out: Option<&mut usize>) -> i32 {
    match thread::join(id) {
        Ok(retval) => {
            if let Some(out) = retval_out {
                *out = retval;
            }
            OK
        }
        Err(err) => err.code(),
    }
}

/// Release tracking of `id` without waiting. Always reports success.
pub fn thread_detach(id: ThreadId) -> i32 {
    thread::detach(id);
    OK
}

/// Prepare a mutex in `mutex_out`.
pub fn mutex_init(mutex_out: Option<&mut ShimMutex>) -> i32 {
    match mutex_out {
        Some(slot) => {
            *slot = ShimMutex::new();
            OK
        }
        None => FAIL,
    }
}

/// Release a mutex's native resources. The backing primitive needs no
/// teardown, so this only validates the argument; the caller must
/// guarantee no thread holds or waits on the mutex.
pub fn mutex_destroy(mutex: Option<&ShimMutex>) -> i32 {
    match mutex {
        Some(_) => OK,
        None => FAIL,
    }
}

/// Acquire the mutex, blocking until it is free.
pub fn mutex_lock(mutex: Option<&ShimMutex>) -> i32 {
    match mutex {
        Some(mutex) => {
            mutex.lock();
            OK
        }
        None => FAIL,
    }
}

/// Release the mutex. Unlocking a mutex the caller does not hold is
/// undefined, not guarded.
pub fn mutex_unlock(mutex: Option<&ShimMutex>) -> i32 {
    match mutex {
        Some(mutex) => {
            // SAFETY: caller contract, the mutex is held by this thread.
            unsafe { mutex.unlock() };
            OK
        }
        None => FAIL,
    }
}

/// Prepare a condition variable in `cond_out`.
pub fn cond_init(cond_out: Option<&mut ShimCond>) -> i32 {
    match cond_out {
        Some(slot) => {
            *slot = ShimCond::new();
            OK
        }
        None => FAIL,
    }
}

/// Release a condition variable's resources. The backing primitive
/// needs no explicit destruction, so this is an always-safe no-op; the
/// caller must guarantee no thread is currently waiting.
pub fn cond_destroy(_cond: Option<&ShimCond>) -> i32 {
    OK
}

/// Wait indefinitely: release `mutex`, block, reacquire on wake.
pub fn cond_wait(cond: Option<&ShimCond>, mutex: Option<&ShimMutex>) -> i32 {
    cond_timedwait(cond, mutex, None)
}

/// Wait with an optional absolute deadline. Returns `0` when woken at
/// or before the boundary; `1` when the wait timed out or the native
/// wait failed, without distinguishing the two.
pub fn cond_timedwait(
    cond: Option<&ShimCond>,
    mutex: Option<&ShimMutex>,
    deadline: Option<Timespec>,
) -> i32 {
    let (Some(cond), Some(mutex)) = (cond, mutex) else {
        return FAIL;
    };
    code_of(cond.timed_wait(mutex, deadline))
}

/// Wake at most one waiter. A no-op success when nobody waits.
pub fn cond_signal(cond: Option<&ShimCond>) -> i32 {
    match cond {
        Some(cond) => {
            cond.signal();
            OK
        }
        None => FAIL,
    }
}

/// Wake all current waiters. A no-op success when nobody waits.
pub fn cond_broadcast(cond: Option<&ShimCond>) -> i32 {
    match cond {
        Some(cond) => {
            cond.broadcast();
            OK
        }
        None => FAIL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(arg: usize) -> usize {
        arg
    }

    #[test]
    fn absent_arguments_fail_before_any_native_call() {
        let mut unused = ThreadId::INVALID;
        assert_eq!(thread_create(None, 0, Some(&mut unused)), FAIL);
        assert_eq!(thread_create(Some(echo), 0, None), FAIL);
        assert_eq!(mutex_init(None), FAIL);
        assert_eq!(mutex_destroy(None), FAIL);
        assert_eq!(mutex_lock(None), FAIL);
        assert_eq!(mutex_unlock(None), FAIL);
        assert_eq!(cond_init(None), FAIL);
        assert_eq!(cond_signal(None), FAIL);
        assert_eq!(cond_broadcast(None), FAIL);
        let mutex = ShimMutex::new();
        let cond = ShimCond::new();
        assert_eq!(cond_wait(None, Some(&mutex)), FAIL);
        assert_eq!(cond_wait(Some(&cond), None), FAIL);
        assert_eq!(cond_timedwait(None, None, None), FAIL);
    }

    #[test]
    fn cond_destroy_always_succeeds() {
        // Matches the original contract: no argument validation at all.
        assert_eq!(cond_destroy(None), OK);
        let cond = ShimCond::new();
        assert_eq!(cond_destroy(Some(&cond)), OK);
    }

    #[test]
    fn thread_round_trip_through_the_flat_surface() {
        let mut id = ThreadId::INVALID;
        assert_eq!(thread_create(Some(echo), 7, Some(&mut id)), OK);
        assert_ne!(id, ThreadId::INVALID);
        let mut retval = 0usize;
        assert_eq!(thread_join(id, Some(&mut retval)), OK);
        assert_eq!(retval, 7);
        // The handle is consumed; a second join is a flat failure.
        assert_eq!(thread_join(id, None), FAIL);
        // Detach of a consumed handle still reports success.
        assert_eq!(thread_detach(id), OK);
    }

    #[test]
    fn mutex_round_trip_through_the_flat_surface() {
        let mut mutex = ShimMutex::new();
        assert_eq!(mutex_init(Some(&mut mutex)), OK);
        assert_eq!(mutex_lock(Some(&mutex)), OK);
        assert!(mutex.is_locked());
        assert_eq!(mutex_unlock(Some(&mutex)), OK);
        assert!(!mutex.is_locked());
        assert_eq!(mutex_destroy(Some(&mutex)), OK);
    }

    #[test]
    fn signal_with_no_waiters_reports_success() {
        let cond = ShimCond::new();
        assert_eq!(cond_signal(Some(&cond)), OK);
        assert_eq!(cond_broadcast(Some(&cond)), OK);
    }
}
