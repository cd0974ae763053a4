//! Thread lifecycle over `std::thread`, behind an opaque handle registry.
//!
//! Handles are small integer ids rather than raw join handles, so a
//! thread handle can never be confused with a mutex or condvar at the
//! type level, and consuming a handle twice is detectable instead of
//! undefined. The registry maps each id to its `JoinHandle`; join and
//! detach both remove the entry, making the handle used-once.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use portsync_core::status::ShimError;

/// Start routine for a shim thread: invoked as `start(arg)`, its return
/// value is surfaced by [`join`]. Memory behind `arg` is owned by the
/// caller.
pub type ThreadStart = fn(usize) -> usize;

/// Opaque thread handle. Used-once: after [`join`] or [`detach`] the
/// handle refers to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(u64);

impl ThreadId {
    /// Placeholder for out-parameters; never allocated to a live thread.
    pub const INVALID: ThreadId = ThreadId(0);
}

type JoinTable = HashMap<ThreadId, JoinHandle<usize>>;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

fn join_table() -> &'static Mutex<JoinTable> {
    static TABLE: OnceLock<Mutex<JoinTable>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn fresh_thread_id() -> ThreadId {
    ThreadId(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed))
}

/// Start a new thread executing `start(arg)` with default platform
/// attributes.
///
/// On failure (platform refusal, resource exhaustion) nothing is
/// registered and [`ShimError::CreationFailed`] is returned.
pub fn spawn(start: ThreadStart, arg: usize) -> Result<ThreadId, ShimError> {
    let id = fresh_thread_id();
    let handle = thread::Builder::new()
        .name(format!("portsync-{}", id.0))
        .spawn(move || start(arg))
        .map_err(|_| ShimError::CreationFailed)?;
    join_table().lock().insert(id, handle);
    Ok(id)
}

/// Block until the thread behind `id` finishes, releasing its resources
/// and returning its start routine's value.
///
/// Consumes the handle. A handle that was never issued or was already
/// consumed reports [`ShimError::InvalidArgument`]; a thread that exited
/// by panic reports [`ShimError::Panicked`].
pub fn join(id: ThreadId) -> Result<usize, ShimError> {
    let handle = join_table()
        .lock()
        .remove(&id)
        .ok_or(ShimError::InvalidArgument)?;
    handle.join().map_err(|_| ShimError::Panicked)
}

/// Release tracking of `id` without waiting for completion. The thread
/// keeps running and cleans up its own resources on exit.
///
/// Always succeeds, including for handles that were never issued or
/// were already consumed.
pub fn detach(id: ThreadId) {
    drop(join_table().lock().remove(&id));
}

/// How many spawned threads are still tracked (neither joined nor
/// detached). Diagnostic for tests and the conformance harness.
#[must_use]
pub fn tracked_threads() -> usize {
    join_table().lock().len()
}
