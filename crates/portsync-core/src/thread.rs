//! Thread-lifecycle contract semantics.
//!
//! A thread handle is used-once: after join or detach it must not be
//! reused. Join blocks until the target finishes and transfers cleanup
//! to the shim; detach releases the shim's tracking without waiting and
//! the thread cleans itself up on exit.

use crate::status::Verdict;

/// Abstract lifecycle state of a thread handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// The start routine is still executing.
    Running,
    /// The start routine returned; the handle has not been consumed.
    Finished,
    /// Handle consumed by join; resources released by the shim.
    Joined,
    /// Handle consumed by detach; the thread releases its own resources.
    Detached,
}

/// Handle-consuming operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadOp {
    Join,
    Detach,
}

/// Deterministic result of applying an operation to a handle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadOutcome {
    /// Next handle state (meaningful only for defined verdicts).
    pub next: ThreadState,
    /// Contract classification of the operation.
    pub verdict: Verdict,
    /// Whether the operation blocks until the thread exits.
    pub blocks: bool,
}

const fn outcome(next: ThreadState, verdict: Verdict, blocks: bool) -> ThreadOutcome {
    ThreadOutcome {
        next,
        verdict,
        blocks,
    }
}

/// Transition table for the thread-handle contract.
#[must_use]
pub const fn thread_transition(state: ThreadState, op: ThreadOp) -> ThreadOutcome {
    match state {
        ThreadState::Running => match op {
            ThreadOp::Join => outcome(ThreadState::Joined, Verdict::Success, true),
            ThreadOp::Detach => outcome(ThreadState::Detached, Verdict::Success, false),
        },
        ThreadState::Finished => match op {
            ThreadOp::Join => outcome(ThreadState::Joined, Verdict::Success, false),
            ThreadOp::Detach => outcome(ThreadState::Detached, Verdict::Success, false),
        },
        // The handle was already consumed.
        ThreadState::Joined | ThreadState::Detached => {
            outcome(state, Verdict::Undefined, false)
        }
    }
}
