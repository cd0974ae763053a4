//! Mutex contract semantics.
//!
//! Abstract transition table for the mutual-exclusion primitive. The
//! operational mutex lives in `portsync-shim`; this table pins down the
//! observable contract: which operations succeed, which fail, which
//! block, and which combinations the contract leaves undefined (the
//! shim trusts the caller for those and adds no guards of its own).

use crate::status::Verdict;

/// Abstract mutex state as seen by one calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexState {
    /// Memory not yet initialized as a mutex.
    Uninitialized,
    /// Initialized and currently unheld.
    Free,
    /// Held by the calling thread.
    HeldByCaller,
    /// Held by some other thread.
    HeldByOther,
    /// Destroyed; must be reinitialized before reuse.
    Destroyed,
}

/// Mutex operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexOp {
    Init,
    Lock,
    Unlock,
    Destroy,
}

/// Deterministic result of applying an operation in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutexOutcome {
    /// Next abstract state (meaningful only for defined verdicts).
    pub next: MutexState,
    /// Contract classification of the operation.
    pub verdict: Verdict,
    /// Whether the operation may block awaiting another thread.
    pub blocks: bool,
}

const fn outcome(next: MutexState, verdict: Verdict, blocks: bool) -> MutexOutcome {
    MutexOutcome {
        next,
        verdict,
        blocks,
    }
}

/// Transition table for the mutex contract.
///
/// The mutex is not guaranteed reentrant, so a re-lock by the holder is
/// undefined rather than a guaranteed deadlock or error. Unlocking a
/// mutex the caller does not hold, and destroying a mutex that is held
/// or waited on, are likewise undefined: caller-contract violations,
/// not shim-detected errors.
#[must_use]
pub const fn mutex_transition(state: MutexState, op: MutexOp) -> MutexOutcome {
    match state {
        MutexState::Uninitialized | MutexState::Destroyed => match op {
            MutexOp::Init => outcome(MutexState::Free, Verdict::Success, false),
            _ => outcome(state, Verdict::Undefined, false),
        },
        MutexState::Free => match op {
            MutexOp::Lock => outcome(MutexState::HeldByCaller, Verdict::Success, false),
            MutexOp::Destroy => outcome(MutexState::Destroyed, Verdict::Success, false),
            // Re-initializing a live mutex or unlocking an unheld one.
            MutexOp::Init | MutexOp::Unlock => outcome(state, Verdict::Undefined, false),
        },
        MutexState::HeldByCaller => match op {
            MutexOp::Unlock => outcome(MutexState::Free, Verdict::Success, false),
            // Non-reentrant assumption inherited from the native primitive.
            MutexOp::Lock => outcome(state, Verdict::Undefined, false),
            MutexOp::Init | MutexOp::Destroy => outcome(state, Verdict::Undefined, false),
        },
        MutexState::HeldByOther => match op {
            MutexOp::Lock => outcome(MutexState::HeldByCaller, Verdict::Success, true),
            MutexOp::Init | MutexOp::Unlock | MutexOp::Destroy => {
                outcome(state, Verdict::Undefined, false)
            }
        },
    }
}
