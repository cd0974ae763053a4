//! Condition-variable contract semantics.
//!
//! The portable contract models a condition variable as Idle (no
//! waiters) or HasWaiters (one or more threads blocked), with
//! Uninitialized/Destroyed bookends. This table pins down the wake
//! semantics the operational condvar in `portsync-shim` must honor:
//! signal wakes at most one waiter, broadcast wakes all present at call
//! time, neither reports an error when nobody is waiting, and destroy is
//! an always-safe no-op because the backing primitive needs no explicit
//! teardown.

use crate::status::Verdict;

/// Abstract condition-variable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondState {
    /// Memory not yet initialized as a condition variable.
    Uninitialized,
    /// Initialized, no thread blocked.
    Idle,
    /// Initialized, one or more threads blocked in wait/timed-wait.
    HasWaiters,
    /// Destroyed; must be reinitialized before reuse.
    Destroyed,
}

/// Condition-variable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Init,
    Wait,
    TimedWait,
    Signal,
    Broadcast,
    Destroy,
}

/// How many waiters an operation releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeClass {
    /// No thread is released (including signal/broadcast with no waiters).
    None,
    /// At most one waiter is released; which one is unspecified.
    One,
    /// Every waiter present at call time is released.
    All,
}

/// Deterministic result of applying an operation in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CondOutcome {
    /// Next abstract state (meaningful only for defined verdicts).
    pub next: CondState,
    /// Contract classification of the operation.
    pub verdict: Verdict,
    /// Whether the calling thread blocks.
    pub blocks: bool,
    /// Waiters released by this operation.
    pub wakes: WakeClass,
}

const fn outcome(next: CondState, verdict: Verdict, blocks: bool, wakes: WakeClass) -> CondOutcome {
    CondOutcome {
        next,
        verdict,
        blocks,
        wakes,
    }
}

/// Transition table for the condition-variable contract.
///
/// `waiters` is the waiter count before the operation; it
/// disambiguates whether a signal drains the last waiter. Waiting
/// without holding the paired mutex is a caller-contract violation and
/// is not representable here: every Wait/TimedWait row assumes the
/// mutex is held at call time.
#[must_use]
pub const fn cond_transition(state: CondState, op: CondOp, waiters: u32) -> CondOutcome {
    match state {
        CondState::Uninitialized | CondState::Destroyed => match op {
            CondOp::Init => outcome(CondState::Idle, Verdict::Success, false, WakeClass::None),
            _ => outcome(state, Verdict::Undefined, false, WakeClass::None),
        },
        CondState::Idle => match op {
            CondOp::Wait | CondOp::TimedWait => {
                outcome(CondState::HasWaiters, Verdict::Success, true, WakeClass::None)
            }
            // Waking with no waiters is an observable no-op, not an error.
            CondOp::Signal | CondOp::Broadcast => {
                outcome(CondState::Idle, Verdict::Success, false, WakeClass::None)
            }
            CondOp::Destroy => {
                outcome(CondState::Destroyed, Verdict::Success, false, WakeClass::None)
            }
            CondOp::Init => outcome(state, Verdict::Undefined, false, WakeClass::None),
        },
        CondState::HasWaiters => match op {
            CondOp::Wait | CondOp::TimedWait => {
                outcome(CondState::HasWaiters, Verdict::Success, true, WakeClass::None)
            }
            CondOp::Signal => {
                let next = if waiters > 1 {
                    CondState::HasWaiters
                } else {
                    CondState::Idle
                };
                outcome(next, Verdict::Success, false, WakeClass::One)
            }
            CondOp::Broadcast => {
                outcome(CondState::Idle, Verdict::Success, false, WakeClass::All)
            }
            // Destroying while threads are blocked is a caller violation.
            CondOp::Init | CondOp::Destroy => {
                outcome(state, Verdict::Undefined, false, WakeClass::None)
            }
        },
    }
}

/// Spurious wakeup policy.
///
/// Matches standard condition-variable semantics: a waiter may return
/// without any signal, broadcast, or timeout, and a timed wait that
/// returns success may still find its predicate false.
#[must_use]
pub const fn spurious_wakeup_policy() -> &'static str {
    "Waiters may wake spuriously. Callers must re-check the wait \
predicate in a loop after every return from wait or timed-wait, \
including a timed-wait that reports success."
}

/// Wake-ordering policy.
#[must_use]
pub const fn wake_ordering_note() -> &'static str {
    "Signal wakes at most one waiter; which one is chosen by the native \
layer with no FIFO or priority guarantee. Broadcast releases every \
waiter present at the moment of the call."
}
