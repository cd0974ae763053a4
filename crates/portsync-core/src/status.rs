//! Status codes and failure taxonomy.
//!
//! The portable contract reports every operation as a flat integer:
//! `0` for success, `1` for failure, with a timeout indistinguishable
//! from any other failure on that surface. The typed layer keeps the
//! failure classes distinct; [`code_of`] folds them back down for
//! callers that expect the flat convention.

use thiserror::Error;

/// Flat success code.
pub const OK: i32 = 0;

/// Flat failure code. All failure classes, timeouts included, collapse
/// into this value on the flat surface.
pub const FAIL: i32 = 1;

/// Failure classes surfaced by shim operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShimError {
    /// A required handle or output argument was absent. Detected before
    /// any native primitive is touched; no state was mutated, so the
    /// caller can always recover.
    #[error("required handle or output argument was absent")]
    InvalidArgument,

    /// The platform refused to start a thread (resource exhaustion or
    /// similar refusal). No retry is attempted internally.
    #[error("native thread creation failed")]
    CreationFailed,

    /// A bounded wait elapsed without being woken.
    #[error("bounded wait elapsed without a wake")]
    TimedOut,

    /// The target thread exited by panicking rather than returning.
    #[error("thread exited by panic")]
    Panicked,
}

impl ShimError {
    /// Flat code for this failure. Every class collapses to [`FAIL`];
    /// callers that need to tell a timeout apart keep the typed result.
    #[must_use]
    pub const fn code(self) -> i32 {
        FAIL
    }
}

/// Fold a typed result into the flat return convention.
#[must_use]
pub fn code_of(result: Result<(), ShimError>) -> i32 {
    match result {
        Ok(()) => OK,
        Err(err) => err.code(),
    }
}

/// Contract-level classification of an operation in a given state.
///
/// `Undefined` marks caller-contract violations (unlock without hold,
/// use after destroy, reuse of a consumed thread handle): the shim does
/// not detect them and the native layer may do anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The operation succeeds and returns [`OK`].
    Success,
    /// The operation fails and returns [`FAIL`].
    Failure,
    /// Outside the caller contract; behavior is not specified.
    Undefined,
}

impl Verdict {
    /// Flat code for defined outcomes; `None` when the contract leaves
    /// the behavior undefined.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        match self {
            Verdict::Success => Some(OK),
            Verdict::Failure => Some(FAIL),
            Verdict::Undefined => None,
        }
    }
}
