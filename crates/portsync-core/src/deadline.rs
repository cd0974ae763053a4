//! Absolute-deadline to relative-wait conversion.
//!
//! The condition-variable backend accepts only relative timeouts, so an
//! absolute deadline (seconds + nanoseconds on the wall clock) has to be
//! converted to a whole-millisecond wait budget against "now". The
//! subtraction runs in signed 64-bit and any result at or below zero is
//! clamped to [`MIN_WAIT`]: an already-passed deadline means "attempt
//! the wait once and return immediately", never "wait forever" and never
//! a wrapped-around huge duration.

use std::time::Duration;

/// Nanoseconds per second.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Nanoseconds per millisecond.
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// Smallest representable positive wait, in whole milliseconds.
pub const MIN_WAIT_MS: u64 = 1;

/// Smallest representable positive wait.
pub const MIN_WAIT: Duration = Duration::from_millis(MIN_WAIT_MS);

/// An absolute point in time: whole seconds plus a nanosecond remainder,
/// on the same clock as the current-time query the shim uses internally.
///
/// A deadline is a transient value consumed once per timed wait; it has
/// no lifecycle of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timespec {
    /// Whole seconds.
    pub tv_sec: i64,
    /// Nanosecond remainder (0 to 999_999_999).
    pub tv_nsec: i64,
}

impl Timespec {
    /// Build a timespec from raw parts.
    #[must_use]
    pub const fn new(tv_sec: i64, tv_nsec: i64) -> Self {
        Self { tv_sec, tv_nsec }
    }

    /// Deadline `ms` milliseconds after `now`, carrying nanosecond
    /// overflow into the seconds field.
    #[must_use]
    pub const fn after_ms(now: Timespec, ms: u64) -> Self {
        let total_nsec = now.tv_nsec + (ms as i64 % 1000) * NANOS_PER_MILLI;
        Self {
            tv_sec: now.tv_sec + ms as i64 / 1000 + total_nsec / NANOS_PER_SEC,
            tv_nsec: total_nsec % NANOS_PER_SEC,
        }
    }
}

/// Returns `true` if `tv_nsec` is a valid nanosecond remainder.
#[must_use]
pub const fn valid_nsec(tv_nsec: i64) -> bool {
    tv_nsec >= 0 && tv_nsec < NANOS_PER_SEC
}

/// Convert an absolute deadline to a relative wait budget in whole
/// milliseconds, floor-truncated.
///
/// `None` means "wait indefinitely". For a concrete deadline the budget
/// is `(deadline.tv_sec - now_sec) * 1000 + deadline.tv_nsec / 1_000_000`,
/// computed with saturating signed arithmetic; anything at or below zero
/// clamps to [`MIN_WAIT_MS`].
#[must_use]
pub const fn wait_budget_ms(deadline: Option<Timespec>, now_sec: i64) -> Option<u64> {
    match deadline {
        None => None,
        Some(deadline) => {
            let ms = deadline
                .tv_sec
                .saturating_sub(now_sec)
                .saturating_mul(1000)
                .saturating_add(deadline.tv_nsec / NANOS_PER_MILLI);
            if ms <= 0 {
                Some(MIN_WAIT_MS)
            } else {
                Some(ms as u64)
            }
        }
    }
}

/// [`wait_budget_ms`] expressed as a [`Duration`].
#[must_use]
pub fn wait_budget(deadline: Option<Timespec>, now_sec: i64) -> Option<Duration> {
    wait_budget_ms(deadline, now_sec).map(Duration::from_millis)
}
