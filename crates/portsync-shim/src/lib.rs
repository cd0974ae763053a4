//! # portsync-shim
//!
//! Thread, mutex, and condition-variable operations under one portable
//! contract, implemented atop the host's parking primitives.
//!
//! The mutex is a thin wrapper over `parking_lot::RawMutex`; the
//! condition variable is built on `parking_lot_core`'s park/unpark,
//! which supplies the atomic enqueue-unlock-sleep choreography and
//! relative timeouts; threads ride on `std::thread` behind an opaque
//! handle registry. The shim adds no locking of its own; it only
//! normalizes the native feature set behind one calling convention.
//!
//! Two surfaces are exposed:
//! - typed: [`ShimMutex`], [`ShimCond`], and the `thread` module, with
//!   `Result`-returning operations that keep failure classes distinct;
//! - flat ([`api`]): free functions returning `0`/`1` with absent
//!   arguments expressed as `Option`, for parity with the original
//!   contract.

pub mod api;
pub mod cond;
pub mod mutex;
pub mod thread;

pub use cond::{ShimCond, wall_clock_now};
pub use mutex::ShimMutex;
pub use thread::{ThreadId, ThreadStart};
