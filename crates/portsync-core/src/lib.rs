//! # portsync-core
//!
//! Pure, safe logic for the portable synchronization shim.
//!
//! This crate carries everything that can be specified without touching a
//! native primitive: the flat status-code convention and error taxonomy,
//! the absolute-deadline to relative-wait conversion, and the clean-room
//! transition contracts for the three primitive groups (mutex, condition
//! variable, thread lifecycle). The operational side lives in
//! `portsync-shim`.

#![deny(unsafe_code)]

pub mod cond;
pub mod deadline;
pub mod mutex;
pub mod status;
pub mod thread;
