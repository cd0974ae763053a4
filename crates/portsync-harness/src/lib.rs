//! # portsync-harness
//!
//! Conformance tooling for the portsync shim: executable scenarios for
//! the observable-behavior contract (mutual exclusion, wake semantics,
//! timeout windows, detach churn), a runner that collects per-scenario
//! results, and a structured JSONL log for evidence trails.

use thiserror::Error;

pub mod runner;
pub mod scenarios;
pub mod structured_log;

pub use runner::{Runner, ScenarioResult};
pub use scenarios::ScenarioConfig;
pub use structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, validate_log_line};

/// Errors surfaced by harness tooling.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed log line: {0}")]
    Json(#[from] serde_json::Error),

    #[error("log line is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),
}
