//! Structured logging for harness runs.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file or stdout.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Scenario outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The scenario's checks all held.
    Pass,
    /// A check failed.
    Fail,
    /// The scenario panicked or could not run.
    Error,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `level`, `event`. Optional fields
/// carry per-scenario context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogEntry {
    /// A bare event with no scenario context.
    #[must_use]
    pub fn event(level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_timestamp(),
            level,
            event: event.into(),
            scenario: None,
            outcome: None,
            duration_ms: None,
            detail: None,
        }
    }

    /// A per-scenario result record.
    #[must_use]
    pub fn scenario_result(
        scenario: impl Into<String>,
        outcome: Outcome,
        duration_ms: u64,
        detail: impl Into<String>,
    ) -> Self {
        let level = match outcome {
            Outcome::Pass => LogLevel::Info,
            Outcome::Fail => LogLevel::Warn,
            Outcome::Error => LogLevel::Error,
        };
        Self {
            timestamp: now_timestamp(),
            level,
            event: "scenario".to_string(),
            scenario: Some(scenario.into()),
            outcome: Some(outcome),
            duration_ms: Some(duration_ms),
            detail: Some(detail.into()),
        }
    }
}

/// Seconds-plus-millis wall-clock timestamp, e.g. `1735689600.042`.
#[must_use]
pub fn now_timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since_epoch) => format!(
            "{}.{:03}",
            since_epoch.as_secs(),
            since_epoch.subsec_millis()
        ),
        Err(_) => "0.000".to_string(),
    }
}

/// Writes JSONL records to a file or stdout.
pub struct LogEmitter {
    sink: Box<dyn Write + Send>,
}

impl LogEmitter {
    /// Emitter writing to stdout.
    #[must_use]
    pub fn to_stdout() -> Self {
        Self {
            sink: Box::new(io::stdout()),
        }
    }

    /// Emitter appending to the file at `path`, creating it if needed.
    pub fn to_file(path: &Path) -> Result<Self, HarnessError> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Box::new(file),
        })
    }

    /// Write one entry as a single JSON line.
    pub fn emit(&mut self, entry: &LogEntry) -> Result<(), HarnessError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.sink, "{line}")?;
        Ok(())
    }
}

/// Validate a single JSONL line against the schema.
pub fn validate_log_line(line: &str) -> Result<LogEntry, HarnessError> {
    let entry: LogEntry = serde_json::from_str(line)?;
    if entry.timestamp.is_empty() {
        return Err(HarnessError::MissingField("timestamp"));
    }
    if entry.event.is_empty() {
        return Err(HarnessError::MissingField("event"));
    }
    Ok(entry)
}
