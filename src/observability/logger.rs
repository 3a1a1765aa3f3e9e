//! Structured JSON logger
//!
//! - One log line = one event
//! - Synchronous, no buffering
//! - Deterministic key ordering
//! - INFO and WARN to stdout, ERROR and FATAL to stderr

use std::fmt;
use std::io::{self, Write};

use serde_json::{Map, Value};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Recoverable issues
    Warn,
    /// Operation failures
    Error,
    /// Unrecoverable, the process is expected to exit
    Fatal,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs one JSON object per line.
pub struct Logger;

impl Logger {
    /// Log a normal operational event.
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log a recoverable issue.
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log an operation failure.
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log an unrecoverable failure.
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }

    /// Log an event with the given severity and fields.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        match severity {
            Severity::Info | Severity::Warn => {
                Self::write_line(severity, event, fields, &mut io::stdout())
            }
            Severity::Error | Severity::Fatal => {
                Self::write_line(severity, event, fields, &mut io::stderr())
            }
        }
    }

    fn write_line<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], writer: &mut W) {
        // serde_json's map keeps keys sorted, so output order is
        // deterministic regardless of field order at the call site.
        let mut record = Map::new();
        record.insert("event".to_string(), Value::from(event));
        record.insert("severity".to_string(), Value::from(severity.as_str()));
        for (key, value) in fields {
            record.insert((*key).to_string(), Value::from(*value));
        }

        let mut line = Value::Object(record).to_string();
        line.push('\n');

        // One write, one flush: a log line is a single event
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}
