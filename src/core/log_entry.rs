//! Log entry structure
//!
//! An entry is built once, appended to before submission, and read-only for
//! every target afterwards.

use super::fields::LogData;
use super::level::Level;
use super::safe_format::safe_format;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Description of an error attached to a log entry.
///
/// Captures the rendered error chain plus any key/value diagnostic data the
/// call site wants alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub description: String,
    pub data: LogData,
}

impl ErrorInfo {
    /// Build from any `std::error::Error`, rendering the source chain into
    /// the description, one cause per line.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut description = err.to_string();
        let mut cause = err.source();
        while let Some(c) = cause {
            description.push_str("\ncaused by: ");
            description.push_str(&c.to_string());
            cause = c.source();
        }
        Self {
            description,
            data: LogData::new(),
        }
    }

    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            data: LogData::new(),
        }
    }

    #[must_use]
    pub fn with_data<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<super::fields::FieldValue>,
    {
        self.data.insert(key, value);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    /// Logger name that produced this entry.
    pub source: String,
    pub level: Level,
    pub message_format: String,
    /// Positional arguments, display-rendered at the call site.
    pub message_args: Vec<String>,
    pub data: LogData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl LogEntry {
    pub fn new(source: impl Into<String>, level: Level, message_format: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created: Utc::now(),
            source: source.into(),
            level,
            message_format: message_format.into(),
            message_args: Vec::new(),
            data: LogData::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.message_args = args.into_iter().map(|a| a.to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_data<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<super::fields::FieldValue>,
    {
        self.data.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: ErrorInfo) -> Self {
        self.error = Some(error);
        self
    }

    /// The rendered message. Never panics, whatever the format string holds.
    pub fn message(&self) -> String {
        safe_format(&self.message_format, &self.message_args)
    }
}
