//! Email targets send formatted entries through an `EmailTransport`.
//!
//! The transport is the seam for the actual delivery mechanism (SMTP client,
//! sendmail pipe, HTTP API); the crate only builds the message. Tests use a
//! recording transport.

use super::Target;
use crate::core::error::Result;
use crate::core::log_entry::LogEntry;
use crate::formatters::{DefaultStringConverter, EntryConverter};
use std::sync::Arc;

/// A fully assembled outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: Option<String>,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery mechanism for [`EmailMessage`]s.
pub trait EmailTransport: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

impl<F> EmailTransport for F
where
    F: Fn(&EmailMessage) -> Result<()> + Send + Sync,
{
    fn send(&self, message: &EmailMessage) -> Result<()> {
        self(message)
    }
}

pub(crate) fn default_subject(entry: &LogEntry) -> String {
    format!("{} log entry from {}", entry.level, entry.source)
}

/// Sends one email per accepted entry.
///
/// For anything beyond rare high-severity notifications, prefer
/// [`PeriodicEmailTarget`](super::PeriodicEmailTarget), which batches a whole
/// time window into one message.
pub struct EmailTarget {
    transport: Arc<dyn EmailTransport>,
    from: Option<String>,
    to: String,
    subject: Option<String>,
    formatter: Arc<dyn EntryConverter<String>>,
}

impl EmailTarget {
    pub fn new(transport: Arc<dyn EmailTransport>, to: impl Into<String>) -> Self {
        Self {
            transport,
            from: None,
            to: to.into(),
            subject: None,
            formatter: Arc::new(DefaultStringConverter::new()),
        }
    }

    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Fixed subject line; the default derives one from each entry.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn EntryConverter<String>>) -> Self {
        self.formatter = formatter;
        self
    }
}

impl Target for EmailTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let message = EmailMessage {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self
                .subject
                .clone()
                .unwrap_or_else(|| default_subject(entry)),
            body: self.formatter.convert(entry),
        };
        self.transport.send(&message)
    }

    fn name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use parking_lot::Mutex;

    /// Captures every message instead of delivering it.
    #[derive(Default)]
    pub struct RecordingTransport {
        sent: Mutex<Vec<EmailMessage>>,
    }

    impl RecordingTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().clone()
        }
    }

    impl EmailTransport for RecordingTransport {
        fn send(&self, message: &EmailMessage) -> Result<()> {
            self.sent.lock().push(message.clone());
            Ok(())
        }
    }
}
