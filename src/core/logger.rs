//! Named logger façade and entry builder
//!
//! A `Logger` is a cheap handle tied to one manager; cloning it or creating
//! many is expected. Entries flow `Logger` -> builder -> manager queue.

use super::fields::FieldValue;
use super::level::Level;
use super::log_entry::{ErrorInfo, LogEntry};
use super::manager::ManagerShared;
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    shared: Arc<ManagerShared>,
    name: String,
}

impl Logger {
    pub(crate) fn new(shared: Arc<ManagerShared>, name: impl Into<String>) -> Self {
        Self {
            shared,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit a fully built entry.
    pub fn write(&self, entry: LogEntry) {
        self.shared.submit(entry);
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.write(LogEntry::new(&self.name, level, message));
    }

    /// Log with a positional format string rendered by the safe formatter.
    pub fn log_format<I, S>(&self, level: Level, format: impl Into<String>, args: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.write(LogEntry::new(&self.name, level, format).with_args(args));
    }

    /// Start building an entry with data or an attached error.
    pub fn entry(&self) -> EntryBuilder<'_> {
        EntryBuilder {
            logger: self,
            data: Vec::new(),
            error: None,
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::Fatal, message);
    }
}

/// Accumulates data and an optional error before the terminal level call
/// submits the entry.
pub struct EntryBuilder<'a> {
    logger: &'a Logger,
    data: Vec<(String, FieldValue)>,
    error: Option<ErrorInfo>,
}

impl EntryBuilder<'_> {
    #[must_use]
    pub fn data<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.data.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn error(mut self, error: ErrorInfo) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn error_from(mut self, err: &(dyn std::error::Error + 'static)) -> Self {
        self.error = Some(ErrorInfo::from_error(err));
        self
    }

    pub fn log(self, level: Level, message: impl Into<String>) {
        let mut entry = LogEntry::new(&self.logger.name, level, message);
        entry.data.extend(self.data);
        entry.error = self.error;
        self.logger.write(entry);
    }

    pub fn log_format<I, S>(self, level: Level, format: impl Into<String>, args: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut entry = LogEntry::new(&self.logger.name, level, format).with_args(args);
        entry.data.extend(self.data);
        entry.error = self.error;
        self.logger.write(entry);
    }

    pub fn trace(self, message: impl Into<String>) {
        self.log(Level::Trace, message);
    }

    pub fn debug(self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warn(self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error_level(self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn fatal(self, message: impl Into<String>) {
        self.log(Level::Fatal, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manager::LogManager;
    use crate::targets::memory::MemoryTarget;

    #[test]
    fn test_logger_name_becomes_entry_source() {
        let memory = MemoryTarget::unbounded();
        let view = memory.handle();
        let manager = LogManager::builder().target(memory).build();

        manager.logger("app.web").info("request handled");
        manager.drain();

        let entries = view.entries();
        assert_eq!(entries[0].source, "app.web");
        assert_eq!(entries[0].level, Level::Info);
    }

    #[test]
    fn test_log_format_renders_args() {
        let memory = MemoryTarget::unbounded();
        let view = memory.handle();
        let manager = LogManager::builder().target(memory).build();

        manager
            .logger("app")
            .log_format(Level::Warn, "retry {0} of {1}", [2, 5]);
        manager.drain();

        assert_eq!(view.entries()[0].message(), "retry 2 of 5");
    }

    #[test]
    fn test_entry_builder_data_and_error() {
        let memory = MemoryTarget::unbounded();
        let view = memory.handle();
        let manager = LogManager::builder().target(memory).build();

        manager
            .logger("app.db")
            .entry()
            .data("attempt", 3)
            .error(ErrorInfo::new("timeout"))
            .error_level("query failed");
        manager.drain();

        let entries = view.entries();
        assert_eq!(entries[0].data.get("attempt"), Some(&FieldValue::Int(3)));
        assert_eq!(entries[0].error.as_ref().unwrap().description, "timeout");
    }
}
