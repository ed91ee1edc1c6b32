//! Trace target: passthrough to the process debug sink (stderr)

use super::Target;
use crate::core::error::Result;
use crate::core::log_entry::LogEntry;
use crate::formatters::{DefaultStringConverter, EntryConverter};
use std::io::Write;
use std::sync::Arc;

pub struct TraceTarget {
    formatter: Arc<dyn EntryConverter<String>>,
}

impl TraceTarget {
    pub fn new() -> Self {
        Self {
            formatter: Arc::new(DefaultStringConverter::new()),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn EntryConverter<String>>) -> Self {
        self.formatter = formatter;
        self
    }
}

impl Default for TraceTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for TraceTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        eprint!("{}", self.formatter.convert(entry));
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "trace"
    }
}
