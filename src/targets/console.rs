//! Console targets
//!
//! `ConsoleTarget` writes the formatted entry to stdout, routing Error and
//! Fatal to stderr. `ColoredConsoleTarget` wraps it with a per-level color
//! theme.

use super::Target;
use crate::core::error::Result;
use crate::core::level::Level;
use crate::core::log_entry::LogEntry;
use crate::formatters::{DefaultStringConverter, EntryConverter};
use colored::{Color, Colorize};
use std::io::Write;
use std::sync::Arc;

pub struct ConsoleTarget {
    formatter: Arc<dyn EntryConverter<String>>,
}

impl ConsoleTarget {
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

impl Default for ConsoleTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for ConsoleTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let output = self.formatter.convert(entry);
        match entry.level {
            Level::Error | Level::Fatal => eprint!("{}", output),
            _ => print!("{}", output),
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Per-level foreground colors for the colored console.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleTheme {
    pub trace: Color,
    pub debug: Color,
    pub info: Color,
    pub warn: Color,
    pub error: Color,
    pub fatal: Color,
}

impl ConsoleTheme {
    pub fn color_for(&self, level: Level) -> Color {
        match level {
            Level::Trace => self.trace,
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
            Level::Fatal => self.fatal,
        }
    }
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self {
            trace: Level::Trace.color_code(),
            debug: Level::Debug.color_code(),
            info: Level::Info.color_code(),
            warn: Level::Warn.color_code(),
            error: Level::Error.color_code(),
            fatal: Level::Fatal.color_code(),
        }
    }
}

pub struct ColoredConsoleTarget {
    formatter: Arc<dyn EntryConverter<String>>,
    theme: ConsoleTheme,
}

impl ColoredConsoleTarget {
    pub fn new() -> Self {
        Self {
            formatter: Arc::new(DefaultStringConverter::new()),
            theme: ConsoleTheme::default(),
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ConsoleTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn EntryConverter<String>>) -> Self {
        self.formatter = formatter;
        self
    }
}

impl Default for ColoredConsoleTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for ColoredConsoleTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let output = self
            .formatter
            .convert(entry)
            .color(self.theme.color_for(entry.level))
            .to_string();
        match entry.level {
            Level::Error | Level::Fatal => eprint!("{}", output),
            _ => print!("{}", output),
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "colored_console"
    }
}
