//! Default text rendering of log entries
//!
//! Layout: a one-line heading (`source : LEVEL : timestamp`), then the
//! message, then each data field as `key: value` with continuation lines
//! indented under the key, then the attached error description and its
//! diagnostic data. Each nested block is one indent level deeper.

use super::indent::IndentWriter;
use super::registry::EntryConverter;
use crate::core::log_entry::{ErrorInfo, LogEntry};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Clone)]
pub struct DefaultStringConverter {
    omit_heading: bool,
    indent: bool,
}

impl DefaultStringConverter {
    pub fn new() -> Self {
        Self {
            omit_heading: false,
            indent: true,
        }
    }

    /// Skip the `source : level : timestamp` heading line.
    #[must_use]
    pub fn omit_heading(mut self, omit: bool) -> Self {
        self.omit_heading = omit;
        self
    }

    /// Disable the body indent under the heading.
    #[must_use]
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    fn write_error(writer: &mut IndentWriter, error: &ErrorInfo) {
        writer.write_lines(&error.description);
        if !error.data.is_empty() {
            writer.write_line("Error Data:");
            writer.indent();
            for (key, value) in error.data.iter() {
                writer.write_line(&format!("{}: {}", key, value));
            }
            writer.unindent();
        }
    }
}

impl Default for DefaultStringConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryConverter<String> for DefaultStringConverter {
    fn convert(&self, entry: &LogEntry) -> String {
        let mut writer = IndentWriter::new();

        if !self.omit_heading {
            writer.write_line(&format!(
                "{} : {} : {}",
                entry.source,
                entry.level,
                entry.created.format(TIMESTAMP_FORMAT)
            ));
        }

        if self.indent {
            writer.indent();
        }

        let message = entry.message();
        if !message.trim().is_empty() {
            writer.write_lines(&message);
        }

        for (key, value) in entry.data.iter() {
            let rendered = value.to_string();
            let mut lines = rendered.lines();
            writer.write_line(&format!("{}: {}", key, lines.next().unwrap_or("")));

            // Continuation lines sit one level under the key.
            writer.indent();
            for line in lines {
                writer.write_line(line);
            }
            writer.unindent();
        }

        if let Some(error) = &entry.error {
            Self::write_error(&mut writer, error);
        }

        if self.indent {
            writer.unindent();
        }

        // Blank separator line between entries.
        let mut out = writer.into_string();
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::log_entry::ErrorInfo;

    fn convert(entry: &LogEntry) -> String {
        DefaultStringConverter::new().convert(entry)
    }

    #[test]
    fn test_heading_line() {
        let entry = LogEntry::new("app.web", Level::Warn, "slow request");
        let out = convert(&entry);
        let heading = out.lines().next().unwrap();
        assert!(heading.starts_with("app.web : WARN : "));
    }

    #[test]
    fn test_message_indented_under_heading() {
        let entry = LogEntry::new("app", Level::Info, "hello");
        let out = convert(&entry);
        assert!(out.contains("\n    hello\n"));
    }

    #[test]
    fn test_omit_heading() {
        let entry = LogEntry::new("app", Level::Info, "hello");
        let out = DefaultStringConverter::new()
            .omit_heading(true)
            .with_indent(false)
            .convert(&entry);
        assert_eq!(out, "hello\n\n");
    }

    #[test]
    fn test_data_fields_in_order() {
        let entry = LogEntry::new("app", Level::Info, "msg")
            .with_data("first", 1)
            .with_data("second", "two");
        let out = convert(&entry);

        let first_pos = out.find("first: 1").unwrap();
        let second_pos = out.find("second: two").unwrap();
        assert!(first_pos < second_pos);
    }

    #[test]
    fn test_multiline_value_continuation_indented() {
        let entry =
            LogEntry::new("app", Level::Info, "msg").with_data("body", "line1\nline2");
        let out = convert(&entry);
        assert!(out.contains("    body: line1\n        line2\n"));
    }

    #[test]
    fn test_error_block_with_data() {
        let entry = LogEntry::new("app", Level::Error, "failed").with_error(
            ErrorInfo::new("connection refused").with_data("host", "db01"),
        );
        let out = convert(&entry);
        assert!(out.contains("connection refused"));
        assert!(out.contains("Error Data:"));
        assert!(out.contains("        host: db01"));
    }

    #[test]
    fn test_entry_ends_with_blank_separator() {
        let entry = LogEntry::new("app", Level::Info, "m");
        let out = convert(&entry);
        assert!(out.ends_with("\n\n"));
    }

    #[test]
    fn test_empty_message_omitted() {
        let entry = LogEntry::new("app", Level::Info, "").with_data("k", "v");
        let out = DefaultStringConverter::new().omit_heading(true).convert(&entry);
        assert!(out.trim_start().starts_with("k: v"));
    }
}
