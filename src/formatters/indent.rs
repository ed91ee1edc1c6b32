//! Indented line writer used by the default text converter
//!
//! Indentation is purely cosmetic: a fixed prefix per level, restored to the
//! prior level when a block ends.

const DEFAULT_TAB: &str = "    ";

pub struct IndentWriter {
    buf: String,
    level: usize,
    tab: String,
}

impl IndentWriter {
    pub fn new() -> Self {
        Self::with_tab(DEFAULT_TAB)
    }

    pub fn with_tab(tab: impl Into<String>) -> Self {
        Self {
            buf: String::new(),
            level: 0,
            tab: tab.into(),
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn unindent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Write one line at the current indent level.
    pub fn write_line(&mut self, line: &str) {
        for _ in 0..self.level {
            self.buf.push_str(&self.tab);
        }
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    /// Write multi-line text, indenting every line.
    pub fn write_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.write_line(line);
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Default for IndentWriter {
    fn default() -> Self {
        Self::new()
    }
}
