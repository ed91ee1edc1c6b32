//! In-memory target: a bounded FIFO buffer of entries
//!
//! Useful for tests and for surfacing recent entries in a UI. A cloneable
//! handle gives read access after the target itself has been moved into the
//! manager.

use super::Target;
use crate::core::error::Result;
use crate::core::log_entry::LogEntry;
use crate::formatters::{DefaultStringConverter, EntryConverter};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

struct MemoryBuffer {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: Option<usize>,
}

pub struct MemoryTarget {
    buffer: Arc<MemoryBuffer>,
    formatter: Arc<dyn EntryConverter<String>>,
}

impl MemoryTarget {
    /// Keep at most `capacity` entries; the oldest is dropped when full.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(Some(capacity))
    }

    pub fn unbounded() -> Self {
        Self::build(None)
    }

    fn build(capacity: Option<usize>) -> Self {
        Self {
            buffer: Arc::new(MemoryBuffer {
                entries: Mutex::new(VecDeque::new()),
                capacity,
            }),
            formatter: Arc::new(DefaultStringConverter::new()),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn EntryConverter<String>>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Read handle that stays valid after the target moves into a manager.
    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            buffer: Arc::clone(&self.buffer),
            formatter: Arc::clone(&self.formatter),
        }
    }
}

impl Target for MemoryTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut entries = self.buffer.entries.lock();
        entries.push_back(entry.clone());
        if let Some(capacity) = self.buffer.capacity {
            while entries.len() > capacity {
                entries.pop_front();
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[derive(Clone)]
pub struct MemoryHandle {
    buffer: Arc<MemoryBuffer>,
    formatter: Arc<dyn EntryConverter<String>>,
}

impl MemoryHandle {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.entries.lock().is_empty()
    }

    /// All buffered entries rendered through the target's formatter.
    pub fn view(&self) -> String {
        self.buffer
            .entries
            .lock()
            .iter()
            .map(|e| self.formatter.convert(e))
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;

    #[test]
    fn test_capacity_drops_oldest() {
        let target = MemoryTarget::with_capacity(2);
        let view = target.handle();

        for msg in ["one", "two", "three"] {
            target.write(&LogEntry::new("s", Level::Info, msg)).unwrap();
        }

        let entries = view.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message(), "two");
        assert_eq!(entries[1].message(), "three");
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let target = MemoryTarget::unbounded();
        let view = target.handle();
        for i in 0..50 {
            target
                .write(&LogEntry::new("s", Level::Debug, format!("{}", i)))
                .unwrap();
        }
        assert_eq!(view.len(), 50);
    }

    #[test]
    fn test_view_renders_entries() {
        let target = MemoryTarget::unbounded();
        let view = target.handle();
        target
            .write(&LogEntry::new("app", Level::Warn, "careful"))
            .unwrap();

        let rendered = view.view();
        assert!(rendered.contains("careful"));
        assert!(rendered.contains("WARN"));
    }

    #[test]
    fn test_clear() {
        let target = MemoryTarget::unbounded();
        let view = target.handle();
        target.write(&LogEntry::new("s", Level::Info, "m")).unwrap();
        view.clear();
        assert!(view.is_empty());
    }
}
