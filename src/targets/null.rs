//! Null target: accepts and discards every entry

use super::Target;
use crate::core::error::Result;
use crate::core::log_entry::LogEntry;

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl NullTarget {
    pub fn new() -> Self {
        Self
    }
}

impl Target for NullTarget {
    fn write(&self, _entry: &LogEntry) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
