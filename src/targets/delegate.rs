//! Delegate target: hands every accepted entry to a user closure
//!
//! The escape hatch for destinations the crate does not model (platform
//! event logs, metrics pipelines, custom sinks).

use super::Target;
use crate::core::error::Result;
use crate::core::log_entry::LogEntry;

pub struct DelegateTarget {
    action: Box<dyn Fn(&LogEntry) -> Result<()> + Send + Sync>,
}

impl DelegateTarget {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&LogEntry) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            action: Box::new(action),
        }
    }

    /// Convenience for closures that cannot fail.
    pub fn from_fn<F>(action: F) -> Self
    where
        F: Fn(&LogEntry) + Send + Sync + 'static,
    {
        Self::new(move |entry| {
            action(entry);
            Ok(())
        })
    }
}

impl Target for DelegateTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        (self.action)(entry)
    }

    fn name(&self) -> &str {
        "delegate"
    }
}
