//! Output targets for log entries

pub mod console;
pub mod delegate;
pub mod email;
pub mod file;
pub mod filter;
pub mod memory;
pub mod null;
pub mod periodic;
pub mod periodic_email;
pub mod periodic_file;
pub mod registry;
pub mod trace;

pub use console::{ColoredConsoleTarget, ConsoleTarget, ConsoleTheme};
pub use delegate::DelegateTarget;
pub use email::{EmailMessage, EmailTarget, EmailTransport};
pub use file::{FileTarget, LogFile};
pub use filter::TargetFilter;
pub use memory::{MemoryHandle, MemoryTarget};
pub use null::NullTarget;
pub use periodic_email::{PeriodicEmailBuilder, PeriodicEmailTarget};
pub use periodic_file::{PeriodicFileBuilder, PeriodicFileTarget};
pub use registry::{TargetRegistry, TargetSettings};
pub use trace::TraceTarget;

use crate::core::error::Result;
use crate::core::log_entry::LogEntry;

/// A configured output destination.
///
/// `write` takes `&self`: periodic targets rotate from the timer thread while
/// the consumer writes, so mutable state lives behind locks inside the target.
pub trait Target: Send + Sync {
    fn write(&self, entry: &LogEntry) -> Result<()>;

    /// Push any buffered output towards its destination. Default no-op for
    /// unbuffered targets.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// A target plus the filter state deciding which entries reach it.
pub struct ConfiguredTarget {
    filter: TargetFilter,
    inner: Box<dyn Target>,
}

impl ConfiguredTarget {
    pub fn new(target: impl Target + 'static) -> Self {
        Self {
            filter: TargetFilter::new(),
            inner: Box::new(target),
        }
    }

    pub fn boxed(target: Box<dyn Target>) -> Self {
        Self {
            filter: TargetFilter::new(),
            inner: target,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> &TargetFilter {
        &self.filter
    }

    pub fn is_final(&self) -> bool {
        self.filter.is_final()
    }

    pub fn should_write(&self, entry: &LogEntry) -> bool {
        self.filter.should_write(entry)
    }

    pub fn target(&self) -> &dyn Target {
        self.inner.as_ref()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl std::fmt::Debug for ConfiguredTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredTarget")
            .field("name", &self.name())
            .field("filter", &self.filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;

    #[test]
    fn test_configured_target_debug_names_target() {
        let configured = ConfiguredTarget::new(null::NullTarget::new())
            .with_filter(TargetFilter::new().with_min_level(Level::Warn));
        let rendered = format!("{:?}", configured);
        assert!(rendered.contains("null"));
        assert!(rendered.contains("Warn"));
    }
}
