//! Core dispatch types: entries, levels, the manager, and timing primitives

pub mod error;
pub mod fields;
pub mod interval;
pub mod level;
pub mod log_entry;
pub mod logger;
pub mod manager;
pub mod safe_format;
pub mod scheduler;

pub use error::{LoggerError, Result};
pub use fields::{FieldValue, LogData};
pub use interval::{Interval, TimeUnit};
pub use level::Level;
pub use log_entry::{ErrorInfo, LogEntry};
pub use logger::{EntryBuilder, Logger};
pub use manager::{FaultSink, LogManager, ManagerBuilder};
pub use safe_format::safe_format;
pub use scheduler::Scheduler;
