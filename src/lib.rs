//! # Tidelog
//!
//! A structured logging framework with an asynchronous dispatch core,
//! per-target filtering, and time-bucketed file and email targets.
//!
//! ## Features
//!
//! - **Asynchronous Core**: producers enqueue, one background consumer
//!   dispatches in submission order
//! - **Per-Target Filtering**: level sets or ranges, source globs, and
//!   final targets that short-circuit dispatch
//! - **Periodic Targets**: one file or email per epoch-aligned time window,
//!   with circular file retention
//! - **Safe Formatting**: positional `{0}`-style templates that never panic
//!   on malformed input
//!
//! ## Quick start
//!
//! ```
//! use tidelog::prelude::*;
//!
//! let memory = MemoryTarget::unbounded();
//! let view = memory.handle();
//! let manager = LogManager::builder().target(memory).build();
//!
//! let logger = manager.logger("app.web");
//! logger.info("server started");
//! logger.entry().data("port", 8080).warn("bind retried");
//! manager.drain();
//!
//! assert_eq!(view.len(), 2);
//! ```

pub mod core;
pub mod formatters;
pub mod macros;
pub mod targets;

pub mod prelude {
    pub use crate::core::{
        EntryBuilder, ErrorInfo, FaultSink, FieldValue, Interval, Level, LogData, LogEntry,
        LogManager, Logger, LoggerError, ManagerBuilder, Result, Scheduler, TimeUnit,
    };
    pub use crate::formatters::{DefaultStringConverter, EntryConverter, FormatterRegistry};
    pub use crate::targets::{
        ColoredConsoleTarget, ConfiguredTarget, ConsoleTarget, FileTarget, MemoryTarget, Target,
        TargetFilter, TargetRegistry, TargetSettings,
    };
}

pub use core::{
    safe_format, EntryBuilder, ErrorInfo, FaultSink, FieldValue, Interval, Level, LogData,
    LogEntry, LogManager, Logger, LoggerError, ManagerBuilder, Result, Scheduler, TimeUnit,
};
pub use formatters::{
    DefaultStringConverter, EntryConverter, FormatterRegistry, IndentWriter, JsonConverter,
};
pub use targets::{
    ColoredConsoleTarget, ConfiguredTarget, ConsoleTarget, ConsoleTheme, DelegateTarget,
    EmailMessage, EmailTarget, EmailTransport, FileTarget, LogFile, MemoryHandle, MemoryTarget,
    NullTarget, PeriodicEmailTarget, PeriodicFileTarget, Target, TargetFilter, TargetRegistry,
    TargetSettings, TraceTarget,
};
