//! Level-named logging macros.
//!
//! Thin sugar over [`Logger::log`](crate::core::Logger::log): the message is
//! rendered eagerly with `format!` on the calling thread, then submitted.
//! For deferred positional rendering use `Logger::log_format` instead.
//!
//! # Examples
//!
//! ```
//! use tidelog::prelude::*;
//! use tidelog::info;
//!
//! let manager = LogManager::new();
//! let logger = manager.logger("app");
//!
//! info!(logger, "server started");
//!
//! let port = 8080;
//! info!(logger, "listening on port {}", port);
//! ```

/// Log a message at an explicit level with automatic formatting.
///
/// ```
/// # use tidelog::prelude::*;
/// # let manager = LogManager::new();
/// # let logger = manager.logger("app");
/// use tidelog::log;
/// log!(logger, Level::Info, "simple message");
/// log!(logger, Level::Error, "error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Info, $($arg)+)
    };
}

/// Log a warn-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Level, LogManager};
    use crate::targets::MemoryTarget;

    #[test]
    fn test_macros_format_and_route() {
        let memory = MemoryTarget::unbounded();
        let view = memory.handle();
        let manager = LogManager::builder().target(memory).build();
        let logger = manager.logger("app");

        info!(logger, "plain");
        warn!(logger, "retry {} of {}", 2, 5);
        log!(logger, Level::Error, "code {}", 500);
        manager.drain();

        let entries = view.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message(), "plain");
        assert_eq!(entries[1].message(), "retry 2 of 5");
        assert_eq!(entries[1].level, Level::Warn);
        assert_eq!(entries[2].message(), "code 500");
    }
}
