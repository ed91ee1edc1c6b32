//! Error types for the logging core

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// No converter registered for the requested output type.
    ///
    /// This is a misconfiguration and is the one error that propagates to the
    /// caller asking for the formatter.
    #[error("no formatter registered for output type '{type_name}'")]
    FormatterNotFound { type_name: &'static str },

    /// A target's write failed. Captured by the consumer loop and routed to
    /// the fault sink; dispatch continues with the next target.
    #[error("target '{target}' failed to write entry: {message}")]
    TargetWrite { target: String, message: String },

    /// A target panicked during write or flush.
    #[error("target '{target}' panicked: {message}")]
    TargetPanic { target: String, message: String },

    /// Entry could not be enqueued because the queue was already closed.
    #[error("log queue is closed; entry dropped")]
    QueueClosed,

    /// Malformed target or interval settings.
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unparseable interval string such as "3 day"
    #[error("could not parse interval '{0}'; valid example: \"3 day\"")]
    IntervalParse(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn formatter_not_found(type_name: &'static str) -> Self {
        LoggerError::FormatterNotFound { type_name }
    }

    pub fn target_write(target: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::TargetWrite {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn target_panic(target: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::TargetPanic {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
