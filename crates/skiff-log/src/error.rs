use thiserror::Error;

/// Validation failures, raised before any network I/O
///
/// A validation error is always fatal to the call that produced it; a
/// partially built event never reaches the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `message` missing from the call or empty
    #[error("message is required and cannot be empty")]
    MissingMessage,

    /// Override key outside the event schema
    #[error("unknown override field: {0}")]
    UnknownField(String),

    /// Known override key with a value of the wrong shape
    #[error("invalid value for {field}: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Severity outside {info, warning, error, critical}
    #[error("unrecognized severity: {0}")]
    InvalidSeverity(String),

    /// Session defaults constructed without a logging endpoint
    #[error("logging_url is required and cannot be empty")]
    MissingLoggingUrl,

    /// Session defaults name a destination that does not exist
    #[error("unknown destination in session defaults: {0}")]
    UnknownDefaultDestination(String),
}
