use thiserror::Error;

/// Configuration client error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The fetch request never completed
    #[error("failed to fetch configuration: {0}")]
    Fetch(String),

    /// The config service answered outside the 2xx range
    #[error("config service returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The reply was not the expected `{"config": {...}}` envelope
    #[error("malformed config reply: {0}")]
    MalformedReply(String),

    /// Lookup for a key the cached mapping does not contain
    #[error("setting not found: {0}")]
    KeyNotFound(String),

    /// A setting exists but is not the requested type
    #[error("setting {0} is not a string")]
    NotAString(String),

    /// The service refused a configuration update
    #[error("config update rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
