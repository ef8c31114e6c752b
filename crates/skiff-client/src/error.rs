use thiserror::Error;

/// Service client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed
    #[error("request failed: {0}")]
    Network(String),

    /// The service answered outside the 2xx range
    #[error("service returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The reply body was not the expected JSON shape
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// HTTP 2xx, but the service's reply envelope reported an error
    #[error("service reported an error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
