use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::router::Destination;

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Parse free text, case-insensitive
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        match text.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            _ => Err(ValidationError::InvalidSeverity(text.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session defaults a `LoggingClient` is constructed with
///
/// Fixed for the lifetime of the client; every field except `logging_url`
/// can be overridden per call. `severity` stays free text here and is
/// checked against the recognized set when an event is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDefaults {
    /// Base endpoint for log delivery
    pub logging_url: String,

    /// Emitting service
    pub source: String,

    /// Destinations to fan out to; empty means no delivery
    pub destinations: Vec<String>,

    pub group: String,
    pub category: String,
    pub alert: String,
    pub severity: String,

    /// Only meaningful when "teams" is among the destinations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams_chat_id: Option<String>,
}

impl SessionDefaults {
    /// Check the fields that must hold before any event can be sent
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.logging_url.is_empty() {
            return Err(ValidationError::MissingLoggingUrl);
        }

        for name in &self.destinations {
            if Destination::parse(name).is_none() {
                return Err(ValidationError::UnknownDefaultDestination(name.clone()));
            }
        }

        Ok(())
    }
}

/// Fully resolved log event, ready for dispatch
///
/// Produced by `EventBuilder`; immutable once built. The timestamp is taken
/// from the system clock at build time and cannot be supplied by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub logging_url: String,
    pub source: String,
    pub destinations: Vec<String>,
    pub group: String,
    pub category: String,
    pub alert: String,
    pub severity: Severity,
    pub message: String,

    /// Teams-specific message, used instead of `message` for that payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams_msg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams_chat_id: Option<String>,

    pub timestamp: DateTime<Utc>,
}
