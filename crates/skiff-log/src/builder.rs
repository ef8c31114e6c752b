use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::event::{Event, SessionDefaults, Severity};

/// Fields a caller may set on a single event
///
/// `logging_url` and `timestamp` are deliberately absent: the endpoint is
/// fixed per session and the timestamp is stamped at build time.
const SETTABLE_FIELDS: [&str; 9] = [
    "message",
    "source",
    "destinations",
    "group",
    "category",
    "alert",
    "severity",
    "teams_msg",
    "teams_chat_id",
];

/// Call-time overrides for one log event
///
/// An open field→value mapping with typed setters for the known fields. A
/// field that is set always wins over the session default, even when set to
/// an empty string. Keys outside the event schema are rejected at build
/// time rather than silently dropped.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    fields: BTreeMap<String, Value>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(self, source: impl Into<String>) -> Self {
        self.set("source", Value::String(source.into()))
    }

    pub fn destinations<I, S>(self, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = destinations
            .into_iter()
            .map(|d| Value::String(d.into()))
            .collect();
        self.set("destinations", Value::Array(list))
    }

    pub fn group(self, group: impl Into<String>) -> Self {
        self.set("group", Value::String(group.into()))
    }

    pub fn category(self, category: impl Into<String>) -> Self {
        self.set("category", Value::String(category.into()))
    }

    pub fn alert(self, alert: impl Into<String>) -> Self {
        self.set("alert", Value::String(alert.into()))
    }

    pub fn severity(self, severity: impl Into<String>) -> Self {
        self.set("severity", Value::String(severity.into()))
    }

    pub fn teams_msg(self, teams_msg: impl Into<String>) -> Self {
        self.set("teams_msg", Value::String(teams_msg.into()))
    }

    pub fn teams_chat_id(self, teams_chat_id: impl Into<String>) -> Self {
        self.set("teams_chat_id", Value::String(teams_chat_id.into()))
    }

    /// Set a field by name; names outside the event schema fail the build
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Merges session defaults with call-time overrides into a validated event
///
/// Pure apart from the clock: no I/O, no state.
pub struct EventBuilder;

impl EventBuilder {
    pub fn build(
        defaults: &SessionDefaults,
        overrides: &Overrides,
    ) -> Result<Event, ValidationError> {
        // Closed schema: a typo must surface, not silently fall back
        for key in overrides.keys() {
            if !SETTABLE_FIELDS.contains(&key) {
                return Err(ValidationError::UnknownField(key.to_string()));
            }
        }

        let message = match overrides.get("message") {
            Some(value) => string_field("message", value)?,
            None => return Err(ValidationError::MissingMessage),
        };
        if message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }

        let severity_text = match overrides.get("severity") {
            Some(value) => string_field("severity", value)?,
            None => defaults.severity.clone(),
        };
        let severity = Severity::parse(&severity_text)?;

        let destinations = match overrides.get("destinations") {
            Some(value) => string_list_field("destinations", value)?,
            None => defaults.destinations.clone(),
        };

        let teams_msg = match overrides.get("teams_msg") {
            Some(value) => Some(string_field("teams_msg", value)?),
            None => None,
        };

        let teams_chat_id = match overrides.get("teams_chat_id") {
            Some(value) => Some(string_field("teams_chat_id", value)?),
            None => defaults.teams_chat_id.clone(),
        };

        Ok(Event {
            logging_url: defaults.logging_url.clone(),
            source: resolve("source", overrides, &defaults.source)?,
            destinations,
            group: resolve("group", overrides, &defaults.group)?,
            category: resolve("category", overrides, &defaults.category)?,
            alert: resolve("alert", overrides, &defaults.alert)?,
            severity,
            message,
            teams_msg,
            teams_chat_id,
            timestamp: Utc::now(),
        })
    }
}

/// Override if present, session default otherwise
fn resolve(
    field: &str,
    overrides: &Overrides,
    default: &str,
) -> Result<String, ValidationError> {
    match overrides.get(field) {
        Some(value) => string_field(field, value),
        None => Ok(default.to_string()),
    }
}

fn string_field(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected a string, got {}", json_type(other)),
        }),
    }
}

fn string_list_field(field: &str, value: &Value) -> Result<Vec<String>, ValidationError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: format!("expected a list of strings, got {}", json_type(other)),
            })
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: format!("expected a list of strings, found {}", json_type(other)),
            }),
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
