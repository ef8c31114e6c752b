use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info};

use crate::event::Event;
use crate::transport::{Transport, TransportError};

/// Named downstream sink with its own payload shape
///
/// Adding a destination means adding a variant and its payload arm; there
/// is no open-ended string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Web,
    Teams,
}

impl Destination {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "web" => Some(Destination::Web),
            "teams" => Some(Destination::Teams),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Destination::Web => "web",
            Destination::Teams => "teams",
        }
    }

    /// Wire payload for this destination
    ///
    /// Field names are fixed by the receiving log service's alert display.
    fn payload(&self, event: &Event) -> Value {
        match self {
            Destination::Web => json!({
                "logging_url": event.logging_url,
                "source": event.source,
                "destinations": event.destinations,
                "group": event.group,
                "category": event.category,
                "alert": event.alert,
                "severity": event.severity.as_str(),
                "timestamp": event.timestamp.to_rfc3339(),
                "message": event.message,
            }),
            Destination::Teams => {
                let mut payload = json!({
                    "message": event.teams_msg.as_deref().unwrap_or(&event.message),
                    "severity": event.severity.as_str(),
                    "group": event.group,
                    "category": event.category,
                    "alert": event.alert,
                });
                // a missing chat id is not fatal, the field is just left out
                if let Some(chat_id) = &event.teams_chat_id {
                    payload["teams_chat_id"] = json!(chat_id);
                }
                payload
            }
        }
    }
}

/// Why a single destination's delivery failed
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Per-destination delivery result
#[derive(Debug)]
pub enum Outcome {
    Delivered,
    Failed(DispatchError),
}

impl Outcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered)
    }
}

/// Fans one event out to each of its named destinations
pub struct DestinationRouter;

impl DestinationRouter {
    /// Dispatch to each unique destination in first-occurrence order
    ///
    /// Destinations are independent: one failure neither blocks nor rolls
    /// back another. Failures come back as `Failed` entries in the outcome
    /// map, never as an error. An empty destination list is a no-op.
    pub async fn dispatch(event: &Event, transport: &dyn Transport) -> HashMap<String, Outcome> {
        let mut outcomes: HashMap<String, Outcome> = HashMap::new();

        for name in &event.destinations {
            if outcomes.contains_key(name.as_str()) {
                continue;
            }

            let outcome = match Destination::parse(name) {
                Some(destination) => {
                    match transport
                        .send(&event.logging_url, &destination.payload(event))
                        .await
                    {
                        Ok(()) => {
                            info!(destination = %name, source = %event.source, "Log event delivered");
                            Outcome::Delivered
                        }
                        Err(e) => {
                            error!(destination = %name, "Log delivery failed: {}", e);
                            Outcome::Failed(DispatchError::Transport(e))
                        }
                    }
                }
                None => {
                    error!(destination = %name, "Unknown log destination");
                    Outcome::Failed(DispatchError::UnknownDestination(name.clone()))
                }
            };

            outcomes.insert(name.clone(), outcome);
        }

        outcomes
    }
}
