use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::builder::{EventBuilder, Overrides};
use crate::error::ValidationError;
use crate::event::SessionDefaults;
use crate::router::{DestinationRouter, Outcome};
use crate::transport::{HttpTransport, Transport};

/// Façade for sending structured log events to the logging service
///
/// Constructed once per service with fixed session defaults; each `log`
/// call merges per-call overrides on top, validates the result, and fans
/// it out. The client holds no mutable state, so one instance can be
/// shared freely across tasks.
pub struct LoggingClient {
    defaults: SessionDefaults,
    transport: Arc<dyn Transport>,
}

impl LoggingClient {
    pub fn new(defaults: SessionDefaults) -> Result<Self, ValidationError> {
        Self::with_transport(defaults, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(
        defaults: SessionDefaults,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ValidationError> {
        defaults.validate()?;
        Ok(Self {
            defaults,
            transport,
        })
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    /// Send one log event
    ///
    /// Fails fast on validation, before any request is made. Delivery
    /// failures are never an error here: they come back as `Failed`
    /// entries in the per-destination outcome map, leaving retry policy
    /// to the caller.
    pub async fn log(
        &self,
        message: impl Into<String>,
        overrides: Overrides,
    ) -> Result<HashMap<String, Outcome>, ValidationError> {
        let overrides = overrides.set("message", Value::String(message.into()));
        let event = EventBuilder::build(&self.defaults, &overrides)?;
        Ok(DestinationRouter::dispatch(&event, self.transport.as_ref()).await)
    }

    pub async fn info(
        &self,
        message: impl Into<String>,
    ) -> Result<HashMap<String, Outcome>, ValidationError> {
        self.log(message, Overrides::new().severity("info")).await
    }

    pub async fn warning(
        &self,
        message: impl Into<String>,
    ) -> Result<HashMap<String, Outcome>, ValidationError> {
        self.log(message, Overrides::new().severity("warning")).await
    }

    pub async fn error(
        &self,
        message: impl Into<String>,
    ) -> Result<HashMap<String, Outcome>, ValidationError> {
        self.log(message, Overrides::new().severity("error")).await
    }

    pub async fn critical(
        &self,
        message: impl Into<String>,
    ) -> Result<HashMap<String, Outcome>, ValidationError> {
        self.log(message, Overrides::new().severity("critical")).await
    }
}
