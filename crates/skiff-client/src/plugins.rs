use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::error::{ClientError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Reply envelope the plugin endpoint answers with
#[derive(Debug, Deserialize)]
struct PluginEnvelope {
    plugins: Vec<Value>,
}

/// Client for the core service's plugin registry
pub struct PluginClient {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl PluginClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Fetch the configuration of every registered plugin
    pub async fn list(&self) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(&self.url)
            .header("X-Plugin-Name", "all")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch plugin config: {}", e);
                ClientError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let envelope: PluginEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedReply(e.to_string()))?;

        info!(count = envelope.plugins.len(), "Plugin config loaded");
        Ok(envelope.plugins)
    }
}
