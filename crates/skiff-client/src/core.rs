use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Request timeout used by all platform services
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Passthrough client for the core service's data endpoints
///
/// Payloads are opaque to this client: requests and replies are arbitrary
/// JSON, interpretation is left to the caller.
pub struct CoreClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl CoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// GET an endpoint, returning the reply body as JSON
    pub async fn fetch_data(&self, endpoint: &str) -> Result<Value> {
        let url = self.url(endpoint);
        debug!(url = %url, "Fetching data");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        read_json(response).await
    }

    /// POST a JSON body to an endpoint, returning the reply body as JSON
    pub async fn send_data(&self, endpoint: &str, data: &Value) -> Result<Value> {
        let url = self.url(endpoint);
        debug!(url = %url, "Sending data");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(data)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        read_json(response).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

/// Check the status and parse the body, shared by every client here
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::MalformedReply(e.to_string()))
}
