use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use skiff_types::ServiceReply;

/// Request timeout used by all platform services
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Delivery failure detail, carried per destination
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never completed (DNS, connect, timeout, ...)
    #[error("request failed: {0}")]
    Network(String),

    /// The logging service answered outside the 2xx range
    #[error("logging service returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// HTTP 2xx, but the service's reply envelope reported an error
    #[error("logging service rejected the event: {0}")]
    Rejected(String),
}

/// One HTTP POST of a JSON body to a URL
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, url: &str, payload: &Value) -> Result<(), TransportError>;
}

/// Transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &str, payload: &Value) -> Result<(), TransportError> {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        // 2xx alone is not enough: the service wraps its verdict in the
        // reply envelope
        let reply: ServiceReply = response
            .json()
            .await
            .map_err(|e| TransportError::Network(format!("malformed reply: {}", e)))?;

        if !reply.is_success() {
            return Err(TransportError::Rejected(reply.detail().to_string()));
        }

        debug!(url = %url, "Log event accepted");
        Ok(())
    }
}

/// In-memory transport for tests: records payloads, fails on demand
#[cfg(test)]
pub struct MockTransport {
    sent: std::sync::Mutex<Vec<(String, Value)>>,
    fail_if: Option<fn(&Value) -> bool>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail_if: None,
        }
    }

    /// Fail any send whose payload matches the predicate
    pub fn failing_if(predicate: fn(&Value) -> bool) -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail_if: Some(predicate),
        }
    }

    /// Payloads delivered so far, with their target URLs
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, url: &str, payload: &Value) -> Result<(), TransportError> {
        if let Some(fail_if) = self.fail_if {
            if fail_if(payload) {
                return Err(TransportError::Network("connection refused".to_string()));
            }
        }

        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_accepts_success_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/log")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"result": "success"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let url = format!("{}/api/log", server.url());
        transport.send(&url, &json!({"message": "ok"})).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_surfaces_http_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/log")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let url = format!("{}/api/log", server.url());
        let err = transport.send(&url, &json!({})).await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::Status { status: 503, ref detail } if detail == "overloaded"
        ));
    }

    #[tokio::test]
    async fn test_send_surfaces_envelope_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/log")
            .with_status(200)
            .with_body(r#"{"result": "error", "message": "unknown group"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let url = format!("{}/api/log", server.url());
        let err = transport.send(&url, &json!({})).await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::Rejected(ref detail) if detail == "unknown group"
        ));
    }

    #[tokio::test]
    async fn test_send_surfaces_network_failure() {
        // nothing listens on port 1
        let transport = HttpTransport::with_timeout(Duration::from_millis(500));
        let err = transport
            .send("http://127.0.0.1:1/api/log", &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Network(_)));
    }
}
