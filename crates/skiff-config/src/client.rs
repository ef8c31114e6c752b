use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{ConfigError, Result};

/// Request timeout used by all platform services
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Reply envelope the config endpoint answers GET with
#[derive(Debug, Deserialize)]
struct ConfigEnvelope {
    config: HashMap<String, Value>,
}

/// Client for the central configuration service
///
/// The flat key→value mapping is fetched once at `load` time; lookups are
/// local from then on. Updates go back to the same endpoint as a PATCH.
#[derive(Debug)]
pub struct ConfigClient {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
    reload_marker: Option<PathBuf>,
    settings: HashMap<String, Value>,
}

impl ConfigClient {
    /// Fetch the current configuration and cache it
    pub async fn load(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let client = reqwest::Client::new();

        let response = client
            .get(&url)
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch configuration from {}: {}", url, e);
                ConfigError::Fetch(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Config service returned {} for {}", status, url);
            return Err(ConfigError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let envelope: ConfigEnvelope = response
            .json()
            .await
            .map_err(|e| ConfigError::MalformedReply(e.to_string()))?;

        info!(
            url = %url,
            settings = envelope.config.len(),
            "Configuration loaded"
        );

        Ok(Self {
            url,
            client,
            timeout: DEFAULT_TIMEOUT,
            reload_marker: None,
            settings: envelope.config,
        })
    }

    /// File touched after a successful update, signalling the host service
    /// workers to recycle
    pub fn with_reload_marker(mut self, path: impl AsRef<Path>) -> Self {
        self.reload_marker = Some(path.as_ref().to_path_buf());
        self
    }

    /// Look up a cached setting
    pub fn get_setting(&self, key: &str) -> Result<&Value> {
        self.settings
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Look up a cached setting that must be a string
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get_setting(key)?
            .as_str()
            .ok_or_else(|| ConfigError::NotAString(key.to_string()))
    }

    /// The full cached mapping
    pub fn settings(&self) -> &HashMap<String, Value> {
        &self.settings
    }

    /// Send a configuration patch back to the service
    ///
    /// On success the reload marker (if configured) is touched; a marker
    /// failure is logged and does not fail the update.
    pub async fn update(&self, patch: &Value) -> Result<()> {
        let response = self
            .client
            .patch(&self.url)
            .timeout(self.timeout)
            .json(patch)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to patch config service: {}", e);
                ConfigError::Fetch(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ConfigError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        info!(url = %self.url, "Configuration updated");

        if let Some(marker) = &self.reload_marker {
            match std::fs::write(marker, b"") {
                Ok(()) => debug!(marker = %marker.display(), "Reload marker touched"),
                Err(e) => error!(
                    marker = %marker.display(),
                    "Failed to touch reload marker: {}", e
                ),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONFIG_BODY: &str = r#"
    {
        "config": {
            "web_port": 5000,
            "log_level": "info",
            "sql_server": "db.internal"
        }
    }"#;

    #[tokio::test]
    async fn test_load_caches_settings() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_body(CONFIG_BODY)
            .expect(1)
            .create_async()
            .await;

        let config = ConfigClient::load(format!("{}/api/config", server.url()))
            .await
            .unwrap();

        assert_eq!(config.settings().len(), 3);
        assert_eq!(config.get_setting("web_port").unwrap(), &json!(5000));
        assert_eq!(config.get_str("log_level").unwrap(), "info");
        // lookups are local, the endpoint was hit exactly once
        config.get_setting("sql_server").unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_key_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_body(CONFIG_BODY)
            .create_async()
            .await;

        let config = ConfigClient::load(format!("{}/api/config", server.url()))
            .await
            .unwrap();

        assert!(matches!(
            config.get_setting("smtp_host").unwrap_err(),
            ConfigError::KeyNotFound(ref key) if key == "smtp_host"
        ));
        assert!(matches!(
            config.get_str("web_port").unwrap_err(),
            ConfigError::NotAString(_)
        ));
    }

    #[tokio::test]
    async fn test_load_surfaces_http_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/config")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = ConfigClient::load(format!("{}/api/config", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_body(r#"{"settings": {}}"#)
            .create_async()
            .await;

        let err = ConfigClient::load(format!("{}/api/config", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn test_update_touches_reload_marker() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_body(CONFIG_BODY)
            .create_async()
            .await;
        let patch_mock = server
            .mock("PATCH", "/api/config")
            .with_status(200)
            .with_body(r#"{"result": "success"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("reload.txt");

        let config = ConfigClient::load(format!("{}/api/config", server.url()))
            .await
            .unwrap()
            .with_reload_marker(&marker);

        config.update(&json!({"log_level": "debug"})).await.unwrap();

        assert!(marker.exists());
        patch_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_marker_untouched() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_body(CONFIG_BODY)
            .create_async()
            .await;
        let _mock = server
            .mock("PATCH", "/api/config")
            .with_status(422)
            .with_body("invalid key")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("reload.txt");

        let config = ConfigClient::load(format!("{}/api/config", server.url()))
            .await
            .unwrap()
            .with_reload_marker(&marker);

        let err = config.update(&json!({"bogus": true})).await.unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Rejected { status: 422, ref detail } if detail == "invalid key"
        ));
        assert!(!marker.exists());
    }
}
