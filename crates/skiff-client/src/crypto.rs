use serde_json::json;
use std::time::Duration;
use tracing::error;

use skiff_types::ServiceReply;

use crate::core::read_json;
use crate::error::{ClientError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// An encrypted value together with the salt needed to decrypt it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub encrypted: String,
    pub salt: String,
}

/// Client for the security service's encryption endpoints
pub struct CryptoClient {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl CryptoClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Have the security service encrypt a value
    pub async fn encrypt(&self, plain_text: &str) -> Result<Sealed> {
        let body = json!({
            "type": "encrypt",
            "plain-text": plain_text,
        });

        let reply = self.call(&body).await?;

        Ok(Sealed {
            encrypted: reply_field(&reply, "encrypted")?,
            salt: reply_field(&reply, "salt")?,
        })
    }

    /// Have the security service decrypt a value
    pub async fn decrypt(&self, encrypted: &str, salt: &str) -> Result<String> {
        let body = json!({
            "type": "decrypt",
            "encrypted": encrypted,
            "salt": salt,
        });

        let reply = self.call(&body).await?;
        reply_field(&reply, "decrypted")
    }

    async fn call(&self, body: &serde_json::Value) -> Result<ServiceReply> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Crypto service request failed: {}", e);
                ClientError::Network(e.to_string())
            })?;

        let value = read_json(response).await?;
        let reply: ServiceReply = serde_json::from_value(value)
            .map_err(|e| ClientError::MalformedReply(e.to_string()))?;

        if !reply.is_success() {
            // the security service reports its reason under "error"
            let detail = reply
                .field("error")
                .and_then(|v| v.as_str())
                .unwrap_or_else(|| reply.detail())
                .to_string();
            error!("Crypto service returned an error: {}", detail);
            return Err(ClientError::Service(detail));
        }

        Ok(reply)
    }
}

fn reply_field(reply: &ServiceReply, key: &str) -> Result<String> {
    reply
        .field(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ClientError::MalformedReply(format!("reply is missing {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_encrypt_returns_value_and_salt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/crypto")
            .match_body(mockito::Matcher::Json(json!({
                "type": "encrypt",
                "plain-text": "hunter2",
            })))
            .with_status(200)
            .with_body(r#"{"result": "success", "encrypted": "xxyyzz", "salt": "s1"}"#)
            .create_async()
            .await;

        let crypto = CryptoClient::new(format!("{}/api/crypto", server.url()));
        let sealed = crypto.encrypt("hunter2").await.unwrap();

        assert_eq!(
            sealed,
            Sealed {
                encrypted: "xxyyzz".to_string(),
                salt: "s1".to_string(),
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_decrypt_round() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/crypto")
            .match_body(mockito::Matcher::Json(json!({
                "type": "decrypt",
                "encrypted": "xxyyzz",
                "salt": "s1",
            })))
            .with_status(200)
            .with_body(r#"{"result": "success", "decrypted": "hunter2"}"#)
            .create_async()
            .await;

        let crypto = CryptoClient::new(format!("{}/api/crypto", server.url()));
        let plain = crypto.decrypt("xxyyzz", "s1").await.unwrap();

        assert_eq!(plain, "hunter2");
    }

    #[tokio::test]
    async fn test_service_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/crypto")
            .with_status(200)
            .with_body(r#"{"result": "error", "error": "key store unavailable"}"#)
            .create_async()
            .await;

        let crypto = CryptoClient::new(format!("{}/api/crypto", server.url()));
        let err = crypto.encrypt("hunter2").await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Service(ref detail) if detail == "key store unavailable"
        ));
    }
}
