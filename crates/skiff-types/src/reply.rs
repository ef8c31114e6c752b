use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reply status reported by a platform service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// Uniform reply envelope returned by the platform services
///
/// Every service answers with `{"result": "success" | "error"}` plus an
/// optional message and any endpoint-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceReply {
    pub result: ReplyStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Endpoint-specific fields
    #[serde(flatten)]
    pub data: HashMap<String, serde_json::Value>,
}

impl ServiceReply {
    pub fn is_success(&self) -> bool {
        self.result == ReplyStatus::Success
    }

    /// Service-supplied detail, or a placeholder when the reply carried none
    pub fn detail(&self) -> &str {
        self.message.as_deref().unwrap_or("no detail provided")
    }

    /// Endpoint-specific field by name
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_reply() {
        let reply: ServiceReply =
            serde_json::from_str(r#"{"result": "success", "message": "ok"}"#).unwrap();

        assert!(reply.is_success());
        assert_eq!(reply.detail(), "ok");
    }

    #[test]
    fn test_error_reply() {
        let reply: ServiceReply =
            serde_json::from_str(r#"{"result": "error", "message": "bad request"}"#).unwrap();

        assert!(!reply.is_success());
        assert_eq!(reply.detail(), "bad request");
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let reply: ServiceReply = serde_json::from_str(
            r#"{"result": "success", "encrypted": "abc123", "salt": "s1"}"#,
        )
        .unwrap();

        assert!(reply.is_success());
        assert_eq!(reply.field("encrypted").unwrap(), "abc123");
        assert_eq!(reply.field("salt").unwrap(), "s1");
        assert_eq!(reply.detail(), "no detail provided");
    }
}
