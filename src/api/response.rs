//! API response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded body plus the HTTP metadata commands care about
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub body: Value,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseMeta {
    pub status: u16,
    /// Request-status URL for asynchronous compute operations
    pub location: Option<String>,
    pub request_id: Option<String>,
}

/// IONOS error envelope
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub http_status: Option<u16>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
}

/// API message
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessage {
    pub error_code: Option<String>,
    pub message: String,
}

impl ApiErrorBody {
    /// Human-readable summary, or `None` if the body is not an error envelope
    pub fn summarize(text: &str) -> Option<String> {
        let body: ApiErrorBody = serde_json::from_str(text).ok()?;
        if body.messages.is_empty() {
            return None;
        }

        let parts: Vec<String> = body
            .messages
            .iter()
            .map(|m| match &m.error_code {
                Some(code) => format!("[{}] {}", code, m.message),
                None => m.message.clone(),
            })
            .collect();
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_error_envelope() {
        let text = r#"{"httpStatus":404,"messages":[{"errorCode":"309","message":"Resource does not exist"}]}"#;
        assert_eq!(
            ApiErrorBody::summarize(text).as_deref(),
            Some("[309] Resource does not exist")
        );
    }

    #[test]
    fn test_summarize_other_bodies() {
        assert_eq!(ApiErrorBody::summarize("gateway timeout"), None);
        assert_eq!(ApiErrorBody::summarize(r#"{"messages":[]}"#), None);
    }
}
