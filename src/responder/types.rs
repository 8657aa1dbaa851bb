//! Wire types for the chat endpoint

use serde::{Deserialize, Serialize};

/// Outbound request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Body of a failed response; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatErrorBody {
    /// Extract the server message from an arbitrary JSON error body.
    ///
    /// Only a non-empty string counts as a message; anything else falls
    /// back to the generic text.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let error = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { error }
    }
}
