// SPDX-License-Identifier: MIT OR Apache-2.0
//! Request and response wire types.

use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result fields of a successful command
pub type Payload = Map<String, Value>;

/// One command invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Command name
    pub command: String,
    /// Parameters by name
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Request {
    /// Create a request
    pub fn new(command: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            command: command.into(),
            params,
        }
    }
}

/// Outcome of one command as sent back to the caller.
///
/// Success carries the result fields next to `"success": true`; failure
/// carries a single `"error"` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the command succeeded
    pub success: bool,
    /// Result or error fields
    #[serde(flatten)]
    pub payload: Payload,
}

impl Response {
    /// Wrap a command result
    pub fn from_result(result: Result<Payload, CommandError>) -> Self {
        match result {
            Ok(payload) => Self {
                success: true,
                payload,
            },
            Err(err) => Self::error(err.to_string()),
        }
    }

    /// Error response with a message
    pub fn error(message: impl Into<String>) -> Self {
        let mut payload = Payload::new();
        payload.insert("error".to_string(), Value::String(message.into()));
        Self {
            success: false,
            payload,
        }
    }

    /// Error message, if this is a failure
    pub fn error_message(&self) -> Option<&str> {
        if self.success {
            None
        } else {
            self.payload.get("error").and_then(Value::as_str)
        }
    }

    /// Field of the payload
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// JSON form
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("success".to_string(), Value::Bool(self.success));
        map.extend(self.payload.clone());
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_params_default_to_empty() {
        let request: Request = serde_json::from_str(r#"{"command":"find_nodes"}"#).unwrap();
        assert_eq!(request.command, "find_nodes");
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_success_response_flattens_payload() {
        let mut payload = Payload::new();
        payload.insert("removed_links".to_string(), json!(0));
        let response = Response::from_result(Ok(payload));
        assert_eq!(response.to_value(), json!({ "success": true, "removed_links": 0 }));
        assert_eq!(serde_json::to_value(&response).unwrap(), response.to_value());
    }

    #[test]
    fn test_error_response() {
        let response = Response::from_result(Err(CommandError::UnknownCommand("fly".to_string())));
        assert_eq!(response.to_value(), json!({ "success": false, "error": "Unknown command: fly" }));
        assert_eq!(response.error_message(), Some("Unknown command: fly"));
    }
}
