// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-level error taxonomy.

use crate::coerce::CoerceError;
use crate::resolve::ResolveError;
use ordoplay_blueprint_graph::ConnectionError;
use serde_json::{json, Value};

/// Error returned by a command. Every error is terminal for the command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A required parameter is absent
    #[error("Missing '{0}' parameter")]
    MissingParameter(&'static str),

    /// A parameter is present but has the wrong shape
    #[error("Invalid '{name}' parameter: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// A referenced graph, node, pin or member does not exist
    #[error("{what} not found: {name}")]
    NotFound {
        /// Kind of thing looked up
        what: &'static str,
        /// Offending name
        name: String,
    },

    /// Type resolution exhausted every fallback
    #[error(transparent)]
    ResolutionFailed(#[from] ResolveError),

    /// The graph rejected a link
    #[error("Failed to connect nodes: {0}")]
    ConnectionFailed(#[from] ConnectionError),

    /// Unrecognized type or node-type string
    #[error("Unsupported {what}: {name}")]
    UnsupportedType {
        /// Kind of type
        what: &'static str,
        /// Offending name
        name: String,
    },

    /// A value cannot be stored on a pin of this type
    #[error("Type mismatch on pin '{pin}': expected {expected}, got {found}")]
    TypeMismatch {
        /// Pin name
        pin: String,
        /// Expected value shape
        expected: String,
        /// JSON kind received
        found: &'static str,
    },

    /// No handler registered under this name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A uniquely named member already exists
    #[error("{what} already exists: {name}")]
    AlreadyExists {
        /// Kind of member
        what: &'static str,
        /// Offending name
        name: String,
    },
}

impl CommandError {
    /// Shorthand for [`CommandError::NotFound`]
    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }

    /// Taxonomy tag of the error
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "MissingParameter",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::NotFound { .. } => "NotFound",
            Self::ResolutionFailed(_) => "ResolutionFailed",
            Self::ConnectionFailed(_) => "ConnectionFailed",
            Self::UnsupportedType { .. } => "UnsupportedType",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::UnknownCommand(_) => "UnknownCommand",
            Self::AlreadyExists { .. } => "AlreadyExists",
        }
    }

    /// Wire form: `{ "error": "<message>" }`
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl From<CoerceError> for CommandError {
    fn from(err: CoerceError) -> Self {
        match err {
            CoerceError::TypeMismatch {
                pin,
                expected,
                found,
            } => Self::TypeMismatch {
                pin,
                expected,
                found,
            },
            CoerceError::Resolution(err) => Self::ResolutionFailed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_carries_message() {
        let err = CommandError::MissingParameter("graph_id");
        assert_eq!(err.to_payload(), json!({ "error": "Missing 'graph_id' parameter" }));
        assert_eq!(err.kind(), "MissingParameter");
    }

    #[test]
    fn test_coerce_errors_map_onto_taxonomy() {
        let err: CommandError = CoerceError::Resolution(ResolveError::Class("Nope".to_string())).into();
        assert_eq!(err.kind(), "ResolutionFailed");
        assert_eq!(err.to_string(), "Failed to resolve class: Nope");
    }
}
