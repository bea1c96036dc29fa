// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed access to a request's parameter map.

use crate::error::CommandError;
use ordoplay_blueprint_graph::NodeId;
use serde_json::{Map, Value};

/// Parameter names accepted for the target graph
pub const GRAPH_ID_KEYS: &[&str] = &["graph_id", "blueprint_name"];

/// Parameter names accepted for a node position
pub const POSITION_KEYS: &[&str] = &["position", "node_position"];

/// Borrowed view over a request's parameters
#[derive(Debug, Clone, Copy)]
pub struct Params<'p> {
    map: &'p Map<String, Value>,
}

impl<'p> Params<'p> {
    /// Wrap a parameter map
    pub fn new(map: &'p Map<String, Value>) -> Self {
        Self { map }
    }

    /// First present, non-null value among `keys`
    pub fn get_any(&self, keys: &[&str]) -> Option<&'p Value> {
        keys.iter()
            .filter_map(|key| self.map.get(*key))
            .find(|value| !value.is_null())
    }

    fn str_any(&self, keys: &[&'static str]) -> Result<Option<&'p str>, CommandError> {
        match self.get_any(keys) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(CommandError::InvalidParameter {
                name: keys[0],
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    /// Required string
    pub fn required_str(&self, key: &'static str) -> Result<&'p str, CommandError> {
        self.str_any(&[key])?
            .ok_or(CommandError::MissingParameter(key))
    }

    /// Required string under the first present of several spellings
    pub fn required_str_any(&self, keys: &[&'static str]) -> Result<&'p str, CommandError> {
        self.str_any(keys)?
            .ok_or(CommandError::MissingParameter(keys[0]))
    }

    /// Optional string
    pub fn optional_str(&self, key: &'static str) -> Result<Option<&'p str>, CommandError> {
        self.str_any(&[key])
    }

    /// Optional string with a default
    pub fn str_or(&self, key: &'static str, default: &'p str) -> Result<&'p str, CommandError> {
        Ok(self.optional_str(key)?.unwrap_or(default))
    }

    /// Optional boolean
    pub fn optional_bool(&self, key: &'static str) -> Result<Option<bool>, CommandError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(CommandError::InvalidParameter {
                name: key,
                reason: format!("expected a boolean, got {other}"),
            }),
        }
    }

    /// Target graph, accepting the legacy `blueprint_name` spelling
    pub fn graph_id(&self) -> Result<&'p str, CommandError> {
        self.str_any(GRAPH_ID_KEYS)?
            .ok_or(CommandError::MissingParameter(GRAPH_ID_KEYS[0]))
    }

    /// Required node identifier. Text that is not an identifier cannot
    /// name any node, so it reports as not found.
    pub fn node_id(&self, key: &'static str) -> Result<NodeId, CommandError> {
        let text = self.required_str(key)?;
        NodeId::parse(text).ok_or_else(|| CommandError::not_found("Node", text))
    }

    /// Optional node identifier
    pub fn optional_node_id(&self, key: &'static str) -> Result<Option<NodeId>, CommandError> {
        match self.optional_str(key)? {
            None => Ok(None),
            Some(text) => NodeId::parse(text)
                .map(Some)
                .ok_or_else(|| CommandError::not_found("Node", text)),
        }
    }

    /// Node position as `[x, y]`, defaulting to the origin
    pub fn position(&self) -> Result<[f32; 2], CommandError> {
        self.position_any(POSITION_KEYS)
            .map(|p| p.unwrap_or([0.0, 0.0]))
    }

    /// Optional position under one key
    pub fn optional_position(&self, key: &'static str) -> Result<Option<[f32; 2]>, CommandError> {
        self.position_any(&[key])
    }

    fn position_any(&self, keys: &[&'static str]) -> Result<Option<[f32; 2]>, CommandError> {
        let Some(value) = self.get_any(keys) else {
            return Ok(None);
        };
        let invalid = || CommandError::InvalidParameter {
            name: keys[0],
            reason: "expected an array of two numbers".to_string(),
        };
        let items = value.as_array().ok_or_else(invalid)?;
        match items.as_slice() {
            [x, y] => {
                let x = x.as_f64().ok_or_else(invalid)?;
                let y = y.as_f64().ok_or_else(invalid)?;
                Ok(Some([x as f32, y as f32]))
            }
            _ => Err(invalid()),
        }
    }

    /// Optional object
    pub fn object(&self, key: &'static str) -> Result<Option<&'p Map<String, Value>>, CommandError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(CommandError::InvalidParameter {
                name: key,
                reason: format!("expected an object, got {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_required_and_missing() {
        let raw = map(json!({ "event_name": "ReceiveBeginPlay" }));
        let params = Params::new(&raw);
        assert_eq!(params.required_str("event_name").unwrap(), "ReceiveBeginPlay");
        assert!(matches!(
            params.required_str("function_name"),
            Err(CommandError::MissingParameter("function_name"))
        ));
    }

    #[test]
    fn test_wrong_shape_is_invalid() {
        let raw = map(json!({ "event_name": 3, "is_exposed": "yes" }));
        let params = Params::new(&raw);
        assert!(matches!(params.required_str("event_name"), Err(CommandError::InvalidParameter { .. })));
        assert!(matches!(params.optional_bool("is_exposed"), Err(CommandError::InvalidParameter { .. })));
    }

    #[test]
    fn test_graph_id_alias() {
        let raw = map(json!({ "blueprint_name": "BP_Test" }));
        assert_eq!(Params::new(&raw).graph_id().unwrap(), "BP_Test");

        let raw = map(json!({}));
        assert!(matches!(
            Params::new(&raw).graph_id(),
            Err(CommandError::MissingParameter("graph_id"))
        ));
    }

    #[test]
    fn test_position() {
        let raw = map(json!({ "node_position": [100, -50.5] }));
        assert_eq!(Params::new(&raw).position().unwrap(), [100.0, -50.5]);

        let raw = map(json!({}));
        assert_eq!(Params::new(&raw).position().unwrap(), [0.0, 0.0]);

        let raw = map(json!({ "position": [1, 2, 3] }));
        assert!(Params::new(&raw).position().is_err());
    }

    #[test]
    fn test_node_id_not_parsable_is_not_found() {
        let raw = map(json!({ "node_id": "not-a-guid" }));
        assert!(matches!(
            Params::new(&raw).node_id("node_id"),
            Err(CommandError::NotFound { what: "Node", .. })
        ));
    }
}
