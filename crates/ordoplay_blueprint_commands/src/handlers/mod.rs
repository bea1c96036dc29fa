// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command handlers, grouped by concern.
//!
//! Every handler validates all of its parameters before it touches the
//! store, so a failed validation never leaves partial state behind.

pub(crate) mod chains;
pub(crate) mod delegates;
pub(crate) mod find;
pub(crate) mod links;
pub(crate) mod nodes;
pub(crate) mod variables;

use crate::error::CommandError;
use crate::response::Payload;
use ordoplay_blueprint_graph::{Graph, Node, NodeId};
use serde_json::Value;

/// Payload from a `json!` object literal
pub(crate) fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

/// Textual form of a node id
pub(crate) fn id_text(id: NodeId) -> Value {
    Value::String(id.to_string())
}

/// Node that must exist
pub(crate) fn require_node(graph: &Graph, id: NodeId) -> Result<&Node, CommandError> {
    graph
        .node(id)
        .ok_or_else(|| CommandError::not_found("Node", id.to_string()))
}
