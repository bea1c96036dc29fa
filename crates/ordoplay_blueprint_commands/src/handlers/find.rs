// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node search.

use super::{id_text, payload};
use crate::error::CommandError;
use crate::params::Params;
use crate::resolve::TypeResolver;
use crate::response::Payload;
use crate::store::BlueprintStore;
use ordoplay_blueprint_graph::NodeKind;
use serde_json::{json, Value};

/// What a search matches. `None` fields match anything.
#[derive(Debug, Clone, Copy)]
enum NodeFilter<'p> {
    Event { event_name: &'p str },
    CustomEvent { event_name: Option<&'p str> },
    ComponentBoundEvent { property_name: Option<&'p str>, event_name: Option<&'p str> },
    FunctionCall { function_name: Option<&'p str> },
    VariableGet { variable_name: Option<&'p str> },
    InputAction { action_name: Option<&'p str> },
}

fn matches_opt(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |w| w == actual)
}

impl<'p> NodeFilter<'p> {
    fn from_params(params: &Params<'p>) -> Result<Self, CommandError> {
        let node_type = params.required_str("node_type")?;
        let filter = match node_type {
            "Event" => Self::Event {
                event_name: params.required_str("event_name")?,
            },
            "CustomEvent" => Self::CustomEvent {
                event_name: params.optional_str("event_name")?,
            },
            "ComponentBoundEvent" => Self::ComponentBoundEvent {
                property_name: params.optional_str("property_name")?,
                event_name: params.optional_str("event_name")?,
            },
            "FunctionCall" => Self::FunctionCall {
                function_name: params.optional_str("function_name")?,
            },
            "VariableGet" => Self::VariableGet {
                variable_name: params.optional_str("variable_name")?,
            },
            "InputAction" => Self::InputAction {
                action_name: params.optional_str("action_name")?,
            },
            other => {
                return Err(CommandError::UnsupportedType {
                    what: "node type",
                    name: other.to_string(),
                })
            }
        };
        Ok(filter)
    }

    fn matches(&self, kind: &NodeKind) -> bool {
        match (self, kind) {
            (Self::Event { event_name }, NodeKind::Event { event_name: actual, .. }) => actual.as_str() == *event_name,
            (Self::CustomEvent { event_name }, NodeKind::CustomEvent { function_name }) => {
                matches_opt(*event_name, function_name)
            }
            (Self::ComponentBoundEvent { property_name, event_name }, NodeKind::ComponentBoundEvent { key }) => {
                matches_opt(*property_name, &key.property_name) && matches_opt(*event_name, &key.delegate_name)
            }
            (Self::FunctionCall { function_name }, NodeKind::FunctionCall { function }) => {
                matches_opt(*function_name, &function.name)
            }
            (Self::VariableGet { variable_name }, NodeKind::VariableGet { variable }) => {
                matches_opt(*variable_name, variable)
            }
            (Self::InputAction { action_name }, NodeKind::InputAction { action_name: actual }) => {
                matches_opt(*action_name, actual)
            }
            _ => false,
        }
    }
}

/// `find_nodes`: ids of the nodes of one kind, in graph order
pub(crate) fn find_nodes(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let filter = NodeFilter::from_params(params)?;

    let blueprint = store
        .blueprint(graph_id)
        .ok_or_else(|| CommandError::not_found("Blueprint", graph_id))?;
    let found: Vec<Value> = blueprint
        .event_graph
        .nodes()
        .filter(|n| filter.matches(&n.kind))
        .map(|n| id_text(n.id))
        .collect();

    tracing::debug!(blueprint = %blueprint.name, ?filter, found = found.len(), "node search");
    Ok(payload(json!({ "node_guids": found })))
}

#[cfg(test)]
mod tests {
    use crate::error::CommandError;
    use crate::test_support::Harness;
    use serde_json::json;

    #[test]
    fn test_find_events_by_name() {
        let mut harness = Harness::new();
        let begin = harness.ok("add_event_node", json!({ "graph_id": "BP_Test", "event_name": "ReceiveBeginPlay" }));
        harness.ok("add_event_node", json!({ "graph_id": "BP_Test", "event_name": "ReceiveTick" }));

        let result = harness.ok(
            "find_nodes",
            json!({ "graph_id": "BP_Test", "node_type": "Event", "event_name": "ReceiveBeginPlay" }),
        );
        assert_eq!(result["node_guids"], json!([begin["node_id"]]));

        let err = harness
            .run("find_nodes", json!({ "graph_id": "BP_Test", "node_type": "Event" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingParameter("event_name")));
    }

    #[test]
    fn test_find_other_kinds() {
        let mut harness = Harness::new();
        harness.ok("bind_widget_event", json!({ "graph_id": "BP_Test", "widget_name": "Button1", "event_name": "OnClicked" }));
        harness.ok("add_input_action_node", json!({ "graph_id": "BP_Test", "action_name": "Jump" }));
        harness.ok("add_component_reference", json!({ "graph_id": "BP_Test", "component_name": "Mesh" }));

        let count = |harness: &mut Harness, params: serde_json::Value| {
            harness.ok("find_nodes", params)["node_guids"].as_array().map_or(0, Vec::len)
        };
        assert_eq!(count(&mut harness, json!({ "graph_id": "BP_Test", "node_type": "ComponentBoundEvent" })), 1);
        assert_eq!(
            count(&mut harness, json!({ "graph_id": "BP_Test", "node_type": "ComponentBoundEvent", "property_name": "Mesh" })),
            0
        );
        assert_eq!(count(&mut harness, json!({ "graph_id": "BP_Test", "node_type": "InputAction", "action_name": "Jump" })), 1);
        assert_eq!(count(&mut harness, json!({ "graph_id": "BP_Test", "node_type": "VariableGet" })), 1);
        assert_eq!(count(&mut harness, json!({ "graph_id": "BP_Test", "node_type": "FunctionCall" })), 0);
    }

    #[test]
    fn test_find_unsupported_type() {
        let mut harness = Harness::new();
        let err = harness
            .run("find_nodes", json!({ "graph_id": "BP_Test", "node_type": "Comment" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedType { .. }));
    }
}
