// SPDX-License-Identifier: MIT OR Apache-2.0
//! Delegate binding commands.

use super::{id_text, payload, require_node};
use crate::error::CommandError;
use crate::params::{Params, GRAPH_ID_KEYS};
use crate::resolve::TypeResolver;
use crate::response::Payload;
use crate::schema::{self, DELEGATE_INPUT, DELEGATE_OUTPUT, EXEC_INPUT, EXEC_OUTPUT, RETURN_VALUE, SELF_PIN};
use crate::store::BlueprintStore;
use ordoplay_blueprint_graph::{BoundEventKey, Node, NodeKind};
use serde_json::json;

/// Alternative name of the assign node's object input
const ASSIGN_TARGET_FALLBACK: &str = "Target";

/// Bound events are stacked in this column, one row below the lowest node
const BOUND_EVENT_X: f32 = 200.0;
const BOUND_EVENT_ROW_GAP: f32 = 200.0;

/// Offset of the generated custom event from the assign node
const CUSTOM_EVENT_OFFSET: [f32; 2] = [300.0, 120.0];

/// `bind_delegate`: assign-delegate node plus a fresh custom event wired to
/// it, optionally linked to a target object and an exec source.
///
/// All nodes and links are staged on a copy of the graph, which replaces
/// the stored graph only once every step has succeeded.
pub(crate) fn bind_delegate(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let target_class = params.required_str("target_class")?;
    let delegate_name = params.required_str("delegate_name")?;
    let [x, y] = params.position()?;
    let [event_x, event_y] = params
        .optional_position("custom_event_position")?
        .unwrap_or([x + CUSTOM_EVENT_OFFSET[0], y + CUSTOM_EVENT_OFFSET[1]]);
    let target_node = params.optional_node_id("target_node_id")?;
    let target_output_pin = params.str_or("target_output_pin", RETURN_VALUE)?;
    let assign_target_pin = params.str_or("assign_target_pin", SELF_PIN)?;
    let exec_source = params.optional_node_id("exec_source_node_id")?;
    let exec_source_pin = params.str_or("exec_source_pin", EXEC_OUTPUT)?;
    let assign_exec_pin = params.str_or("assign_exec_pin", EXEC_INPUT)?;

    let class = resolver.resolve_class(target_class)?;
    let (owner, delegate) = resolver
        .find_delegate(class, delegate_name)
        .ok_or_else(|| CommandError::not_found("Delegate", format!("{delegate_name} on {}", class.name)))?;

    let blueprint = store.require_mut(graph_id)?;
    let event_name = blueprint.unique_name(&format!("{}_Event", delegate.name));
    let mut graph = blueprint.event_graph.clone();

    let assign = graph.add_node(
        Node::new(NodeKind::AssignDelegate {
            delegate: delegate.name.clone(),
            owner: owner.to_ref(),
        })
        .with_position(x, y)
        .with_pins(schema::assign_delegate_pins(class)),
    );
    let custom_event = graph.add_node(
        Node::new(NodeKind::CustomEvent {
            function_name: event_name.clone(),
        })
        .with_position(event_x, event_y)
        .with_pins(schema::event_pins(&delegate.params)),
    );
    graph.connect_by_name(custom_event, DELEGATE_OUTPUT, assign, DELEGATE_INPUT)?;

    if let Some(target) = target_node {
        require_node(&graph, target)?;
        if let Err(err) = graph.connect_by_name(target, target_output_pin, assign, assign_target_pin) {
            if !assign_target_pin.eq_ignore_ascii_case(SELF_PIN) {
                return Err(err.into());
            }
            graph
                .connect_by_name(target, target_output_pin, assign, ASSIGN_TARGET_FALLBACK)
                .map_err(|_| err)?;
        }
    }

    if let Some(source) = exec_source {
        require_node(&graph, source)?;
        graph.connect_by_name(source, exec_source_pin, assign, assign_exec_pin)?;
    }

    blueprint.event_graph = graph;
    blueprint.mark_structurally_modified();

    Ok(payload(json!({
        "assign_node_id": id_text(assign),
        "delegate_name": delegate.name,
        "target_class": class.path,
        "custom_event_node_id": id_text(custom_event),
        "custom_event_name": event_name,
    })))
}

/// `bind_widget_event`: bound event for a widget delegate, created once per
/// (widget, delegate) pair and moved below the lowest node.
///
/// Also accepts the legacy shape where `widget_name` names the blueprint
/// and `widget_component_name` the widget.
pub(crate) fn bind_widget_event(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let (graph_id, widget_name) = match params.optional_str("widget_component_name")? {
        Some(component) if params.get_any(GRAPH_ID_KEYS).is_none() => {
            (params.required_str("widget_name")?, component)
        }
        _ => (params.graph_id()?, params.required_str("widget_name")?),
    };
    let event_name = params.required_str("event_name")?;

    let blueprint = store.require_mut(graph_id)?;
    let class_name = blueprint
        .component_class(widget_name)
        .ok_or_else(|| CommandError::not_found("Widget", widget_name))?;
    let class = resolver.resolve_class(class_name)?;
    let (_, delegate) = resolver
        .find_delegate(class, event_name)
        .ok_or_else(|| CommandError::not_found("Delegate", format!("{event_name} on widget {widget_name}")))?;

    let key = BoundEventKey::new(widget_name, event_name);
    let graph = &mut blueprint.event_graph;
    let existing = graph.bound_events(&key).first().copied();
    let node_id = match existing {
        Some(id) => id,
        None => graph.add_node(
            Node::new(NodeKind::ComponentBoundEvent { key })
                .with_pins(schema::event_pins(&delegate.params)),
        ),
    };

    let row = graph.max_y() + BOUND_EVENT_ROW_GAP;
    if let Some(node) = graph.node_mut(node_id) {
        node.position = [BOUND_EVENT_X, row];
    }

    if existing.is_some() {
        blueprint.mark_modified();
    } else {
        blueprint.mark_structurally_modified();
    }

    Ok(payload(json!({
        "widget_name": widget_name,
        "event_name": event_name,
        "node_id": id_text(node_id),
    })))
}

#[cfg(test)]
mod tests {
    use crate::error::CommandError;
    use crate::test_support::Harness;
    use ordoplay_blueprint_graph::NodeKind;
    use serde_json::json;

    #[test]
    fn test_bind_delegate_creates_wired_pair() {
        let mut harness = Harness::new();
        let result = harness.ok(
            "bind_delegate",
            json!({
                "graph_id": "BP_Test",
                "target_class": "Actor",
                "delegate_name": "OnDestroyed",
                "position": [100, 100]
            }),
        );
        assert_eq!(result["custom_event_name"], "OnDestroyed_Event");
        assert_eq!(result["target_class"], "/Script/Engine.Actor");

        let event = harness.node("BP_Test", &result["custom_event_node_id"]);
        assert_eq!(event.position, [400.0, 220.0]);
        assert!(event.find_pin("DestroyedActor").is_some());
        assert_eq!(harness.graph("BP_Test").link_count(), 1);
        assert_eq!(harness.graph("BP_Test").changes().structural, 1);

        let again = harness.ok(
            "bind_delegate",
            json!({ "graph_id": "BP_Test", "target_class": "Actor", "delegate_name": "OnDestroyed" }),
        );
        assert_eq!(again["custom_event_name"], "OnDestroyed_Event_1");
    }

    #[test]
    fn test_bind_delegate_links_target_and_exec() {
        let mut harness = Harness::new();
        let begin = harness.ok("add_event_node", json!({ "graph_id": "BP_Test", "event_name": "ReceiveBeginPlay" }));
        let getter = harness.ok(
            "add_function_call_node",
            json!({ "graph_id": "BP_Test", "function_name": "GetPlayerPawn", "target": "GameplayStatics" }),
        );
        let result = harness.ok(
            "bind_delegate",
            json!({
                "graph_id": "BP_Test",
                "target_class": "Pawn",
                "delegate_name": "OnDestroyed",
                "target_node_id": getter["node_id"],
                "exec_source_node_id": begin["node_id"]
            }),
        );
        let assign = harness.node("BP_Test", &result["assign_node_id"]);
        assert!(matches!(&assign.kind, NodeKind::AssignDelegate { owner, .. } if owner.name == "AActor"));
        assert_eq!(harness.graph("BP_Test").link_count(), 3);
    }

    #[test]
    fn test_bind_delegate_failure_leaves_graph_unchanged() {
        let mut harness = Harness::new();
        let begin = harness.ok("add_event_node", json!({ "graph_id": "BP_Test", "event_name": "ReceiveBeginPlay" }));
        let err = harness
            .run(
                "bind_delegate",
                json!({
                    "graph_id": "BP_Test",
                    "target_class": "Actor",
                    "delegate_name": "OnDestroyed",
                    "exec_source_node_id": begin["node_id"],
                    "exec_source_pin": "Nope"
                }),
            )
            .unwrap_err();
        assert!(matches!(err, CommandError::ConnectionFailed(_)));
        assert_eq!(harness.graph("BP_Test").node_count(), 1);
        assert_eq!(harness.graph("BP_Test").link_count(), 0);
    }

    #[test]
    fn test_bind_delegate_unknown_delegate() {
        let mut harness = Harness::new();
        let err = harness
            .run(
                "bind_delegate",
                json!({ "graph_id": "BP_Test", "target_class": "Button", "delegate_name": "OnExploded" }),
            )
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { what: "Delegate", .. }));
    }

    #[test]
    fn test_bind_widget_event_reuses_and_restacks() {
        let mut harness = Harness::new();
        harness.ok("add_self_reference", json!({ "graph_id": "WBP_Menu", "position": [0, 500] }));

        let first = harness.ok(
            "bind_widget_event",
            json!({ "graph_id": "WBP_Menu", "widget_name": "Button1", "event_name": "OnClicked" }),
        );
        let node = harness.node("WBP_Menu", &first["node_id"]);
        assert_eq!(node.position, [200.0, 700.0]);

        let second = harness.ok(
            "bind_widget_event",
            json!({ "widget_name": "WBP_Menu", "widget_component_name": "Button1", "event_name": "OnClicked" }),
        );
        assert_eq!(first["node_id"], second["node_id"]);
        assert_eq!(harness.graph("WBP_Menu").node_count(), 2);
        let node = harness.node("WBP_Menu", &second["node_id"]);
        assert_eq!(node.position, [200.0, 900.0]);
    }

    #[test]
    fn test_bind_widget_event_requires_widget_and_delegate() {
        let mut harness = Harness::new();
        let err = harness
            .run("bind_widget_event", json!({ "graph_id": "WBP_Menu", "widget_name": "Slider9", "event_name": "OnClicked" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { what: "Widget", .. }));

        let err = harness
            .run("bind_widget_event", json!({ "graph_id": "WBP_Menu", "widget_name": "Button1", "event_name": "OnValueChanged" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { what: "Delegate", .. }));
        assert_eq!(harness.graph("WBP_Menu").node_count(), 0);
    }
}
