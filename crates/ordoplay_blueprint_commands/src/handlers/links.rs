// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link commands.

use super::{id_text, payload, require_node};
use crate::error::CommandError;
use crate::params::Params;
use crate::resolve::TypeResolver;
use crate::response::Payload;
use crate::store::BlueprintStore;
use serde_json::json;

/// `connect_nodes`: link an output pin to an input pin by exact names
pub(crate) fn connect_nodes(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let source = params.node_id("source_node_id")?;
    let target = params.node_id("target_node_id")?;
    let source_pin = params.required_str("source_pin")?;
    let target_pin = params.required_str("target_pin")?;

    let blueprint = store.require_mut(graph_id)?;
    let graph = &mut blueprint.event_graph;
    require_node(graph, source)?;
    require_node(graph, target)?;

    graph.connect_by_name(source, source_pin, target, target_pin)?;
    blueprint.mark_modified();

    Ok(payload(json!({
        "source_node_id": id_text(source),
        "target_node_id": id_text(target),
    })))
}

/// `break_pin_links`: detach every link of one pin. A pin without links
/// is not an error; the graph is only marked when something was removed.
pub(crate) fn break_pin_links(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let node_id = params.node_id("node_id")?;
    let pin_name = params.required_str("pin_name")?;

    let blueprint = store.require_mut(graph_id)?;
    require_node(&blueprint.event_graph, node_id)?;
    let pin = blueprint
        .event_graph
        .find_pin(node_id, pin_name)
        .ok_or_else(|| CommandError::not_found("Pin", pin_name))?;

    let removed = blueprint.event_graph.break_pin_links(pin);
    if removed > 0 {
        blueprint.mark_modified();
    }

    Ok(payload(json!({
        "node_id": id_text(node_id),
        "pin_name": pin_name,
        "removed_links": removed,
    })))
}

#[cfg(test)]
mod tests {
    use crate::error::CommandError;
    use crate::test_support::Harness;
    use serde_json::json;

    fn begin_play_and_print(harness: &mut Harness) -> (String, String) {
        let event = harness.ok("add_event_node", json!({ "graph_id": "BP_Test", "event_name": "ReceiveBeginPlay" }));
        let print = harness.ok(
            "add_function_call_node",
            json!({ "graph_id": "BP_Test", "function_name": "PrintString", "target": "KismetSystemLibrary" }),
        );
        (
            event["node_id"].as_str().unwrap_or_default().to_string(),
            print["node_id"].as_str().unwrap_or_default().to_string(),
        )
    }

    #[test]
    fn test_connect_and_break() {
        let mut harness = Harness::new();
        let (event, print) = begin_play_and_print(&mut harness);

        let result = harness.ok(
            "connect_nodes",
            json!({
                "graph_id": "BP_Test",
                "source_node_id": event,
                "source_pin": "Then",
                "target_node_id": print,
                "target_pin": "Execute"
            }),
        );
        assert_eq!(result["source_node_id"], event.as_str());
        assert_eq!(harness.graph("BP_Test").link_count(), 1);
        let modified = harness.graph("BP_Test").changes().modified;

        let result = harness.ok(
            "break_pin_links",
            json!({ "graph_id": "BP_Test", "node_id": print, "pin_name": "Execute" }),
        );
        assert_eq!(result["removed_links"], 1);
        assert_eq!(harness.graph("BP_Test").link_count(), 0);
        assert_eq!(harness.graph("BP_Test").changes().modified, modified + 1);
    }

    #[test]
    fn test_break_without_links_is_zero() {
        let mut harness = Harness::new();
        let (event, _) = begin_play_and_print(&mut harness);
        let modified = harness.graph("BP_Test").changes().modified;

        let result = harness.ok(
            "break_pin_links",
            json!({ "graph_id": "BP_Test", "node_id": event, "pin_name": "Then" }),
        );
        assert_eq!(result["removed_links"], 0);
        assert_eq!(harness.graph("BP_Test").changes().modified, modified);
    }

    #[test]
    fn test_break_unknown_pin() {
        let mut harness = Harness::new();
        let (event, _) = begin_play_and_print(&mut harness);
        let err = harness
            .run("break_pin_links", json!({ "graph_id": "BP_Test", "node_id": event, "pin_name": "Else" }))
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { what: "Pin", .. }));
    }

    #[test]
    fn test_connect_rejects_bad_pins() {
        let mut harness = Harness::new();
        let (event, print) = begin_play_and_print(&mut harness);

        let err = harness
            .run(
                "connect_nodes",
                json!({
                    "graph_id": "BP_Test",
                    "source_node_id": event,
                    "source_pin": "Then",
                    "target_node_id": print,
                    "target_pin": "InString"
                }),
            )
            .unwrap_err();
        assert!(matches!(err, CommandError::ConnectionFailed(_)));

        let err = harness
            .run(
                "connect_nodes",
                json!({
                    "graph_id": "BP_Test",
                    "source_node_id": event,
                    "source_pin": "Then",
                    "target_node_id": "00000000000000000000000000000001",
                    "target_pin": "Execute"
                }),
            )
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { what: "Node", .. }));
        assert_eq!(harness.graph("BP_Test").link_count(), 0);
    }
}
