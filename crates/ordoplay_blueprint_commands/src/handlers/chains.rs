// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bulk removal commands: exec chains, duplicate bound events, whole graphs.

use super::{id_text, payload, require_node};
use crate::error::CommandError;
use crate::params::Params;
use crate::resolve::TypeResolver;
use crate::response::Payload;
use crate::schema::EXEC_OUTPUT;
use crate::store::BlueprintStore;
use ordoplay_blueprint_graph::{dedupe_bound_events as dedupe, exec_chain_closure, BoundEventKey, NodeKind, PinDirection};
use serde_json::{json, Value};

/// Accepted spellings of the bound property
const PROPERTY_KEYS: &[&str] = &["property_name", "widget_name"];

/// `clear_exec_chain`: remove everything hanging off one event output,
/// keeping the event itself
pub(crate) fn clear_exec_chain(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let event_id = params.node_id("event_node_id")?;
    let output_pin = params.str_or("event_output_pin", EXEC_OUTPUT)?;

    let blueprint = store.require_mut(graph_id)?;
    let graph = &mut blueprint.event_graph;
    require_node(graph, event_id)?;
    if graph.find_pin_in(event_id, output_pin, PinDirection::Output).is_none() {
        return Err(CommandError::not_found("Pin", output_pin));
    }

    let doomed = exec_chain_closure(graph, event_id, output_pin);
    let removed = doomed
        .into_iter()
        .filter(|node| graph.remove_node(*node).is_some())
        .count();
    if removed > 0 {
        blueprint.mark_structurally_modified();
    }

    tracing::debug!(event = %event_id, pin = output_pin, removed, "cleared exec chain");
    Ok(payload(json!({
        "event_node_id": id_text(event_id),
        "event_output_pin": output_pin,
        "removed_nodes": removed,
    })))
}

/// `dedupe_bound_events`: collapse bound events of one (property, delegate)
/// pair into a single survivor
pub(crate) fn dedupe_bound_events(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let property_name = params.required_str_any(PROPERTY_KEYS)?;
    let event_name = params.required_str("event_name")?;
    let keep = params.optional_node_id("keep_node_id")?;
    let output_pin = params.str_or("event_output_pin", EXEC_OUTPUT)?;

    let blueprint = store.require_mut(graph_id)?;
    let key = BoundEventKey::new(property_name, event_name);
    let graph = &blueprint.event_graph;
    let missing_pin = graph
        .bound_events(&key)
        .into_iter()
        .any(|id| graph.find_pin_in(id, output_pin, PinDirection::Output).is_none());
    if missing_pin {
        return Err(CommandError::not_found("Pin", output_pin));
    }

    let report = dedupe(&mut blueprint.event_graph, &key, keep, output_pin);

    let mut result = payload(json!({
        "property_name": property_name,
        "event_name": event_name,
        "matched_events": report.matched,
    }));
    if let Some(kept) = report.kept {
        result.insert("kept_node_id".to_string(), id_text(kept));
    }
    result.insert("removed_event_nodes".to_string(), Value::from(report.removed_event_nodes));
    result.insert("removed_chain_nodes".to_string(), Value::from(report.removed_chain_nodes));
    Ok(result)
}

/// `clear_event_graph`: remove every node, optionally sparing component
/// bound events
pub(crate) fn clear_event_graph(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let keep_bound_events = params.optional_bool("keep_bound_events")?.unwrap_or(false);

    let blueprint = store.require_mut(graph_id)?;
    let graph = &mut blueprint.event_graph;

    let ids: Vec<_> = graph.node_ids().collect();
    let mut removed = 0;
    let mut kept = 0;
    for id in ids.into_iter().rev() {
        let spare = keep_bound_events
            && graph
                .node(id)
                .is_some_and(|n| matches!(n.kind, NodeKind::ComponentBoundEvent { .. }));
        if spare {
            kept += 1;
        } else if graph.remove_node(id).is_some() {
            removed += 1;
        }
    }
    if removed > 0 {
        blueprint.mark_structurally_modified();
    }

    Ok(payload(json!({
        "blueprint_name": blueprint.name,
        "removed_count": removed,
        "kept_count": kept,
    })))
}
