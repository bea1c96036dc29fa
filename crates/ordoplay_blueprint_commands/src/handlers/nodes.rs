// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node creation commands.

use super::{id_text, payload};
use crate::catalog::{FunctionDef, SUBSYSTEM_CLASS};
use crate::coerce::{coerce_pin, Coercion};
use crate::error::CommandError;
use crate::params::Params;
use crate::resolve::{ResolveError, TypeResolver};
use crate::response::Payload;
use crate::schema;
use crate::store::BlueprintStore;
use ordoplay_blueprint_graph::{ClassRef, FunctionRef, Node, NodeId, NodeKind, PinCategory, PinDirection, PinType};
use serde_json::{json, Map, Value};

/// Coerce `values` onto the node's input pins. Unknown pins and skipped
/// values are logged; a failed coercion fails the command.
fn apply_values(
    node: &mut Node,
    values: &Map<String, Value>,
    resolver: &TypeResolver<'_>,
) -> Result<(), CommandError> {
    for (name, value) in values {
        let Some(pin) = node.find_pin_mut(name, PinDirection::Input) else {
            tracing::warn!(pin = %name, node = %node.kind.title(), "parameter pin not found");
            continue;
        };
        if let Coercion::Skipped(reason) = coerce_pin(pin, value, resolver)? {
            tracing::warn!(pin = %name, reason, "parameter skipped");
        }
    }
    Ok(())
}

fn added(id: NodeId) -> Payload {
    payload(json!({ "node_id": id_text(id) }))
}

/// `add_event_node`: overridable event of the blueprint's class chain.
/// An existing node for the same event is returned instead of a duplicate.
pub(crate) fn add_event_node(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let event_name = params.required_str("event_name")?;
    let [x, y] = params.position()?;

    let blueprint = store.require_mut(graph_id)?;
    let generated = blueprint.generated_class();
    let (owner, event): (ClassRef, FunctionDef) = resolver
        .resolve_function(&generated, event_name)
        .map(|(class, function)| (class.to_ref(), function.clone()))
        .ok_or_else(|| CommandError::not_found("Event", event_name))?;

    let existing = blueprint.event_graph.nodes().find(|n| {
        matches!(&n.kind, NodeKind::Event { event_name, .. } if *event_name == event.name)
    });
    if let Some(node) = existing {
        tracing::debug!(event = %event.name, node = %node.id, "reusing existing event node");
        return Ok(added(node.id));
    }

    let signature: Vec<_> = event
        .params
        .iter()
        .filter(|p| p.direction == PinDirection::Input)
        .cloned()
        .collect();
    let node = Node::new(NodeKind::Event {
        event_name: event.name.clone(),
        owner,
    })
    .with_position(x, y)
    .with_pins(schema::event_pins(&signature));

    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(added(id))
}

/// `add_function_call_node`: call to a function of `target` (or of the
/// blueprint itself), with optional pin literals from `params`
pub(crate) fn add_function_call_node(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let function_name = params.required_str("function_name")?;
    let target = params.optional_str("target")?;
    let [x, y] = params.position()?;
    let values = params.object("params")?;

    let blueprint = store.require_mut(graph_id)?;
    let generated = blueprint.generated_class();

    let owner = match target {
        Some(target) => match resolver.resolve_call_target(target) {
            Ok(class) => Some(class),
            Err(err) => {
                tracing::debug!(call_target = target, error = %err, "call target unresolved, searching the blueprint class");
                None
            }
        },
        None => None,
    };

    let (owner, function) = owner
        .and_then(|class| resolver.resolve_function(class, function_name))
        .map(|(class, function)| (class.to_ref(), function.clone()))
        .or_else(|| {
            resolver
                .resolve_function(&generated, function_name)
                .map(|(class, function)| (class.to_ref(), function.clone()))
        })
        .ok_or_else(|| ResolveError::Function {
            function: function_name.to_string(),
            owner: target.unwrap_or(blueprint.name.as_str()).to_string(),
        })?;

    let mut node = Node::new(NodeKind::FunctionCall {
        function: FunctionRef::new(owner.clone(), function.name.clone()),
    })
    .with_position(x, y)
    .with_pins(schema::function_call_pins(&owner, &function));

    if let Some(values) = values {
        apply_values(&mut node, values, resolver)?;
    }

    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(added(id))
}

/// `add_component_reference`: read of a component of the blueprint
pub(crate) fn add_component_reference(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let component_name = params.required_str("component_name")?;
    let [x, y] = params.position()?;

    let blueprint = store.require_mut(graph_id)?;
    let pin_type = match blueprint.component_class(component_name) {
        Some(class_name) => match resolver.resolve_class(class_name) {
            Ok(class) => PinType::object(class.to_ref()),
            Err(err) => {
                tracing::warn!(component = component_name, error = %err, "component class unresolved");
                PinType::new(PinCategory::Wildcard)
            }
        },
        None => {
            tracing::warn!(component = component_name, blueprint = %blueprint.name, "component not declared");
            PinType::new(PinCategory::Wildcard)
        }
    };

    let node = Node::new(NodeKind::VariableGet {
        variable: component_name.to_string(),
    })
    .with_position(x, y)
    .with_pins(schema::variable_get_pins(component_name, pin_type));

    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(added(id))
}

/// `add_self_reference`
pub(crate) fn add_self_reference(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let [x, y] = params.position()?;

    let blueprint = store.require_mut(graph_id)?;
    let node = Node::new(NodeKind::SelfReference)
        .with_position(x, y)
        .with_pins(schema::self_pins(&blueprint.generated_class().to_ref()));

    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(added(id))
}

/// `add_input_action_node`
pub(crate) fn add_input_action_node(
    store: &mut dyn BlueprintStore,
    _resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let action_name = params.required_str("action_name")?;
    let [x, y] = params.position()?;

    let blueprint = store.require_mut(graph_id)?;
    let node = Node::new(NodeKind::InputAction {
        action_name: action_name.to_string(),
    })
    .with_position(x, y)
    .with_pins(schema::input_action_pins());

    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(added(id))
}

/// `add_dynamic_cast_node`: cast to an engine class or to another
/// blueprint's generated class
pub(crate) fn add_dynamic_cast_node(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let target_class = params.required_str("target_class")?;
    let [x, y] = params.position()?;

    let target = match resolver.resolve_class(target_class) {
        Ok(class) => class.to_ref(),
        Err(err) => store
            .blueprint(target_class)
            .map(|bp| bp.generated_class().to_ref())
            .ok_or(err)?,
    };

    let blueprint = store.require_mut(graph_id)?;
    let node = Node::new(NodeKind::DynamicCast {
        target_type: target.clone(),
    })
    .with_position(x, y)
    .with_pins(schema::dynamic_cast_pins(&target));

    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(payload(json!({
        "node_id": id_text(id),
        "target_class": target.name,
    })))
}

/// `add_subsystem_getter_node`
pub(crate) fn add_subsystem_getter_node(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let subsystem_class = params.required_str("subsystem_class")?;
    let [x, y] = params.position()?;

    let class = resolver.resolve_class(subsystem_class)?;
    if !resolver.is_child_of(class, SUBSYSTEM_CLASS) {
        return Err(CommandError::UnsupportedType {
            what: "subsystem class",
            name: class.name.clone(),
        });
    }

    let blueprint = store.require_mut(graph_id)?;
    let subsystem = class.to_ref();
    let node = Node::new(NodeKind::SubsystemGetter {
        subsystem: subsystem.clone(),
    })
    .with_position(x, y)
    .with_pins(schema::subsystem_getter_pins(&subsystem));

    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(payload(json!({
        "node_id": id_text(id),
        "subsystem_class": subsystem.name,
    })))
}

/// `add_make_struct_node`: struct constructor with optional field literals
pub(crate) fn add_make_struct_node(
    store: &mut dyn BlueprintStore,
    resolver: &TypeResolver<'_>,
    params: &Params<'_>,
) -> Result<Payload, CommandError> {
    let graph_id = params.graph_id()?;
    let struct_type = params.required_str("struct_type")?;
    let [x, y] = params.position()?;
    let values = params.object("values")?;

    let struct_def = resolver.resolve_struct(struct_type)?;
    let mut node = Node::new(NodeKind::MakeStruct {
        struct_type: struct_def.to_ref(),
    })
    .with_position(x, y)
    .with_pins(schema::make_struct_pins(struct_def));

    if let Some(values) = values {
        apply_values(&mut node, values, resolver)?;
    }

    let blueprint = store.require_mut(graph_id)?;
    let id = blueprint.event_graph.add_node(node);
    blueprint.mark_structurally_modified();
    Ok(payload(json!({
        "node_id": id_text(id),
        "struct_type": struct_def.name,
        "output_pin": schema::display_name(&struct_def.name),
    })))
}
