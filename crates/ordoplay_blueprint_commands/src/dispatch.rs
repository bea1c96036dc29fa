// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command table and dispatch.

use crate::catalog::TypeCatalog;
use crate::error::CommandError;
use crate::handlers::{chains, delegates, find, links, nodes, variables};
use crate::params::Params;
use crate::resolve::TypeResolver;
use crate::response::{Payload, Request, Response};
use crate::store::BlueprintStore;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A command handler
pub type Handler =
    fn(&mut dyn BlueprintStore, &TypeResolver<'_>, &Params<'_>) -> Result<Payload, CommandError>;

/// Names accepted for backward compatibility, with the command they map to
const LEGACY_NAMES: &[(&str, &str)] = &[
    ("connect_blueprint_nodes", "connect_nodes"),
    ("add_blueprint_event_node", "add_event_node"),
    ("add_blueprint_function_node", "add_function_call_node"),
    ("add_blueprint_variable", "add_variable"),
    ("add_blueprint_get_self_component_reference", "add_component_reference"),
    ("add_blueprint_self_reference", "add_self_reference"),
    ("add_blueprint_input_action_node", "add_input_action_node"),
    ("add_blueprint_dynamic_cast_node", "add_dynamic_cast_node"),
    ("add_blueprint_subsystem_getter_node", "add_subsystem_getter_node"),
    ("add_blueprint_make_struct_node", "add_make_struct_node"),
    ("break_blueprint_node_pin_links", "break_pin_links"),
    ("clear_blueprint_event_exec_chain", "clear_exec_chain"),
    ("dedupe_blueprint_component_bound_events", "dedupe_bound_events"),
    ("bind_blueprint_multicast_delegate", "bind_delegate"),
    ("find_blueprint_nodes", "find_nodes"),
    ("clear_blueprint_event_graph", "clear_event_graph"),
];

/// Maps command names to handlers
pub struct Dispatcher {
    handlers: IndexMap<&'static str, Handler>,
}

impl Dispatcher {
    /// Create a dispatcher with every built-in command registered
    pub fn new() -> Self {
        let mut dispatcher = Self::empty();

        dispatcher.register("connect_nodes", links::connect_nodes);
        dispatcher.register("break_pin_links", links::break_pin_links);

        dispatcher.register("add_event_node", nodes::add_event_node);
        dispatcher.register("add_function_call_node", nodes::add_function_call_node);
        dispatcher.register("add_component_reference", nodes::add_component_reference);
        dispatcher.register("add_self_reference", nodes::add_self_reference);
        dispatcher.register("add_input_action_node", nodes::add_input_action_node);
        dispatcher.register("add_dynamic_cast_node", nodes::add_dynamic_cast_node);
        dispatcher.register("add_subsystem_getter_node", nodes::add_subsystem_getter_node);
        dispatcher.register("add_make_struct_node", nodes::add_make_struct_node);

        dispatcher.register("add_variable", variables::add_variable);

        dispatcher.register("clear_exec_chain", chains::clear_exec_chain);
        dispatcher.register("dedupe_bound_events", chains::dedupe_bound_events);
        dispatcher.register("clear_event_graph", chains::clear_event_graph);

        dispatcher.register("bind_delegate", delegates::bind_delegate);
        dispatcher.register("bind_widget_event", delegates::bind_widget_event);

        dispatcher.register("find_nodes", find::find_nodes);

        for (legacy, current) in LEGACY_NAMES {
            if let Some(handler) = dispatcher.handlers.get(current).copied() {
                dispatcher.register(*legacy, handler);
            }
        }

        dispatcher
    }

    /// Create a dispatcher with no commands
    pub fn empty() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Register (or replace) a command
    pub fn register(&mut self, name: &'static str, handler: Handler) {
        self.handlers.insert(name, handler);
    }

    /// Registered command names, in registration order
    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Whether a command is registered
    pub fn has_command(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Run one command against a store
    pub fn dispatch(
        &self,
        store: &mut dyn BlueprintStore,
        catalog: &dyn TypeCatalog,
        command: &str,
        params: &Map<String, Value>,
    ) -> Result<Payload, CommandError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| CommandError::UnknownCommand(command.to_string()))?;

        let resolver = TypeResolver::new(catalog);
        let result = handler(store, &resolver, &Params::new(params));

        match &result {
            Ok(_) => tracing::info!(command, "command succeeded"),
            Err(err) => tracing::warn!(command, kind = err.kind(), error = %err, "command failed"),
        }
        result
    }

    /// Run a request and shape the response
    pub fn handle(&self, store: &mut dyn BlueprintStore, catalog: &dyn TypeCatalog, request: &Request) -> Response {
        Response::from_result(self.dispatch(store, catalog, &request.command, &request.params))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use serde_json::json;

    #[test]
    fn test_unknown_command() {
        let mut harness = Harness::new();
        let err = harness.run("teleport_node", json!({ "graph_id": "BP_Test" })).unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(ref name) if name == "teleport_node"));
        assert_eq!(err.to_payload(), json!({ "error": "Unknown command: teleport_node" }));
    }

    #[test]
    fn test_legacy_names_share_handlers() {
        let dispatcher = Dispatcher::new();
        for (legacy, current) in LEGACY_NAMES {
            assert!(dispatcher.has_command(legacy), "{legacy}");
            assert!(dispatcher.has_command(current), "{current}");
        }
        assert!(dispatcher.has_command("bind_widget_event"));
    }

    #[test]
    fn test_command_listing() {
        let dispatcher = Dispatcher::new();
        let names: Vec<_> = dispatcher.commands().collect();
        assert_eq!(names.len(), 18 + LEGACY_NAMES.len());
        assert_eq!(names[0], "connect_nodes");
        assert_eq!(names.last().copied(), Some("clear_blueprint_event_graph"));
        assert!(Dispatcher::empty().commands().next().is_none());
    }

    #[test]
    fn test_missing_parameter_leaves_graph_untouched() {
        let mut harness = Harness::new();
        let err = harness.run("add_event_node", json!({ "graph_id": "BP_Test" })).unwrap_err();
        assert!(matches!(err, CommandError::MissingParameter("event_name")));
        assert_eq!(harness.graph("BP_Test").node_count(), 0);
        assert_eq!(harness.graph("BP_Test").changes().modified, 0);
    }

    #[test]
    fn test_handle_shapes_response() {
        let mut harness = Harness::new();
        let request = Request::new("add_self_reference", Map::new());
        let response = harness.dispatcher.handle(&mut harness.store, &harness.catalog, &request);
        assert!(!response.success);
        assert_eq!(response.error_message(), Some("Missing 'graph_id' parameter"));
    }
}
