// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixtures shared by command tests.

use crate::catalog::{FunctionDef, StaticCatalog};
use crate::dispatch::Dispatcher;
use crate::error::CommandError;
use crate::response::Payload;
use crate::store::{Blueprint, BlueprintStore, InMemoryStore};
use ordoplay_blueprint_graph::{Graph, Node, NodeId};
use serde_json::Value;

/// Store, catalog and dispatcher wired together
pub(crate) struct Harness {
    pub(crate) store: InMemoryStore,
    pub(crate) catalog: StaticCatalog,
    pub(crate) dispatcher: Dispatcher,
}

impl Harness {
    /// Two blueprints: `BP_Test` (an actor with a button and a mesh) and
    /// `WBP_Menu` (a widget with a button)
    pub(crate) fn new() -> Self {
        let store = InMemoryStore::new()
            .with_blueprint(
                Blueprint::new("BP_Test", "AActor")
                    .with_component("Button1", "UButton")
                    .with_component("Mesh", "UStaticMeshComponent")
                    .with_function(FunctionDef::new("Fire")),
            )
            .with_blueprint(Blueprint::new("WBP_Menu", "UUserWidget").with_component("Button1", "UButton"));
        Self {
            store,
            catalog: StaticCatalog::builtin(),
            dispatcher: Dispatcher::new(),
        }
    }

    pub(crate) fn run(&mut self, command: &str, params: Value) -> Result<Payload, CommandError> {
        let params = match params {
            Value::Object(map) => map,
            _ => Payload::new(),
        };
        self.dispatcher.dispatch(&mut self.store, &self.catalog, command, &params)
    }

    pub(crate) fn ok(&mut self, command: &str, params: Value) -> Payload {
        match self.run(command, params) {
            Ok(payload) => payload,
            Err(err) => panic!("{command} failed: {err}"),
        }
    }

    pub(crate) fn blueprint(&self, name: &str) -> &Blueprint {
        self.store.blueprint(name).expect("blueprint")
    }

    pub(crate) fn graph(&self, name: &str) -> &Graph {
        &self.blueprint(name).event_graph
    }

    pub(crate) fn graph_mut(&mut self, name: &str) -> &mut Graph {
        &mut self.store.blueprint_mut(name).expect("blueprint").event_graph
    }

    /// Node by the textual id found in a result field
    pub(crate) fn node(&self, graph: &str, id: &Value) -> &Node {
        let id = id.as_str().and_then(NodeId::parse).expect("node id");
        self.graph(graph).node(id).expect("node")
    }
}
