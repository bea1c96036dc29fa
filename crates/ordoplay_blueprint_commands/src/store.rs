// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blueprints and the store that owns them.

use crate::catalog::{ClassDef, FunctionDef};
use crate::error::CommandError;
use indexmap::IndexMap;
use ordoplay_blueprint_graph::{Graph, NodeKind, PinType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A member variable of a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    /// Variable name
    pub name: String,
    /// Type name as requested (`Boolean`, `Integer`, ...)
    pub type_name: String,
    /// Pin type of reads and writes
    pub pin_type: PinType,
    /// Editable on instances
    #[serde(default)]
    pub is_exposed: bool,
}

/// An authoring unit: one generated class with one event graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    /// Blueprint name, also the graph id
    pub name: String,
    /// Parent class name
    pub parent_class: String,
    /// Functions declared by the blueprint itself
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
    /// Member variables
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    /// Component or widget name -> class name
    #[serde(default)]
    pub components: IndexMap<String, String>,
    /// The event graph
    #[serde(default)]
    pub event_graph: Graph,
}

impl Blueprint {
    /// Create an empty blueprint
    pub fn new(name: impl Into<String>, parent_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_class: parent_class.into(),
            functions: Vec::new(),
            variables: Vec::new(),
            components: IndexMap::new(),
            event_graph: Graph::default(),
        }
    }

    /// Add a component
    pub fn with_component(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.components.insert(name.into(), class.into());
        self
    }

    /// Add a function
    pub fn with_function(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }

    /// Load a blueprint from RON text
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load a blueprint from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// The class this blueprint generates, as seen by the resolver
    pub fn generated_class(&self) -> ClassDef {
        let class_name = format!("{}_C", self.name);
        let path = format!("/Game/Blueprints/{}.{}", self.name, class_name);
        let mut class = ClassDef::new(class_name, path).extends(self.parent_class.clone());
        class.functions = self.functions.clone();
        class
    }

    /// Class of a component, by exact name
    pub fn component_class(&self, name: &str) -> Option<&str> {
        self.components.get(name).map(String::as_str)
    }

    /// Variable by exact name
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        self.variables.iter().find(|v| v.name == name)
    }

    fn name_taken(&self, name: &str) -> bool {
        let custom_event = self.event_graph.nodes().any(|n| {
            matches!(&n.kind, NodeKind::CustomEvent { function_name } if function_name == name)
        });
        custom_event
            || self.variables.iter().any(|v| v.name == name)
            || self.functions.iter().any(|f| f.name == name)
    }

    /// `desired` if free, else `desired_1`, `desired_2`, ...
    pub fn unique_name(&self, desired: &str) -> String {
        if !self.name_taken(desired) {
            return desired.to_string();
        }
        (1..)
            .map(|n| format!("{desired}_{n}"))
            .find(|candidate| !self.name_taken(candidate))
            .unwrap_or_else(|| desired.to_string())
    }

    /// Mark the owning graph modified
    pub fn mark_modified(&mut self) {
        self.event_graph.mark_modified();
    }

    /// Mark the owning graph structurally modified
    pub fn mark_structurally_modified(&mut self) {
        self.event_graph.mark_structurally_modified();
    }
}

/// Source of blueprints for commands.
///
/// The host owns the store; a command gets exclusive access for its whole
/// duration.
pub trait BlueprintStore {
    /// Blueprint by graph id
    fn blueprint(&self, id: &str) -> Option<&Blueprint>;

    /// Mutable blueprint by graph id
    fn blueprint_mut(&mut self, id: &str) -> Option<&mut Blueprint>;

    /// Ids of every blueprint, in load order
    fn blueprint_names(&self) -> Vec<String>;

    /// Mutable blueprint or `NotFound`
    fn require_mut(&mut self, id: &str) -> Result<&mut Blueprint, CommandError> {
        self.blueprint_mut(id)
            .ok_or_else(|| CommandError::not_found("Blueprint", id))
    }
}

/// Store backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    blueprints: IndexMap<String, Blueprint>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a blueprint
    pub fn insert(&mut self, blueprint: Blueprint) {
        tracing::debug!(blueprint = %blueprint.name, nodes = blueprint.event_graph.node_count(), "blueprint loaded");
        self.blueprints.insert(blueprint.name.clone(), blueprint);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_blueprint(mut self, blueprint: Blueprint) -> Self {
        self.insert(blueprint);
        self
    }

    /// Number of blueprints
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    fn key_of(&self, id: &str) -> Option<usize> {
        self.blueprints.get_index_of(id).or_else(|| {
            self.blueprints
                .keys()
                .position(|name| name.eq_ignore_ascii_case(id))
        })
    }
}

impl BlueprintStore for InMemoryStore {
    fn blueprint(&self, id: &str) -> Option<&Blueprint> {
        self.key_of(id)
            .and_then(|i| self.blueprints.get_index(i))
            .map(|(_, bp)| bp)
    }

    fn blueprint_mut(&mut self, id: &str) -> Option<&mut Blueprint> {
        let index = self.key_of(id)?;
        self.blueprints.get_index_mut(index).map(|(_, bp)| bp)
    }

    fn blueprint_names(&self) -> Vec<String> {
        self.blueprints.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_blueprint_graph::Node;

    #[test]
    fn test_generated_class() {
        let bp = Blueprint::new("BP_Door", "AActor").with_function(FunctionDef::new("Open"));
        let class = bp.generated_class();
        assert_eq!(class.name, "BP_Door_C");
        assert_eq!(class.path, "/Game/Blueprints/BP_Door.BP_Door_C");
        assert_eq!(class.super_class.as_deref(), Some("AActor"));
        assert_eq!(class.functions.len(), 1);
    }

    #[test]
    fn test_unique_name_suffixes() {
        let mut bp = Blueprint::new("BP_Door", "AActor");
        assert_eq!(bp.unique_name("OnClicked_Event"), "OnClicked_Event");

        bp.event_graph.add_node(Node::new(NodeKind::CustomEvent {
            function_name: "OnClicked_Event".to_string(),
        }));
        assert_eq!(bp.unique_name("OnClicked_Event"), "OnClicked_Event_1");

        bp.event_graph.add_node(Node::new(NodeKind::CustomEvent {
            function_name: "OnClicked_Event_1".to_string(),
        }));
        assert_eq!(bp.unique_name("OnClicked_Event"), "OnClicked_Event_2");
    }

    #[test]
    fn test_store_lookup_falls_back_to_case_insensitive() {
        let mut store = InMemoryStore::new()
            .with_blueprint(Blueprint::new("BP_Door", "AActor"))
            .with_blueprint(Blueprint::new("BP_Lamp", "AActor"));
        assert_eq!(store.blueprint_names(), vec!["BP_Door".to_string(), "BP_Lamp".to_string()]);
        assert!(store.blueprint("BP_Door").is_some());
        assert!(store.blueprint("bp_door").is_some());
        assert!(store.blueprint_mut("BP_Window").is_none());
        assert!(matches!(store.require_mut("BP_Window"), Err(CommandError::NotFound { .. })));
    }

    #[test]
    fn test_ron_round_trip() {
        let bp = Blueprint::new("WBP_Menu", "UUserWidget").with_component("Button1", "UButton");
        let text = bp.to_ron().unwrap();
        let loaded = Blueprint::from_ron(&text).unwrap();
        assert_eq!(loaded.component_class("Button1"), Some("UButton"));
        assert_eq!(loaded.event_graph.name, "EventGraph");
    }
}
