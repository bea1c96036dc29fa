// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only queries over a graph.
//!
//! Lookups by textual node ID and exact pin name, plus link walking used by
//! the closure and dedup passes. Nothing here mutates the graph.

use crate::graph::Graph;
use crate::link::PinRef;
use crate::node::{BoundEventKey, Node, NodeId};
use crate::pin::PinDirection;
use std::collections::HashMap;

impl Graph {
    /// Find a node by its textual GUID
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.node(NodeId::parse(id)?)
    }

    /// Find a pin on a node by exact name, any direction
    pub fn find_pin(&self, node_id: NodeId, name: &str) -> Option<PinRef> {
        let pin = self.node(node_id)?.find_pin(name)?;
        Some(PinRef::new(node_id, pin.id))
    }

    /// Find a pin on a node by exact name and direction
    pub fn find_pin_in(&self, node_id: NodeId, name: &str, direction: PinDirection) -> Option<PinRef> {
        let pin = self.node(node_id)?.find_pin_in(name, direction)?;
        Some(PinRef::new(node_id, pin.id))
    }

    /// Pins linked to `pin`
    pub fn linked_to(&self, pin: PinRef) -> Vec<PinRef> {
        self.links_for_pin(pin)
            .filter_map(|l| l.other_end(pin))
            .collect()
    }

    /// Output pins of a node holding at least one link
    pub fn output_links(&self, node_id: NodeId) -> Vec<PinRef> {
        let Some(node) = self.node(node_id) else {
            return Vec::new();
        };
        node.outputs()
            .map(|p| PinRef::new(node_id, p.id))
            .filter(|pin| self.links_for_pin(*pin).next().is_some())
            .collect()
    }

    /// Nodes reached through any link of a node, one entry per link
    pub fn neighbours(&self) -> HashMap<NodeId, Vec<NodeId>> {
        let mut map: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for link in self.links() {
            map.entry(link.output.node).or_default().push(link.input.node);
            map.entry(link.input.node).or_default().push(link.output.node);
        }
        map
    }

    /// Component bound events matching a key, in insertion order
    pub fn bound_events(&self, key: &BoundEventKey) -> Vec<NodeId> {
        self.nodes()
            .filter(|n| n.kind.bound_event_key() == Some(key))
            .map(|n| n.id)
            .collect()
    }

    /// Highest row occupied by any node, or 0 for an empty graph
    pub fn max_y(&self) -> f32 {
        self.nodes().map(Node::y).fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::pin::{Pin, PinType};

    #[test]
    fn test_find_node_by_text() {
        let mut graph = Graph::default();
        let id = graph.add_node(Node::new(NodeKind::SelfReference));
        assert_eq!(graph.find_node(&id.to_string()).map(|n| n.id), Some(id));
        assert!(graph.find_node("0000").is_none());
        assert!(graph.find_node(&NodeId::new().to_string()).is_none());
    }

    #[test]
    fn test_output_links_only_reports_linked_outputs() {
        let mut graph = Graph::default();
        let a = graph.add_node(Node::new(NodeKind::SelfReference).with_pins(vec![
            Pin::output("Then", PinType::exec()),
            Pin::output("Other", PinType::exec()),
        ]));
        let b = graph.add_node(
            Node::new(NodeKind::SelfReference).with_pins(vec![Pin::input("Execute", PinType::exec())]),
        );
        graph.connect_by_name(a, "Then", b, "Execute").unwrap();

        let outputs = graph.output_links(a);
        assert_eq!(outputs, vec![graph.find_pin(a, "Then").unwrap()]);
        assert!(graph.output_links(b).is_empty());
        assert_eq!(graph.linked_to(outputs[0]), vec![graph.find_pin(b, "Execute").unwrap()]);
    }

    #[test]
    fn test_max_y() {
        let mut graph = Graph::default();
        assert_eq!(graph.max_y(), 0.0);
        graph.add_node(Node::new(NodeKind::SelfReference).with_position(0.0, 340.0));
        graph.add_node(Node::new(NodeKind::SelfReference).with_position(0.0, 120.0));
        assert_eq!(graph.max_y(), 340.0);
    }
}
