// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and links.

use crate::link::{Link, PinRef};
use crate::node::{Node, NodeId};
use crate::pin::{Pin, PinDirection, PinId};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Counters of modifications applied to a graph.
///
/// A structural modification (nodes added or removed) also counts as a
/// plain modification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    /// Number of times the graph was marked modified
    pub modified: u64,
    /// Number of times the graph was marked structurally modified
    pub structural: u64,
}

/// An event graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in insertion order
    nodes: IndexMap<NodeId, Node>,
    /// Links between pins
    #[serde(default)]
    links: IndexSet<Link>,
    /// Modification counters
    #[serde(default)]
    changes: ChangeLog,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            links: IndexSet::new(),
            changes: ChangeLog::default(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, breaking every link touching its pins first
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(&node_id) {
            return None;
        }
        self.links.retain(|l| !l.involves_node(node_id));
        // Keep insertion order of the remaining nodes
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Check whether a node is resident
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve a pin address
    pub fn pin(&self, pin: PinRef) -> Option<&Pin> {
        self.nodes.get(&pin.node)?.pin(&pin.pin)
    }

    /// Link two pins.
    ///
    /// The pins may be given in either order; the link is stored
    /// output-to-input. Linking an already linked pair is a no-op.
    pub fn connect(&mut self, a: PinRef, b: PinRef) -> Result<(), ConnectionError> {
        let pin_a = self.lookup(a)?;
        let pin_b = self.lookup(b)?;

        if a.node == b.node {
            return Err(ConnectionError::SelfLoop);
        }

        if pin_a.direction == pin_b.direction {
            return Err(ConnectionError::SameDirection {
                source_pin: pin_a.name.clone(),
                target_pin: pin_b.name.clone(),
            });
        }

        if !pin_a.can_connect(pin_b) {
            return Err(ConnectionError::IncompatiblePins {
                source_pin: pin_a.name.clone(),
                source_type: pin_a.pin_type.to_string(),
                target_pin: pin_b.name.clone(),
                target_type: pin_b.pin_type.to_string(),
            });
        }

        let link = if pin_a.direction == PinDirection::Output {
            Link::new(a, b)
        } else {
            Link::new(b, a)
        };
        if self.links.contains(&link) {
            return Ok(());
        }

        for (end, pin) in [(a, pin_a), (b, pin_b)] {
            if !pin.accepts_multiple_links() && self.links_for_pin(end).next().is_some() {
                return Err(ConnectionError::PinAlreadyConnected(pin.name.clone()));
            }
        }

        self.links.insert(link);
        Ok(())
    }

    /// Link two pins addressed by node and exact pin name.
    ///
    /// The source pin is looked up among the source node's outputs, the
    /// target pin among the target node's inputs.
    pub fn connect_by_name(
        &mut self,
        source: NodeId,
        source_pin: &str,
        target: NodeId,
        target_pin: &str,
    ) -> Result<(), ConnectionError> {
        let from = self.named_pin(source, source_pin, PinDirection::Output)?;
        let to = self.named_pin(target, target_pin, PinDirection::Input)?;
        self.connect(from, to)
    }

    /// Break every link on a pin, returning how many were removed
    pub fn break_pin_links(&mut self, pin: PinRef) -> usize {
        let before = self.links.len();
        self.links.retain(|l| !l.involves_pin(pin));
        before - self.links.len()
    }

    /// Get all links
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Get links touching a pin
    pub fn links_for_pin(&self, pin: PinRef) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.involves_pin(pin))
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Mark the graph modified (defaults, links, metadata)
    pub fn mark_modified(&mut self) {
        self.changes.modified += 1;
    }

    /// Mark the graph structurally modified (nodes added or removed)
    pub fn mark_structurally_modified(&mut self) {
        self.changes.modified += 1;
        self.changes.structural += 1;
    }

    /// Modification counters
    pub fn changes(&self) -> ChangeLog {
        self.changes
    }

    fn lookup(&self, pin: PinRef) -> Result<&Pin, ConnectionError> {
        let node = self
            .nodes
            .get(&pin.node)
            .ok_or(ConnectionError::NodeNotFound(pin.node))?;
        node.pin(&pin.pin)
            .ok_or(ConnectionError::PinNotFound(pin.pin))
    }

    fn named_pin(
        &self,
        node_id: NodeId,
        name: &str,
        direction: PinDirection,
    ) -> Result<PinRef, ConnectionError> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?;
        node.find_pin_in(name, direction)
            .map(|p| PinRef::new(node_id, p.id))
            .ok_or_else(|| ConnectionError::NamedPinNotFound {
                node: node_id,
                pin: name.to_string(),
            })
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("EventGraph")
    }
}

/// Error when creating a link
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Pin not found
    #[error("Pin not found: {0:?}")]
    PinNotFound(PinId),

    /// Pin not found by name
    #[error("Pin '{pin}' not found on node '{node}'")]
    NamedPinNotFound {
        /// Node searched
        node: NodeId,
        /// Requested pin name
        pin: String,
    },

    /// Both pins point the same way
    #[error("Pins '{source_pin}' and '{target_pin}' have the same direction")]
    SameDirection {
        /// First pin
        source_pin: String,
        /// Second pin
        target_pin: String,
    },

    /// Incompatible pin types
    #[error("Incompatible pin types: '{source_pin}' ({source_type}) -> '{target_pin}' ({target_type})")]
    IncompatiblePins {
        /// Source pin name
        source_pin: String,
        /// Source pin type
        source_type: String,
        /// Target pin name
        target_pin: String,
        /// Target pin type
        target_type: String,
    },

    /// Pin already holds its single link
    #[error("Pin already connected: {0}")]
    PinAlreadyConnected(String),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::pin::PinType;

    fn exec_node(graph: &mut Graph, name: &str) -> NodeId {
        graph.add_node(Node::new(NodeKind::VariableGet { variable: name.to_string() }).with_pins(vec![
            Pin::input("Execute", PinType::exec()),
            Pin::output("Then", PinType::exec()),
            Pin::input("Value", PinType::float()),
            Pin::output("Result", PinType::float()),
        ]))
    }

    fn pin_ref(graph: &Graph, node: NodeId, name: &str) -> PinRef {
        let pin = graph.node(node).and_then(|n| n.find_pin(name)).unwrap();
        PinRef::new(node, pin.id)
    }

    #[test]
    fn test_link_symmetry() {
        let mut graph = Graph::default();
        let a = exec_node(&mut graph, "A");
        let b = exec_node(&mut graph, "B");

        graph.connect_by_name(a, "Then", b, "Execute").unwrap();
        let out = pin_ref(&graph, a, "Then");
        let inp = pin_ref(&graph, b, "Execute");

        assert!(graph.links_for_pin(out).any(|l| l.other_end(out) == Some(inp)));
        assert!(graph.links_for_pin(inp).any(|l| l.other_end(inp) == Some(out)));

        assert_eq!(graph.break_pin_links(out), 1);
        assert_eq!(graph.links_for_pin(out).count(), 0);
        assert_eq!(graph.links_for_pin(inp).count(), 0);
    }

    #[test]
    fn test_connect_is_order_independent_and_idempotent() {
        let mut graph = Graph::default();
        let a = exec_node(&mut graph, "A");
        let b = exec_node(&mut graph, "B");
        let out = pin_ref(&graph, a, "Result");
        let inp = pin_ref(&graph, b, "Value");

        graph.connect(inp, out).unwrap();
        graph.connect(out, inp).unwrap();
        assert_eq!(graph.link_count(), 1);
        let link = graph.links().next().unwrap();
        assert_eq!(link.output, out);
        assert_eq!(link.input, inp);
    }

    #[test]
    fn test_connect_rules() {
        let mut graph = Graph::default();
        let a = exec_node(&mut graph, "A");
        let b = exec_node(&mut graph, "B");
        let c = exec_node(&mut graph, "C");

        assert!(matches!(
            graph.connect_by_name(a, "Then", a, "Execute"),
            Err(ConnectionError::SelfLoop)
        ));
        assert!(matches!(
            graph.connect_by_name(a, "Then", b, "Value"),
            Err(ConnectionError::IncompatiblePins { .. })
        ));
        assert!(matches!(
            graph.connect_by_name(a, "Missing", b, "Execute"),
            Err(ConnectionError::NamedPinNotFound { .. })
        ));
        assert!(matches!(
            graph.connect(pin_ref(&graph, a, "Then"), pin_ref(&graph, b, "Then")),
            Err(ConnectionError::SameDirection { .. })
        ));

        // Data inputs take a single link
        graph.connect_by_name(a, "Result", c, "Value").unwrap();
        assert!(matches!(
            graph.connect_by_name(b, "Result", c, "Value"),
            Err(ConnectionError::PinAlreadyConnected(_))
        ));

        // Exec inputs fan in
        graph.connect_by_name(a, "Then", c, "Execute").unwrap();
        graph.connect_by_name(b, "Then", c, "Execute").unwrap();
        assert_eq!(graph.link_count(), 3);
    }

    #[test]
    fn test_remove_node_breaks_links() {
        let mut graph = Graph::default();
        let a = exec_node(&mut graph, "A");
        let b = exec_node(&mut graph, "B");
        let c = exec_node(&mut graph, "C");
        graph.connect_by_name(a, "Then", b, "Execute").unwrap();
        graph.connect_by_name(b, "Then", c, "Execute").unwrap();

        assert!(graph.remove_node(b).is_some());
        assert_eq!(graph.link_count(), 0);
        assert!(graph.remove_node(b).is_none());
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_change_counters() {
        let mut graph = Graph::default();
        graph.mark_modified();
        graph.mark_structurally_modified();
        assert_eq!(graph.changes(), ChangeLog { modified: 2, structural: 1 });
    }
}
