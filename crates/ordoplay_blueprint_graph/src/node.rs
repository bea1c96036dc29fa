// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the event graph.

use crate::pin::{Pin, PinDirection, PinId};
use crate::types::{ClassRef, FunctionRef, StructRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node
///
/// Renders as 32 upper-case hexadecimal digits, the textual GUID form
/// callers pass back in commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the textual GUID form (simple or hyphenated)
    pub fn parse(text: &str) -> Option<Self> {
        Uuid::try_parse(text.trim()).ok().map(Self)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Uuid::encode_buffer();
        f.write_str(self.0.simple().encode_upper(&mut buf))
    }
}

/// Identity of a component bound event: the component property plus the
/// delegate it listens to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundEventKey {
    /// Component/widget property name (e.g. `Button1`)
    pub property_name: String,
    /// Delegate property name (e.g. `OnClicked`)
    pub delegate_name: String,
}

impl BoundEventKey {
    /// Create a new key
    pub fn new(property_name: impl Into<String>, delegate_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            delegate_name: delegate_name.into(),
        }
    }
}

impl fmt::Display for BoundEventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.property_name, self.delegate_name)
    }
}

/// Node kind with its kind-specific metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Overridable engine event (e.g. `ReceiveBeginPlay`)
    Event {
        /// Event function name
        event_name: String,
        /// Class declaring the event
        owner: ClassRef,
    },
    /// User-defined event
    CustomEvent {
        /// Event name, unique within the blueprint
        function_name: String,
    },
    /// Event fired by a delegate on a component/widget property
    ComponentBoundEvent {
        /// Bound property and delegate
        key: BoundEventKey,
    },
    /// Call to a member function
    FunctionCall {
        /// Called function
        function: FunctionRef,
    },
    /// Read of a member variable
    VariableGet {
        /// Variable name
        variable: String,
    },
    /// Reference to the owning object
    SelfReference,
    /// Input action event
    InputAction {
        /// Action mapping name
        action_name: String,
    },
    /// Cast to a class
    DynamicCast {
        /// Class cast to
        target_type: ClassRef,
    },
    /// Subsystem accessor
    SubsystemGetter {
        /// Subsystem class
        subsystem: ClassRef,
    },
    /// Struct constructor
    MakeStruct {
        /// Constructed struct
        struct_type: StructRef,
    },
    /// Binding of an event to a multicast delegate
    AssignDelegate {
        /// Delegate property name
        delegate: String,
        /// Class declaring the delegate
        owner: ClassRef,
    },
}

impl NodeKind {
    /// Tag naming the kind, as used by node searches
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Event { .. } => "Event",
            Self::CustomEvent { .. } => "CustomEvent",
            Self::ComponentBoundEvent { .. } => "ComponentBoundEvent",
            Self::FunctionCall { .. } => "FunctionCall",
            Self::VariableGet { .. } => "VariableGet",
            Self::SelfReference => "Self",
            Self::InputAction { .. } => "InputAction",
            Self::DynamicCast { .. } => "DynamicCast",
            Self::SubsystemGetter { .. } => "SubsystemGetter",
            Self::MakeStruct { .. } => "MakeStruct",
            Self::AssignDelegate { .. } => "AssignDelegate",
        }
    }

    /// Display title
    pub fn title(&self) -> String {
        match self {
            Self::Event { event_name, .. } => format!("Event {event_name}"),
            Self::CustomEvent { function_name } => function_name.clone(),
            Self::ComponentBoundEvent { key } => {
                format!("{} ({})", key.delegate_name, key.property_name)
            }
            Self::FunctionCall { function } => function.name.clone(),
            Self::VariableGet { variable } => variable.clone(),
            Self::SelfReference => "Self".to_string(),
            Self::InputAction { action_name } => format!("InputAction {action_name}"),
            Self::DynamicCast { target_type } => format!("Cast To {}", target_type.name),
            Self::SubsystemGetter { subsystem } => subsystem.name.clone(),
            Self::MakeStruct { struct_type } => format!("Make {}", struct_type.name),
            Self::AssignDelegate { delegate, .. } => format!("Bind Event to {delegate}"),
        }
    }

    /// Whether this kind starts an execution chain
    pub fn is_event(&self) -> bool {
        matches!(
            self,
            Self::Event { .. }
                | Self::CustomEvent { .. }
                | Self::ComponentBoundEvent { .. }
                | Self::InputAction { .. }
        )
    }

    /// Bound event identity, for component bound events
    pub fn bound_event_key(&self) -> Option<&BoundEventKey> {
        match self {
            Self::ComponentBoundEvent { key } => Some(key),
            _ => None,
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID, fixed at creation
    pub id: NodeId,
    /// Kind and kind-specific metadata
    pub kind: NodeKind,
    /// Position in the graph (x = column, y = row)
    pub position: [f32; 2],
    /// Pins in declaration order
    pub pins: Vec<Pin>,
}

impl Node {
    /// Create a new node with no pins
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            position: [0.0, 0.0],
            pins: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the pins
    pub fn with_pins(mut self, pins: Vec<Pin>) -> Self {
        self.pins = pins;
        self
    }

    /// Column
    pub fn x(&self) -> f32 {
        self.position[0]
    }

    /// Row
    pub fn y(&self) -> f32 {
        self.position[1]
    }

    /// Get a pin by ID
    pub fn pin(&self, pin_id: &PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == *pin_id)
    }

    /// Find a pin by exact name, any direction
    pub fn find_pin(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.name == name)
    }

    /// Find a pin by exact name and direction
    pub fn find_pin_in(&self, name: &str, direction: PinDirection) -> Option<&Pin> {
        self.pins
            .iter()
            .find(|p| p.direction == direction && p.name == name)
    }

    /// Find a mutable pin by exact name and direction
    pub fn find_pin_mut(&mut self, name: &str, direction: PinDirection) -> Option<&mut Pin> {
        self.pins
            .iter_mut()
            .find(|p| p.direction == direction && p.name == name)
    }

    /// Input pins
    pub fn inputs(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.direction == PinDirection::Input)
    }

    /// Output pins
    pub fn outputs(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.direction == PinDirection::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::PinType;

    #[test]
    fn test_node_id_text_round_trip() {
        let id = NodeId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 32);
        assert_eq!(text, text.to_uppercase());
        assert_eq!(NodeId::parse(&text), Some(id));
        assert_eq!(NodeId::parse(&id.0.hyphenated().to_string()), Some(id));
        assert_eq!(NodeId::parse("not-a-guid"), None);
    }

    #[test]
    fn test_find_pin_is_exact() {
        let node = Node::new(NodeKind::SelfReference).with_pins(vec![
            Pin::input("Execute", PinType::exec()),
            Pin::output("Then", PinType::exec()),
        ]);
        assert!(node.find_pin("Then").is_some());
        assert!(node.find_pin("then").is_none());
        assert!(node.find_pin_in("Then", PinDirection::Input).is_none());
        assert_eq!(node.inputs().count(), 1);
        assert_eq!(node.outputs().count(), 1);
    }

    #[test]
    fn test_bound_event_key() {
        let kind = NodeKind::ComponentBoundEvent {
            key: BoundEventKey::new("Button1", "OnClicked"),
        };
        assert!(kind.is_event());
        assert_eq!(kind.tag(), "ComponentBoundEvent");
        assert_eq!(kind.bound_event_key().map(ToString::to_string).as_deref(), Some("Button1.OnClicked"));
        assert!(NodeKind::SelfReference.bound_event_key().is_none());
    }
}
