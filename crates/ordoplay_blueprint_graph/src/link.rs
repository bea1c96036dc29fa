// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions for the graph.

use crate::node::NodeId;
use crate::pin::PinId;
use serde::{Deserialize, Serialize};

/// Address of a pin: owning node plus pin ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinRef {
    /// Owning node
    pub node: NodeId,
    /// Pin on that node
    pub pin: PinId,
}

impl PinRef {
    /// Create a new pin address
    pub fn new(node: NodeId, pin: PinId) -> Self {
        Self { node, pin }
    }
}

/// A link between an output pin and an input pin.
///
/// Links have no identity of their own; two links are equal when they join
/// the same pair of pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Output end
    pub output: PinRef,
    /// Input end
    pub input: PinRef,
}

impl Link {
    /// Create a new link
    pub fn new(output: PinRef, input: PinRef) -> Self {
        Self { output, input }
    }

    /// Check if this link involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.output.node == node_id || self.input.node == node_id
    }

    /// Check if this link involves a specific pin
    pub fn involves_pin(&self, pin: PinRef) -> bool {
        self.output == pin || self.input == pin
    }

    /// The end opposite to `pin`, if `pin` is one of the ends
    pub fn other_end(&self, pin: PinRef) -> Option<PinRef> {
        if self.output == pin {
            Some(self.input)
        } else if self.input == pin {
            Some(self.output)
        } else {
            None
        }
    }
}
