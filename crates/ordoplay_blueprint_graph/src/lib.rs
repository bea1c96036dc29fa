// SPDX-License-Identifier: MIT OR Apache-2.0
//! Event graph model for `OrdoPlay` blueprints.
//!
//! This crate provides the in-memory graph that blueprint commands mutate:
//! - Nodes with a closed set of kinds (events, calls, casts, ...)
//! - Typed input/output pins with literal defaults
//! - Links between pins of opposite direction
//! - Exec-chain closure for bulk removal
//! - Deduplication of component bound events
//!
//! ## Architecture
//!
//! The graph owns its nodes and links. Pins belong to nodes; links are
//! stored once on the graph and queried from either end, so both sides of
//! a link always agree.

pub mod types;
pub mod pin;
pub mod node;
pub mod link;
pub mod graph;
pub mod query;
pub mod closure;
pub mod dedup;

pub use closure::{absorb_inputs, exec_chain_closure, forward_chain};
pub use dedup::{dedupe_bound_events, DedupReport};
pub use graph::{ChangeLog, ConnectionError, Graph};
pub use link::{Link, PinRef};
pub use node::{BoundEventKey, Node, NodeId, NodeKind};
pub use pin::{Pin, PinCategory, PinDirection, PinId, PinSubType, PinType};
pub use types::{ClassRef, FunctionRef, StructRef};
