// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deduplication of component bound events.
//!
//! Several bound events for the same (property, delegate) pair collapse into
//! one survivor. Every other candidate is removed together with the closure
//! of its chain, except for nodes the survivor's own chain still uses and
//! the inputs feeding them.

use crate::closure::{absorb_inputs, forward_chain};
use crate::graph::Graph;
use crate::node::{BoundEventKey, Node, NodeId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Outcome of a dedup pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupReport {
    /// Number of bound events matching the key
    pub matched: usize,
    /// Surviving bound event, if any matched
    pub kept: Option<NodeId>,
    /// Duplicate bound events removed
    pub removed_event_nodes: usize,
    /// Chain nodes removed with them
    pub removed_chain_nodes: usize,
}

/// Collapse the bound events matching `key` into one.
///
/// The survivor is `preferred` when it is one of the candidates, otherwise
/// the top-left candidate (lowest row, then lowest column; insertion order
/// breaks exact ties). With one or no candidate nothing changes and the
/// graph is not marked.
///
/// Callers check that `output_pin` exists on the candidates first; a
/// duplicate without it contributes no chain.
pub fn dedupe_bound_events(
    graph: &mut Graph,
    key: &BoundEventKey,
    preferred: Option<NodeId>,
    output_pin: &str,
) -> DedupReport {
    let mut candidates = graph.bound_events(key);
    let matched = candidates.len();

    if matched <= 1 {
        return DedupReport {
            matched,
            kept: candidates.first().copied(),
            ..DedupReport::default()
        };
    }

    let survivor = match preferred.filter(|id| candidates.contains(id)) {
        Some(id) => id,
        None => {
            let position = |id: &NodeId| graph.node(*id).map_or([0.0, 0.0], |n: &Node| n.position);
            candidates.sort_by(|a, b| {
                let (pa, pb) = (position(a), position(b));
                pa[1].total_cmp(&pb[1]).then(pa[0].total_cmp(&pb[0]))
            });
            candidates[0]
        }
    };

    let mut protected: IndexSet<NodeId> = forward_chain(graph, survivor, None).unwrap_or_default();
    protected.insert(survivor);

    let duplicates: Vec<NodeId> = candidates.iter().copied().filter(|c| *c != survivor).collect();

    let mut chain_nodes = IndexSet::new();
    for duplicate in &duplicates {
        for node in forward_chain(graph, *duplicate, Some(output_pin)).unwrap_or_default() {
            if protected.contains(&node) {
                tracing::debug!(%node, %survivor, "keeping node still used by the surviving event");
                continue;
            }
            chain_nodes.insert(node);
        }
    }
    absorb_inputs(graph, &duplicates, &protected, &mut chain_nodes);

    let mut removed_event_nodes = 0;
    for duplicate in duplicates {
        if graph.remove_node(duplicate).is_some() {
            removed_event_nodes += 1;
        }
    }

    let mut removed_chain_nodes = 0;
    for node in chain_nodes {
        if graph.remove_node(node).is_some() {
            removed_chain_nodes += 1;
        }
    }

    graph.mark_structurally_modified();

    tracing::info!(
        %key,
        matched,
        kept = %survivor,
        removed_event_nodes,
        removed_chain_nodes,
        "deduplicated bound events"
    );

    DedupReport {
        matched,
        kept: Some(survivor),
        removed_event_nodes,
        removed_chain_nodes,
    }
}
