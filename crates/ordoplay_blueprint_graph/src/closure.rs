// SPDX-License-Identifier: MIT OR Apache-2.0
//! Exec-chain closure.
//!
//! Computes the set of nodes that go away with an event's chain: everything
//! reachable forward from one of its output pins, plus every node whose links
//! all end inside that set (pure inputs of the doomed chain).
//!
//! The seed node is never part of the result, even when a cycle routes back
//! to it.

use crate::graph::Graph;
use crate::node::NodeId;
use indexmap::IndexSet;
use std::collections::VecDeque;

/// Nodes reachable forward from `seed`.
///
/// With `output_pin` set, traversal starts from that pin's direct targets
/// only; otherwise from every linked output of the seed. Returns `None` when
/// the named pin does not exist. The seed itself is never included.
pub fn forward_chain(graph: &Graph, seed: NodeId, output_pin: Option<&str>) -> Option<IndexSet<NodeId>> {
    let start_pins = match output_pin {
        Some(name) => vec![graph.find_pin(seed, name)?],
        None => graph.output_links(seed),
    };

    let mut reached = IndexSet::new();
    let mut queue = VecDeque::new();

    for pin in start_pins {
        for linked in graph.linked_to(pin) {
            if linked.node != seed && reached.insert(linked.node) {
                queue.push_back(linked.node);
            }
        }
    }

    while let Some(current) = queue.pop_front() {
        for pin in graph.output_links(current) {
            for linked in graph.linked_to(pin) {
                if linked.node != seed && reached.insert(linked.node) {
                    queue.push_back(linked.node);
                }
            }
        }
    }

    Some(reached)
}

/// Closure of `seed`'s chain starting at `output_pin`.
///
/// Returns an empty set when the pin does not exist; callers report that as
/// a usage error before calling.
pub fn exec_chain_closure(graph: &Graph, seed: NodeId, output_pin: &str) -> IndexSet<NodeId> {
    let Some(mut result) = forward_chain(graph, seed, Some(output_pin)) else {
        tracing::debug!(%seed, pin = output_pin, "closure seed pin not found");
        return IndexSet::new();
    };
    let reachable = result.len();

    absorb_inputs(graph, &[seed], &IndexSet::new(), &mut result);

    tracing::debug!(
        %seed,
        pin = output_pin,
        reachable,
        absorbed = result.len() - reachable,
        "computed exec chain closure"
    );
    result
}

/// Grow `set` with every node whose links all end inside `set` or at one
/// of `seeds`, until nothing more qualifies.
///
/// Seeds and `fenced` nodes are never added. A node linked to a fenced node
/// is never added either, since that link leaves the set.
pub fn absorb_inputs(graph: &Graph, seeds: &[NodeId], fenced: &IndexSet<NodeId>, set: &mut IndexSet<NodeId>) {
    let neighbours = graph.neighbours();
    loop {
        let mut added = false;
        for candidate in graph.node_ids() {
            if seeds.contains(&candidate) || fenced.contains(&candidate) || set.contains(&candidate) {
                continue;
            }
            let Some(linked) = neighbours.get(&candidate) else {
                continue;
            };
            if linked.iter().all(|n| seeds.contains(n) || set.contains(n)) {
                set.insert(candidate);
                added = true;
            }
        }
        if !added {
            break;
        }
    }
}
