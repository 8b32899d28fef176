//! Neighbor and descendant computation
//!
//! Both traversals take the shared store lock rather than a plain store
//! reference: the read guard is reacquired per expansion step, so a writer is
//! never starved by a long-running traversal. Entities created concurrently
//! with a traversal may or may not be observed; each individual store access
//! sees a consistent view.

use crate::graph::{GraphResult, GraphStore, Node, NodeGuid};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Nodes connected to `guid` by exactly one edge, in either direction
///
/// The result is deduplicated and never contains the start node itself, even
/// when a self-loop edge exists. Order is first-discovered, scanning incident
/// edges in insertion order.
pub fn neighbors(store: &RwLock<GraphStore>, guid: &str) -> GraphResult<Vec<Node>> {
    let store = store.read();
    let start = NodeGuid::new(guid);

    let mut seen: FxHashSet<NodeGuid> = FxHashSet::default();
    let mut found = Vec::new();
    for edge in store.incident_edges(guid)? {
        let other = edge.other_endpoint(&start);
        if other == &start {
            continue;
        }
        if seen.insert(other.clone()) {
            found.push(store.get_node(other.as_str())?.clone());
        }
    }
    Ok(found)
}

/// Nodes reachable from `guid` via one or more outbound edge hops
///
/// Breadth-first over outbound edges only, with an explicit visited set and
/// queue: each node is expanded at most once, so the traversal terminates on
/// cyclic graphs and never recurses. The start node is excluded. Outbound
/// edges of each node are expanded in insertion order, making the discovered
/// order deterministic.
pub fn descendants(store: &RwLock<GraphStore>, guid: &str) -> GraphResult<Vec<Node>> {
    let start = NodeGuid::new(guid);
    store.read().get_node(guid)?;

    let mut visited: FxHashSet<NodeGuid> = FxHashSet::default();
    visited.insert(start.clone());

    let mut queue: VecDeque<NodeGuid> = VecDeque::new();
    queue.push_back(start);

    let mut found = Vec::new();
    while let Some(current) = queue.pop_front() {
        // Lock scope is one expansion step, not the whole traversal.
        let store = store.read();
        for edge in store.outbound_edges(&current) {
            if visited.contains(&edge.to) {
                continue;
            }
            visited.insert(edge.to.clone());
            found.push(store.get_node(edge.to.as_str())?.clone());
            queue.push_back(edge.to.clone());
        }
    }
    Ok(found)
}
