//! Condition-based search over the node and edge stores
//!
//! Search is a filtered scan in store snapshot order. When a query carries a
//! top-level equality filter, the candidate set is narrowed through the
//! property index first; candidates are always re-checked by the evaluator,
//! so the index is purely an accelerator and never changes semantics.

use super::filter::{evaluate, SearchCondition, SearchFilter};
use crate::graph::{Edge, GraphStore, Node, PropertyValue};
use rustc_hash::FxHashSet;

/// Search nodes by GUID restriction and filters
///
/// The candidate set is the intersection of existing nodes with the
/// restriction when it is non-empty (unknown GUIDs are silently ignored),
/// otherwise all nodes. A node is returned when every filter evaluates true;
/// an empty filter list matches everything. Results keep store snapshot
/// order.
pub fn search_nodes(store: &GraphStore, guids: &[String], filters: &[SearchFilter]) -> Vec<Node> {
    let restriction = restriction_set(guids);

    let candidates: Vec<&Node> = match equality_probe(filters) {
        Some((field, value)) => {
            let mut positions: Vec<usize> = probe_values(value)
                .iter()
                .filter_map(|probe| store.node_index().lookup(field, probe))
                .flatten()
                .filter_map(|guid| store.node_position(guid))
                .collect();
            positions.sort_unstable();
            positions.dedup();
            let all = store.all_nodes();
            positions
                .into_iter()
                .filter_map(|at| all.get(at).copied())
                .collect()
        }
        None => store.all_nodes(),
    };

    candidates
        .into_iter()
        .filter(|node| {
            restriction
                .as_ref()
                .map_or(true, |set| set.contains(node.guid.as_str()))
        })
        .filter(|node| filters.iter().all(|f| evaluate(&node.properties, f)))
        .cloned()
        .collect()
}

/// Search edges; the structural analog of [`search_nodes`]
pub fn search_edges(store: &GraphStore, guids: &[String], filters: &[SearchFilter]) -> Vec<Edge> {
    let restriction = restriction_set(guids);

    let candidates: Vec<&Edge> = match equality_probe(filters) {
        Some((field, value)) => {
            let mut positions: Vec<usize> = probe_values(value)
                .iter()
                .filter_map(|probe| store.edge_index().lookup(field, probe))
                .flatten()
                .filter_map(|guid| store.edge_position(guid))
                .collect();
            positions.sort_unstable();
            positions.dedup();
            let all = store.all_edges();
            positions
                .into_iter()
                .filter_map(|at| all.get(at).copied())
                .collect()
        }
        None => store.all_edges(),
    };

    candidates
        .into_iter()
        .filter(|edge| {
            restriction
                .as_ref()
                .map_or(true, |set| set.contains(edge.guid.as_str()))
        })
        .filter(|edge| filters.iter().all(|f| evaluate(&edge.properties, f)))
        .cloned()
        .collect()
}

fn restriction_set(guids: &[String]) -> Option<FxHashSet<&str>> {
    if guids.is_empty() {
        None
    } else {
        Some(guids.iter().map(|s| s.as_str()).collect())
    }
}

/// First filter the property index can serve: a top-level (non-dotted)
/// equality
fn equality_probe(filters: &[SearchFilter]) -> Option<(&str, &str)> {
    filters
        .iter()
        .find(|f| f.condition == SearchCondition::Equals && !f.field.contains('.'))
        .map(|f| (f.field.as_str(), f.value.as_str()))
}

/// Typed probes whose text form can equal the filter's comparison value
///
/// The evaluator compares text forms, so every typed value that renders to
/// the target string must be probed: the raw string, a numeric reading,
/// boolean/null literals, and composite values given as JSON.
fn probe_values(target: &str) -> Vec<PropertyValue> {
    let mut probes = vec![PropertyValue::String(target.to_string())];

    if let Ok(int) = target.trim().parse::<i64>() {
        probes.push(PropertyValue::Integer(int));
    } else if let Ok(float) = target.trim().parse::<f64>() {
        probes.push(PropertyValue::Float(float));
    }

    match target {
        "true" => probes.push(PropertyValue::Boolean(true)),
        "false" => probes.push(PropertyValue::Boolean(false)),
        "null" => probes.push(PropertyValue::Null),
        _ => {}
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(target) {
        if json.is_array() || json.is_object() {
            probes.push(PropertyValue::from_json(json));
        }
    }

    probes
}
