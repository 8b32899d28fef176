//! Keygraph
//!
//! An embedded property-graph storage and query engine. Nodes and directed
//! edges are keyed by caller-supplied string GUIDs, carry arbitrary
//! structured property mappings, and are served through point lookups,
//! referential-integrity-checked mutation, traversal (neighbors and
//! descendants), and condition-based search.
//!
//! # Architecture
//!
//! - `graph`: data model and the in-memory store (identity guard, node and
//!   edge stores, insertion-ordered snapshots)
//! - `index`: secondary property indexes kept consistent with the stores
//! - `query`: filter evaluation and search
//! - `algo`: neighbor and descendant traversal
//! - `persistence`: gzip JSON snapshot save/load
//! - `protocol`: structured request/response envelopes for drivers
//! - `engine`: the coordinator tying the pieces together behind one lock
//!
//! # Example Usage
//!
//! ```rust
//! use keygraph::{GraphEngine, SearchCondition, SearchFilter};
//! use serde_json::json;
//!
//! let engine = GraphEngine::in_memory();
//!
//! // Payloads carry their own identity under the configured key.
//! assert_eq!(engine.node_guid_property(), "guid");
//! engine.add_node(json!({"guid": "n1", "type": "person", "age": "30"})).unwrap();
//! engine.add_node(json!({"guid": "n2", "type": "person", "age": "41"})).unwrap();
//! engine.add_edge("n1", "n2", json!({"guid": "e1", "kind": "knows"})).unwrap();
//!
//! // Traversal
//! let neighbors = engine.neighbors("n1").unwrap();
//! assert_eq!(neighbors.len(), 1);
//! assert_eq!(neighbors[0].guid.as_str(), "n2");
//!
//! // Condition-based search
//! let filter = SearchFilter::new("age", SearchCondition::GreaterThan, "35");
//! let found = engine.search_nodes(&[], &[filter]);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].guid.as_str(), "n2");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod engine;
pub mod graph;
pub mod index;
pub mod persistence;
pub mod protocol;
pub mod query;

// Re-export main types for convenience
pub use engine::{EngineConfig, GraphEngine};
pub use graph::{
    Edge, EdgeGuid, GraphError, GraphResult, GraphStore, Namespace, Node, NodeGuid, PropertyMap,
    PropertyValue,
};
pub use persistence::{Snapshot, SnapshotError, SnapshotResult};
pub use protocol::{ErrorDetail, FilterSpec, Request, ResponseData, ResultEnvelope};
pub use query::{SearchCondition, SearchFilter};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
    }
}
