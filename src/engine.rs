//! Top-level engine: request validation, dispatch, and shared-store ownership
//!
//! The engine owns the store behind a reader-writer lock: lookups and
//! snapshots take the read side concurrently, while each insert/update runs
//! its whole validate-reserve-commit sequence under the write side, so no
//! reader ever observes a half-committed entity.

use crate::algo;
use crate::graph::{map_from_json, Edge, GraphError, GraphResult, GraphStore, Node};
use crate::persistence::{Snapshot, SnapshotError, SnapshotResult};
use crate::query::{self, SearchFilter};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Engine configuration
///
/// The identity-property keys tell callers which key a submitted payload
/// must carry; they are fixed for the lifetime of an engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Payload key carrying a node's GUID
    pub node_guid_property: String,

    /// Payload key carrying an edge's GUID
    pub edge_guid_property: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            node_guid_property: "guid".to_string(),
            edge_guid_property: "guid".to_string(),
        }
    }
}

/// The graph engine
///
/// Cloning produces another handle to the same shared store. All operations
/// are synchronous: each call completes with a result or fails with a
/// [`GraphError`], with no partial effects.
#[derive(Clone)]
pub struct GraphEngine {
    store: Arc<RwLock<GraphStore>>,
    config: EngineConfig,
    snapshot_path: Option<PathBuf>,
}

impl GraphEngine {
    /// Create an engine with no backing snapshot file
    pub fn in_memory() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an in-memory engine with explicit configuration
    pub fn with_config(config: EngineConfig) -> Self {
        let store = GraphStore::with_keys(&config.node_guid_property, &config.edge_guid_property);
        GraphEngine {
            store: Arc::new(RwLock::new(store)),
            config,
            snapshot_path: None,
        }
    }

    /// Open an engine backed by a snapshot file
    ///
    /// Loads the snapshot when the file exists, otherwise starts empty. The
    /// engine does not write back automatically; call [`GraphEngine::save`].
    pub fn open(path: impl Into<PathBuf>) -> SnapshotResult<Self> {
        Self::open_with_config(path, EngineConfig::default())
    }

    /// Open a snapshot-backed engine with explicit configuration
    pub fn open_with_config(path: impl Into<PathBuf>, config: EngineConfig) -> SnapshotResult<Self> {
        let path = path.into();
        let store = if path.exists() {
            Snapshot::load(&path)?
                .restore(&config.node_guid_property, &config.edge_guid_property)?
        } else {
            GraphStore::with_keys(&config.node_guid_property, &config.edge_guid_property)
        };

        Ok(GraphEngine {
            store: Arc::new(RwLock::new(store)),
            config,
            snapshot_path: Some(path),
        })
    }

    /// Payload key a node payload must carry
    pub fn node_guid_property(&self) -> &str {
        &self.config.node_guid_property
    }

    /// Payload key an edge payload must carry
    pub fn edge_guid_property(&self) -> &str {
        &self.config.edge_guid_property
    }

    fn parse_payload(payload: serde_json::Value) -> GraphResult<crate::graph::PropertyMap> {
        map_from_json(payload).ok_or(GraphError::MalformedPayload)
    }

    // ============================================================
    // Node operations
    // ============================================================

    /// Insert a node from a JSON payload
    pub fn add_node(&self, payload: serde_json::Value) -> GraphResult<Node> {
        let properties = Self::parse_payload(payload)?;
        self.store.write().insert_node(properties)
    }

    /// Get a node by GUID
    pub fn get_node(&self, guid: &str) -> GraphResult<Node> {
        self.store.read().get_node(guid).cloned()
    }

    /// Replace a node's properties wholesale
    pub fn update_node(&self, payload: serde_json::Value) -> GraphResult<Node> {
        let properties = Self::parse_payload(payload)?;
        self.store.write().update_node(properties)
    }

    /// Point-in-time snapshot of all nodes, in insertion order
    pub fn all_nodes(&self) -> Vec<Node> {
        self.store.read().all_nodes().into_iter().cloned().collect()
    }

    // ============================================================
    // Edge operations
    // ============================================================

    /// Insert an edge between two existing nodes
    pub fn add_edge(&self, from: &str, to: &str, payload: serde_json::Value) -> GraphResult<Edge> {
        let properties = Self::parse_payload(payload)?;
        self.store.write().insert_edge(from, to, properties)
    }

    /// Get an edge by GUID
    pub fn get_edge(&self, guid: &str) -> GraphResult<Edge> {
        self.store.read().get_edge(guid).cloned()
    }

    /// Replace an edge's properties wholesale; endpoints are immutable
    pub fn update_edge(&self, payload: serde_json::Value) -> GraphResult<Edge> {
        let properties = Self::parse_payload(payload)?;
        self.store.write().update_edge(properties)
    }

    /// Point-in-time snapshot of all edges, in insertion order
    pub fn all_edges(&self) -> Vec<Edge> {
        self.store.read().all_edges().into_iter().cloned().collect()
    }

    /// All edges touching a node as either endpoint, in insertion order
    pub fn edges_of(&self, node: &str) -> GraphResult<Vec<Edge>> {
        Ok(self
            .store
            .read()
            .incident_edges(node)?
            .into_iter()
            .cloned()
            .collect())
    }

    // ============================================================
    // Traversal
    // ============================================================

    /// Nodes one edge away in either direction; see [`algo::neighbors`]
    pub fn neighbors(&self, node: &str) -> GraphResult<Vec<Node>> {
        algo::neighbors(&self.store, node)
    }

    /// Transitive outbound closure; see [`algo::descendants`]
    pub fn descendants(&self, node: &str) -> GraphResult<Vec<Node>> {
        algo::descendants(&self.store, node)
    }

    // ============================================================
    // Search
    // ============================================================

    /// Search nodes by GUID restriction and filters
    ///
    /// Unknown GUIDs in the restriction are silently ignored; an empty
    /// filter list matches everything; results keep insertion order.
    pub fn search_nodes(&self, guids: &[String], filters: &[SearchFilter]) -> Vec<Node> {
        query::search_nodes(&self.store.read(), guids, filters)
    }

    /// Search edges; the structural analog of [`GraphEngine::search_nodes`]
    pub fn search_edges(&self, guids: &[String], filters: &[SearchFilter]) -> Vec<Edge> {
        query::search_edges(&self.store.read(), guids, filters)
    }

    // ============================================================
    // Persistence
    // ============================================================

    /// Persist the current store to the path the engine was opened with
    pub fn save(&self) -> SnapshotResult<()> {
        let path = self.snapshot_path.as_ref().ok_or(SnapshotError::NoPath)?;
        let snapshot = Snapshot::capture(&self.store.read());
        snapshot.save(path)
    }

    /// Persist the current store to an explicit path
    pub fn save_to(&self, path: &Path) -> SnapshotResult<()> {
        let snapshot = Snapshot::capture(&self.store.read());
        snapshot.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_and_get_node() {
        let engine = GraphEngine::in_memory();
        let node = engine
            .add_node(json!({"guid": "n1", "type": "person"}))
            .unwrap();
        assert_eq!(node.guid.as_str(), "n1");

        let fetched = engine.get_node("n1").unwrap();
        assert_eq!(fetched.properties, node.properties);
    }

    #[test]
    fn test_malformed_payload() {
        let engine = GraphEngine::in_memory();
        assert_eq!(
            engine.add_node(json!([1, 2, 3])).unwrap_err(),
            GraphError::MalformedPayload
        );
        assert_eq!(
            engine.update_node(json!("nope")).unwrap_err(),
            GraphError::MalformedPayload
        );
        assert!(engine.all_nodes().is_empty());
    }

    #[test]
    fn test_configured_identity_keys_are_exposed() {
        let engine = GraphEngine::with_config(EngineConfig {
            node_guid_property: "node_id".to_string(),
            edge_guid_property: "edge_id".to_string(),
        });

        assert_eq!(engine.node_guid_property(), "node_id");
        assert_eq!(engine.edge_guid_property(), "edge_id");

        engine.add_node(json!({"node_id": "n1"})).unwrap();
        engine.add_node(json!({"node_id": "n2"})).unwrap();
        let edge = engine
            .add_edge("n1", "n2", json!({"edge_id": "e1"}))
            .unwrap();
        assert_eq!(edge.guid.as_str(), "e1");
    }

    #[test]
    fn test_save_requires_path() {
        let engine = GraphEngine::in_memory();
        assert!(matches!(engine.save(), Err(SnapshotError::NoPath)));
    }
}
