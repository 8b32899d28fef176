//! In-memory graph storage
//!
//! Owns the node and edge stores, the identity guard, the outbound adjacency
//! lists, and the secondary property indexes. All mutation goes through
//! `&mut self`, so a store shared behind a lock serializes writers at the
//! granularity of a single insert or update; every validate-reserve-commit
//! sequence runs to completion inside one critical section and failures leave
//! the store unchanged.

use super::edge::Edge;
use super::guard::IdentityGuard;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeGuid, Namespace, NodeGuid};
use crate::index::PropertyIndex;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// Input payload is not a structured key/value mapping
    #[error("payload is not a structured object")]
    MalformedPayload,

    /// The designated identity key is absent (or not a usable string)
    #[error("payload is missing identity property '{0}'")]
    MissingIdentityProperty(String),

    /// GUID collision within a namespace
    #[error("{namespace} identifier '{guid}' already exists")]
    DuplicateIdentity { namespace: Namespace, guid: String },

    /// GUID lookup miss
    #[error("{namespace} '{guid}' not found")]
    NotFound { namespace: Namespace, guid: String },

    /// Edge endpoint does not reference an existing node
    #[error("edge endpoint '{0}' does not reference an existing node")]
    DanglingReference(NodeGuid),

    /// Unrecognized search condition
    #[error("unrecognized search condition '{0}'")]
    InvalidFilterCondition(String),
}

impl GraphError {
    fn node_not_found(guid: impl Into<String>) -> Self {
        GraphError::NotFound {
            namespace: Namespace::Node,
            guid: guid.into(),
        }
    }

    fn edge_not_found(guid: impl Into<String>) -> Self {
        GraphError::NotFound {
            namespace: Namespace::Edge,
            guid: guid.into(),
        }
    }

    /// Stable machine-readable code for result envelopes
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::MalformedPayload => "MalformedPayload",
            GraphError::MissingIdentityProperty(_) => "MissingIdentityProperty",
            GraphError::DuplicateIdentity { .. } => "DuplicateIdentity",
            GraphError::NotFound { .. } => "NotFound",
            GraphError::DanglingReference(_) => "DanglingReference",
            GraphError::InvalidFilterCondition(_) => "InvalidFilterCondition",
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Pull the identity GUID out of a payload
///
/// The identity property must be present and hold a non-empty string.
fn extract_guid(properties: &PropertyMap, key: &str) -> GraphResult<String> {
    match properties.get(key) {
        Some(PropertyValue::String(guid)) if !guid.is_empty() => Ok(guid.clone()),
        _ => Err(GraphError::MissingIdentityProperty(key.to_string())),
    }
}

/// In-memory graph storage
///
/// Uses insertion-ordered maps so snapshots (`all_nodes`, `all_edges`,
/// incident-edge listings) come back in the order entities were created:
/// - nodes: NodeGuid -> Node
/// - edges: EdgeGuid -> Edge
/// - outgoing: NodeGuid -> Vec<EdgeGuid> (adjacency for outbound traversal)
#[derive(Debug)]
pub struct GraphStore {
    /// Payload key that carries a node's GUID
    node_guid_key: String,

    /// Payload key that carries an edge's GUID
    edge_guid_key: String,

    /// Reserved identifiers, one namespace per entity kind
    guard: IdentityGuard,

    /// Node storage, insertion-ordered
    nodes: IndexMap<NodeGuid, Node>,

    /// Edge storage, insertion-ordered
    edges: IndexMap<EdgeGuid, Edge>,

    /// Outbound adjacency, append-only per node
    outgoing: FxHashMap<NodeGuid, Vec<EdgeGuid>>,

    /// Secondary index over top-level node properties
    node_index: PropertyIndex<NodeGuid>,

    /// Secondary index over top-level edge properties
    edge_index: PropertyIndex<EdgeGuid>,
}

impl GraphStore {
    /// Create an empty store with the default identity key (`"guid"`) for
    /// both namespaces
    pub fn new() -> Self {
        Self::with_keys("guid", "guid")
    }

    /// Create an empty store with explicit identity keys
    pub fn with_keys(node_guid_key: impl Into<String>, edge_guid_key: impl Into<String>) -> Self {
        GraphStore {
            node_guid_key: node_guid_key.into(),
            edge_guid_key: edge_guid_key.into(),
            guard: IdentityGuard::new(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            outgoing: FxHashMap::default(),
            node_index: PropertyIndex::new(),
            edge_index: PropertyIndex::new(),
        }
    }

    /// Payload key a node payload must carry
    pub fn node_guid_key(&self) -> &str {
        &self.node_guid_key
    }

    /// Payload key an edge payload must carry
    pub fn edge_guid_key(&self) -> &str {
        &self.edge_guid_key
    }

    // ============================================================
    // Node store
    // ============================================================

    /// Insert a node from an already-parsed property mapping
    ///
    /// The mapping must carry the node identity key; the GUID is reserved in
    /// the node namespace before the node is committed. Both timestamps start
    /// equal.
    pub fn insert_node(&mut self, properties: PropertyMap) -> GraphResult<Node> {
        let guid = extract_guid(&properties, &self.node_guid_key)?;
        self.guard.reserve(Namespace::Node, &guid)?;

        let guid = NodeGuid::new(guid);
        let node = Node::new(guid.clone(), properties);

        self.node_index.insert_entity(&guid, &node.properties);
        self.outgoing.entry(guid.clone()).or_default();
        self.nodes.insert(guid, node.clone());

        debug!(guid = %node.guid, "node inserted");
        Ok(node)
    }

    /// Get a node by GUID
    pub fn get_node(&self, guid: &str) -> GraphResult<&Node> {
        self.nodes
            .get(guid)
            .ok_or_else(|| GraphError::node_not_found(guid))
    }

    /// Replace a node's entire property mapping
    ///
    /// Identity and `created_at` are preserved; `updated_at` is reset. The
    /// payload addresses the node through the same identity key as insert.
    pub fn update_node(&mut self, properties: PropertyMap) -> GraphResult<Node> {
        let guid = extract_guid(&properties, &self.node_guid_key)?;
        let node = match self.nodes.get_mut(guid.as_str()) {
            Some(node) => node,
            None => return Err(GraphError::node_not_found(guid)),
        };

        self.node_index.remove_entity(&node.guid, &node.properties);
        node.replace_properties(properties);
        self.node_index.insert_entity(&node.guid, &node.properties);

        let updated = node.clone();
        debug!(guid = %updated.guid, "node updated");
        Ok(updated)
    }

    /// All nodes in insertion order
    pub fn all_nodes(&self) -> Vec<&Node> {
        self.nodes.values().collect()
    }

    /// Check if a node exists
    pub fn has_node(&self, guid: &str) -> bool {
        self.nodes.contains_key(guid)
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insertion position of a node, used to restore snapshot order after an
    /// index probe
    pub fn node_position(&self, guid: &NodeGuid) -> Option<usize> {
        self.nodes.get_index_of(guid)
    }

    // ============================================================
    // Edge store
    // ============================================================

    /// Insert an edge from an already-parsed property mapping
    ///
    /// Both endpoints must resolve to existing nodes before anything is
    /// reserved or committed; the edge GUID lives in its own namespace.
    pub fn insert_edge(
        &mut self,
        from: &str,
        to: &str,
        properties: PropertyMap,
    ) -> GraphResult<Edge> {
        if !self.nodes.contains_key(from) {
            return Err(GraphError::DanglingReference(NodeGuid::new(from)));
        }
        if !self.nodes.contains_key(to) {
            return Err(GraphError::DanglingReference(NodeGuid::new(to)));
        }

        let guid = extract_guid(&properties, &self.edge_guid_key)?;
        self.guard.reserve(Namespace::Edge, &guid)?;

        let guid = EdgeGuid::new(guid);
        let edge = Edge::new(guid.clone(), NodeGuid::new(from), NodeGuid::new(to), properties);

        self.edge_index.insert_entity(&guid, &edge.properties);
        self.outgoing
            .entry(edge.from.clone())
            .or_default()
            .push(guid.clone());
        self.edges.insert(guid, edge.clone());

        debug!(guid = %edge.guid, from = %edge.from, to = %edge.to, "edge inserted");
        Ok(edge)
    }

    /// Get an edge by GUID
    pub fn get_edge(&self, guid: &str) -> GraphResult<&Edge> {
        self.edges
            .get(guid)
            .ok_or_else(|| GraphError::edge_not_found(guid))
    }

    /// Replace an edge's entire property mapping
    ///
    /// Endpoints are immutable once created; only the properties and
    /// `updated_at` change.
    pub fn update_edge(&mut self, properties: PropertyMap) -> GraphResult<Edge> {
        let guid = extract_guid(&properties, &self.edge_guid_key)?;
        let edge = match self.edges.get_mut(guid.as_str()) {
            Some(edge) => edge,
            None => return Err(GraphError::edge_not_found(guid)),
        };

        self.edge_index.remove_entity(&edge.guid, &edge.properties);
        edge.replace_properties(properties);
        self.edge_index.insert_entity(&edge.guid, &edge.properties);

        let updated = edge.clone();
        debug!(guid = %updated.guid, "edge updated");
        Ok(updated)
    }

    /// All edges in insertion order
    pub fn all_edges(&self) -> Vec<&Edge> {
        self.edges.values().collect()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Insertion position of an edge
    pub fn edge_position(&self, guid: &EdgeGuid) -> Option<usize> {
        self.edges.get_index_of(guid)
    }

    /// All edges touching a node as either endpoint, in insertion order
    ///
    /// A self-loop appears once even though it matches both endpoints.
    pub fn incident_edges(&self, node: &str) -> GraphResult<Vec<&Edge>> {
        if !self.nodes.contains_key(node) {
            return Err(GraphError::node_not_found(node));
        }
        let guid = NodeGuid::new(node);
        Ok(self.edges.values().filter(|e| e.touches(&guid)).collect())
    }

    /// Outbound edges of a node, in insertion order
    pub fn outbound_edges(&self, node: &NodeGuid) -> Vec<&Edge> {
        self.outgoing
            .get(node)
            .map(|edge_ids| {
                edge_ids
                    .iter()
                    .filter_map(|id| self.edges.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ============================================================
    // Secondary indexes
    // ============================================================

    pub fn node_index(&self) -> &PropertyIndex<NodeGuid> {
        &self.node_index
    }

    pub fn edge_index(&self) -> &PropertyIndex<EdgeGuid> {
        &self.edge_index
    }

    // ============================================================
    // Restore - used to rebuild the store from a snapshot
    // ============================================================

    /// Insert a restored node, preserving its original timestamps
    pub fn insert_restored_node(&mut self, node: Node) -> GraphResult<()> {
        self.guard.reserve(Namespace::Node, node.guid.as_str())?;
        self.node_index.insert_entity(&node.guid, &node.properties);
        self.outgoing.entry(node.guid.clone()).or_default();
        self.nodes.insert(node.guid.clone(), node);
        Ok(())
    }

    /// Insert a restored edge; source and target nodes must already exist
    pub fn insert_restored_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if !self.nodes.contains_key(edge.from.as_str()) {
            return Err(GraphError::DanglingReference(edge.from));
        }
        if !self.nodes.contains_key(edge.to.as_str()) {
            return Err(GraphError::DanglingReference(edge.to));
        }

        self.guard.reserve(Namespace::Edge, edge.guid.as_str())?;
        self.edge_index.insert_entity(&edge.guid, &edge.properties);
        self.outgoing
            .entry(edge.from.clone())
            .or_default()
            .push(edge.guid.clone());
        self.edges.insert(edge.guid.clone(), edge);
        Ok(())
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
