//! Edge implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeGuid, NodeGuid};
use serde::{Deserialize, Serialize};

/// A directed edge in the property graph
///
/// Edges have:
/// - A unique string GUID, drawn from a namespace independent of node GUIDs
/// - From and to endpoints, each referencing an existing node (directed)
/// - An arbitrary property mapping and timestamps, as for nodes
///
/// Endpoints are held as non-owning GUID references and are immutable once
/// the edge is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub guid: EdgeGuid,

    /// Source node (edge goes FROM this node)
    pub from: NodeGuid,

    /// Target node (edge goes TO this node)
    pub to: NodeGuid,

    /// Properties associated with this edge
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Edge {
    /// Create a new directed edge; both timestamps start equal
    pub fn new(guid: EdgeGuid, from: NodeGuid, to: NodeGuid, properties: PropertyMap) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Edge {
            guid,
            from,
            to,
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the entire property mapping; endpoints and identity are untouched
    pub fn replace_properties(&mut self, properties: PropertyMap) {
        self.properties = properties;
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Check if this edge touches a node as either endpoint
    pub fn touches(&self, node: &NodeGuid) -> bool {
        &self.from == node || &self.to == node
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &NodeGuid) -> bool {
        &self.from == node
    }

    /// Check if this edge is a self-loop
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Given one endpoint, return the other
    ///
    /// For a self-loop both endpoints are the node itself.
    pub fn other_endpoint(&self, node: &NodeGuid) -> &NodeGuid {
        if &self.from == node {
            &self.to
        } else {
            &self.from
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.guid.hash(state);
    }
}
