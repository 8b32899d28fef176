//! Node implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::NodeGuid;
use serde::{Deserialize, Serialize};

/// A node in the property graph
///
/// Nodes have:
/// - A unique string GUID, immutable once assigned
/// - An arbitrary, recursively nestable property mapping
/// - Creation and last-update timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub guid: NodeGuid,

    /// Properties associated with this node
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Node {
    /// Create a new node; both timestamps start equal
    pub fn new(guid: NodeGuid, properties: PropertyMap) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Node {
            guid,
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the entire property mapping
    ///
    /// This is a wholesale replacement, not a merge: keys absent from the new
    /// mapping are gone afterwards. Identity and `created_at` are untouched.
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

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.guid.hash(state);
    }
}
