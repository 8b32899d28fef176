//! B-Tree based secondary index over top-level properties
//!
//! One index instance per store (nodes, edges). Postings are keyed by the
//! total order on `PropertyValue`, so an exact-match probe with `Integer(30)`
//! also finds entities stored with `Float(30.0)`.

use crate::graph::{PropertyMap, PropertyValue};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::hash::Hash;

/// Exact-match index: property key -> value -> set of entity GUIDs
///
/// Only top-level keys are indexed; nested values are reachable through the
/// filter evaluator's full scan instead.
#[derive(Debug)]
pub struct PropertyIndex<K> {
    by_key: FxHashMap<String, BTreeMap<PropertyValue, FxHashSet<K>>>,
}

impl<K: Clone + Eq + Hash> PropertyIndex<K> {
    pub fn new() -> Self {
        Self {
            by_key: FxHashMap::default(),
        }
    }

    /// Add postings for every top-level property of an entity
    pub fn insert_entity(&mut self, guid: &K, properties: &PropertyMap) {
        for (key, value) in properties {
            self.by_key
                .entry(key.clone())
                .or_default()
                .entry(value.clone())
                .or_default()
                .insert(guid.clone());
        }
    }

    /// Remove the postings a previous `insert_entity` added
    ///
    /// Must be called with the property map that was indexed, before the
    /// entity's properties are replaced.
    pub fn remove_entity(&mut self, guid: &K, properties: &PropertyMap) {
        for (key, value) in properties {
            if let Some(values) = self.by_key.get_mut(key) {
                if let Some(postings) = values.get_mut(value) {
                    postings.remove(guid);
                    if postings.is_empty() {
                        values.remove(value);
                    }
                }
                if values.is_empty() {
                    self.by_key.remove(key);
                }
            }
        }
    }

    /// Exact-match lookup for a top-level property value
    pub fn lookup(&self, key: &str, value: &PropertyValue) -> Option<&FxHashSet<K>> {
        self.by_key.get(key)?.get(value)
    }
}

impl<K: Clone + Eq + Hash> Default for PropertyIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}
