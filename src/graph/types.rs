//! Core identifier types for the graph engine

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique string identifier for a node
///
/// Node GUIDs live in their own namespace: a node and an edge may share the
/// same literal string without conflict.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeGuid(String);

impl NodeGuid {
    pub fn new(guid: impl Into<String>) -> Self {
        NodeGuid(guid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeGuid {
    fn from(s: String) -> Self {
        NodeGuid(s)
    }
}

impl From<&str> for NodeGuid {
    fn from(s: &str) -> Self {
        NodeGuid(s.to_string())
    }
}

impl Borrow<str> for NodeGuid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Unique string identifier for an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeGuid(String);

impl EdgeGuid {
    pub fn new(guid: impl Into<String>) -> Self {
        EdgeGuid(guid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeGuid {
    fn from(s: String) -> Self {
        EdgeGuid(s)
    }
}

impl From<&str> for EdgeGuid {
    fn from(s: &str) -> Self {
        EdgeGuid(s.to_string())
    }
}

impl Borrow<str> for EdgeGuid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identity namespace an identifier belongs to
///
/// Node and edge GUIDs are reserved independently of one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    Node,
    Edge,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Node => write!(f, "node"),
            Namespace::Edge => write!(f, "edge"),
        }
    }
}
