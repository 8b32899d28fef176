//! Property value types for graph nodes and edges
//!
//! Payloads are schema-less, recursively nestable key/value mappings. Values
//! are modeled as a closed tagged union rather than raw JSON so that search
//! and indexing can branch on type without reflection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Property map for storing node and edge properties
///
/// Insertion-ordered so a stored payload round-trips with its key order intact.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Property value type supporting multiple data types
///
/// Serialized untagged: on the wire and in snapshots a `PropertyValue` is
/// plain JSON (`"a"`, `42`, `3.5`, `true`, `null`, arrays, objects).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<PropertyValue>),
    Map(PropertyMap),
    Null,
}

impl PropertyValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get array value if this is an array
    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get map value if this is a map
    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::Array(_) => "Array",
            PropertyValue::Map(_) => "Map",
            PropertyValue::Null => "Null",
        }
    }

    /// Numeric reading of this value, if it has one
    ///
    /// Integers and floats read directly; strings are parsed. Everything else
    /// has no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Plain-text form of this value, used by search conditions
    ///
    /// Scalars render bare (no quotes); arrays and maps render as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Float(f) => f.to_string(),
            PropertyValue::Boolean(b) => b.to_string(),
            PropertyValue::Null => "null".to_string(),
            PropertyValue::Array(_) | PropertyValue::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Convert a JSON value into a property value
    pub fn from_json(value: serde_json::Value) -> PropertyValue {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropertyValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    PropertyValue::Float(f)
                } else {
                    PropertyValue::Null
                }
            }
            serde_json::Value::String(s) => PropertyValue::String(s),
            serde_json::Value::Array(items) => {
                PropertyValue::Array(items.into_iter().map(PropertyValue::from_json).collect())
            }
            serde_json::Value::Object(entries) => {
                let mut map = PropertyMap::new();
                for (key, val) in entries {
                    map.insert(key, PropertyValue::from_json(val));
                }
                PropertyValue::Map(map)
            }
        }
    }

    /// Total order over values: `Null < Boolean < numbers < String < Array < Map`
    ///
    /// Integers and floats form one numeric class, so `Integer(2)` and
    /// `Float(2.0)` are equal under this order; `-0.0` equals `0.0` and NaN
    /// sorts above every other number. Maps compare by their (key, value)
    /// pairs sorted by key, making the order independent of insertion order.
    pub fn total_cmp(&self, other: &PropertyValue) -> Ordering {
        use PropertyValue::*;

        fn type_rank(value: &PropertyValue) -> u8 {
            match value {
                Null => 0,
                Boolean(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
                Array(_) => 4,
                Map(_) => 5,
            }
        }

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_numeric(*a, *b),
            (Integer(a), Float(b)) => cmp_numeric(*a as f64, *b),
            (Float(a), Integer(b)) => cmp_numeric(*a, *b as f64),
            (String(a), String(b)) => a.cmp(b),
            (Array(a), Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.total_cmp(y) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                }
                a.len().cmp(&b.len())
            }
            (Map(a), Map(b)) => {
                let mut left: Vec<_> = a.iter().collect();
                let mut right: Vec<_> = b.iter().collect();
                left.sort_by(|x, y| x.0.cmp(y.0));
                right.sort_by(|x, y| x.0.cmp(y.0));
                for ((ka, va), (kb, vb)) in left.iter().zip(right.iter()) {
                    match ka.cmp(kb) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                    match va.total_cmp(vb) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                }
                left.len().cmp(&right.len())
            }
            (a, b) => type_rank(a).cmp(&type_rank(b)),
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertyValue {}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(arr: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(arr)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(map: PropertyMap) -> Self {
        PropertyValue::Map(map)
    }
}

/// Numeric ordering shared by the value total order and the filter
/// comparators: `-0.0` equals `0.0`, NaN equals itself and sorts above every
/// other number
pub(crate) fn cmp_numeric(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ord) => ord,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}

/// Convert a JSON object into a property map
///
/// Returns `None` when the JSON value is not an object; anything other than a
/// structured mapping is an invalid entity payload.
pub fn map_from_json(value: serde_json::Value) -> Option<PropertyMap> {
    match PropertyValue::from_json(value) {
        PropertyValue::Map(map) => Some(map),
        _ => None,
    }
}
