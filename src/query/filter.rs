//! Search filters over property mappings
//!
//! A filter is a (field path, condition, comparison value) triple. Field
//! paths are dot-delimited and resolve through nested mappings; conditions
//! form a closed set so every variant is handled exhaustively.

use crate::graph::{GraphError, PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Closed set of search conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchCondition {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Contains,
    StartsWith,
    EndsWith,
}

impl SearchCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCondition::Equals => "Equals",
            SearchCondition::NotEquals => "NotEquals",
            SearchCondition::GreaterThan => "GreaterThan",
            SearchCondition::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
            SearchCondition::LessThan => "LessThan",
            SearchCondition::LessThanOrEqualTo => "LessThanOrEqualTo",
            SearchCondition::Contains => "Contains",
            SearchCondition::StartsWith => "StartsWith",
            SearchCondition::EndsWith => "EndsWith",
        }
    }
}

impl fmt::Display for SearchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchCondition {
    type Err = GraphError;

    /// Parse a driver-supplied condition name
    ///
    /// This is the point where free text meets the closed condition set, and
    /// the only source of `InvalidFilterCondition`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Equals" => Ok(SearchCondition::Equals),
            "NotEquals" => Ok(SearchCondition::NotEquals),
            "GreaterThan" => Ok(SearchCondition::GreaterThan),
            "GreaterThanOrEqualTo" => Ok(SearchCondition::GreaterThanOrEqualTo),
            "LessThan" => Ok(SearchCondition::LessThan),
            "LessThanOrEqualTo" => Ok(SearchCondition::LessThanOrEqualTo),
            "Contains" => Ok(SearchCondition::Contains),
            "StartsWith" => Ok(SearchCondition::StartsWith),
            "EndsWith" => Ok(SearchCondition::EndsWith),
            other => Err(GraphError::InvalidFilterCondition(other.to_string())),
        }
    }
}

/// A single search filter, constructed per query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Dot-delimited path addressing a property, possibly nested
    pub field: String,

    /// Condition applied to the resolved value
    pub condition: SearchCondition,

    /// Comparison value in string form, interpreted per condition
    pub value: String,
}

impl SearchFilter {
    pub fn new(
        field: impl Into<String>,
        condition: SearchCondition,
        value: impl Into<String>,
    ) -> Self {
        SearchFilter {
            field: field.into(),
            condition,
            value: value.into(),
        }
    }
}

/// Walk a dot-delimited field path through a property mapping
///
/// Returns `None` when any segment is missing or an intermediate value is
/// not itself a mapping.
pub fn resolve<'a>(properties: &'a PropertyMap, path: &str) -> Option<&'a PropertyValue> {
    let mut segments = path.split('.');
    let mut current = properties.get(segments.next()?)?;
    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}

/// Evaluate a filter against an entity's property mapping
///
/// An absent field satisfies only `NotEquals`: absence is unequal to any
/// concrete comparison value, and every other condition has nothing to
/// compare against.
pub fn evaluate(properties: &PropertyMap, filter: &SearchFilter) -> bool {
    match resolve(properties, &filter.field) {
        None => matches!(filter.condition, SearchCondition::NotEquals),
        Some(value) => apply(filter.condition, value, &filter.value),
    }
}

fn apply(condition: SearchCondition, value: &PropertyValue, target: &str) -> bool {
    use SearchCondition::*;

    match condition {
        Equals => value.to_text() == target,
        NotEquals => value.to_text() != target,
        GreaterThan => compare(value, target) == Ordering::Greater,
        GreaterThanOrEqualTo => compare(value, target) != Ordering::Less,
        LessThan => compare(value, target) == Ordering::Less,
        LessThanOrEqualTo => compare(value, target) != Ordering::Greater,
        Contains => value.to_text().contains(target),
        StartsWith => value.to_text().starts_with(target),
        EndsWith => value.to_text().ends_with(target),
    }
}

/// Ordering used by the GreaterThan/LessThan family
///
/// Numeric when both the resolved value and the comparison value read as
/// numbers; lexicographic on the string forms otherwise.
fn compare(value: &PropertyValue, target: &str) -> Ordering {
    match (value.as_number(), target.trim().parse::<f64>().ok()) {
        (Some(left), Some(right)) => crate::graph::property::cmp_numeric(left, right),
        _ => value.to_text().as_str().cmp(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(payload: serde_json::Value) -> PropertyMap {
        crate::graph::map_from_json(payload).unwrap()
    }

    #[test]
    fn test_condition_parsing() {
        assert_eq!(
            "GreaterThanOrEqualTo".parse::<SearchCondition>().unwrap(),
            SearchCondition::GreaterThanOrEqualTo
        );
        let err = "Sideways".parse::<SearchCondition>().unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidFilterCondition("Sideways".to_string())
        );
    }

    #[test]
    fn test_resolve_nested_paths() {
        let map = props(json!({
            "name": "Alice",
            "address": { "city": "Oslo", "geo": { "lat": 59.9 } }
        }));

        assert_eq!(resolve(&map, "name").unwrap().as_str(), Some("Alice"));
        assert_eq!(
            resolve(&map, "address.city").unwrap().as_str(),
            Some("Oslo")
        );
        assert_eq!(
            resolve(&map, "address.geo.lat").unwrap().as_float(),
            Some(59.9)
        );

        // Missing segment, and traversal through a non-mapping.
        assert!(resolve(&map, "address.zip").is_none());
        assert!(resolve(&map, "name.first").is_none());
        assert!(resolve(&map, "missing").is_none());
    }

    #[test]
    fn test_absent_field_only_satisfies_not_equals() {
        let map = props(json!({"name": "Alice"}));

        for condition in [
            SearchCondition::Equals,
            SearchCondition::GreaterThan,
            SearchCondition::GreaterThanOrEqualTo,
            SearchCondition::LessThan,
            SearchCondition::LessThanOrEqualTo,
            SearchCondition::Contains,
            SearchCondition::StartsWith,
            SearchCondition::EndsWith,
        ] {
            let filter = SearchFilter::new("ghost", condition, "x");
            assert!(!evaluate(&map, &filter), "{condition} matched absent field");
        }

        let filter = SearchFilter::new("ghost", SearchCondition::NotEquals, "x");
        assert!(evaluate(&map, &filter));
    }

    #[test]
    fn test_equals_uses_text_form() {
        let map = props(json!({"age": 30, "score": 99.5, "flag": true}));

        assert!(evaluate(&map, &SearchFilter::new("age", SearchCondition::Equals, "30")));
        assert!(evaluate(&map, &SearchFilter::new("score", SearchCondition::Equals, "99.5")));
        assert!(evaluate(&map, &SearchFilter::new("flag", SearchCondition::Equals, "true")));
        assert!(!evaluate(&map, &SearchFilter::new("age", SearchCondition::Equals, "31")));
    }

    #[test]
    fn test_numeric_comparison_when_both_sides_numeric() {
        let map = props(json!({"age": "9"}));

        // Numerically 9 < 35; lexicographically "9" > "35". The numeric
        // reading wins when both sides parse.
        assert!(!evaluate(
            &map,
            &SearchFilter::new("age", SearchCondition::GreaterThan, "35")
        ));
        assert!(evaluate(
            &map,
            &SearchFilter::new("age", SearchCondition::LessThan, "35")
        ));
    }

    #[test]
    fn test_lexicographic_fallback() {
        let map = props(json!({"name": "delta"}));

        assert!(evaluate(
            &map,
            &SearchFilter::new("name", SearchCondition::GreaterThan, "alpha")
        ));
        assert!(!evaluate(
            &map,
            &SearchFilter::new("name", SearchCondition::GreaterThan, "zulu")
        ));
        assert!(evaluate(
            &map,
            &SearchFilter::new("name", SearchCondition::GreaterThanOrEqualTo, "delta")
        ));
    }

    #[test]
    fn test_string_operators() {
        let map = props(json!({"name": "Alexandra"}));

        assert!(evaluate(&map, &SearchFilter::new("name", SearchCondition::Contains, "exan")));
        assert!(evaluate(&map, &SearchFilter::new("name", SearchCondition::StartsWith, "Alex")));
        assert!(evaluate(&map, &SearchFilter::new("name", SearchCondition::EndsWith, "dra")));
        assert!(!evaluate(&map, &SearchFilter::new("name", SearchCondition::Contains, "zzz")));
    }

    #[test]
    fn test_string_operators_on_numbers_use_text_form() {
        let map = props(json!({"code": 40412}));
        assert!(evaluate(&map, &SearchFilter::new("code", SearchCondition::StartsWith, "404")));
        assert!(evaluate(&map, &SearchFilter::new("code", SearchCondition::Contains, "041")));
    }
}
