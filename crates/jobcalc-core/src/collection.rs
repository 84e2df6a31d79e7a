//! # Named Collections
//!
//! [`Collection`] is the ordered label-to-value map behind every named
//! group of inputs (costs, margins, discounts, deductions, hours), plus the
//! `key=value[,key=value...]` grammar that builds one from a delimited
//! string.
//!
//! ## Grammar
//! ```text
//! records   separated by Delimiters::separator   (default ",")
//! record    key=value, split on the FIRST Delimiters::divider (default "=")
//! ```
//! Keys and values are trimmed of surrounding whitespace. Empty records
//! (a trailing separator, doubled separators) are skipped, and an empty or
//! blank input yields an empty collection. A record without a divider, or
//! with an empty key, fails with `InvalidEnvString`.
//!
//! Duplicate labels: the last value wins, and the label keeps its original
//! (first-seen) position.

use serde::{Deserialize, Serialize};

use crate::error::{CalcResult, JobCalcError};

// =============================================================================
// Delimiters
// =============================================================================

/// The pair of delimiters for parsing collection strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    /// Separates records. Default `,`.
    pub separator: String,
    /// Splits a record into key and value. Default `=`.
    pub divider: String,
}

impl Delimiters {
    pub fn new(separator: impl Into<String>, divider: impl Into<String>) -> Self {
        Delimiters {
            separator: separator.into(),
            divider: divider.into(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::new(",", "=")
    }
}

// =============================================================================
// Collection
// =============================================================================

/// An ordered mapping from a string label to a domain value.
///
/// Backed by a vec of pairs so iteration order is insertion order. Empty
/// collections are valid and contribute nothing to a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<V> {
    entries: Vec<(String, V)>,
}

impl<V> Collection<V> {
    pub fn new() -> Self {
        Collection { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a labeled value. An existing label is overwritten in place,
    /// keeping its position.
    pub fn insert(&mut self, label: impl Into<String>, value: V) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }
}

impl<V> Default for Collection<V> {
    fn default() -> Self {
        Collection::new()
    }
}

// =============================================================================
// Delimited-String Parsing
// =============================================================================

/// Parses a `key=value[,key=value...]` string into an ordered collection,
/// running each value through `parse_value`.
///
/// See the module docs for the exact grammar, trimming, and duplicate
/// policy. Value-parser failures propagate unchanged.
pub fn parse_env_dict<V, F>(
    raw: &str,
    delimiters: &Delimiters,
    parse_value: F,
) -> CalcResult<Collection<V>>
where
    F: Fn(&str) -> CalcResult<V>,
{
    let mut collection = Collection::new();

    for record in raw.split(delimiters.separator.as_str()) {
        let record = record.trim();
        if record.is_empty() {
            continue;
        }

        let (key, value) = record
            .split_once(delimiters.divider.as_str())
            .ok_or_else(|| JobCalcError::InvalidEnvString(raw.to_string()))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(JobCalcError::InvalidEnvString(raw.to_string()));
        }

        collection.insert(key, parse_value(value.trim())?);
    }

    Ok(collection)
}

// =============================================================================
// JSON Values
// =============================================================================

/// Extracts a list of values from a JSON collection field.
///
/// Accepts an array (elements in order) or an object (values in declaration
/// order); each scalar element may be a string or a number and goes through
/// `parse_value`. A field holding anything else is not a collection and
/// fails with `NotIterable`.
pub fn values_from_json<V, F>(
    field: &str,
    value: &serde_json::Value,
    parse_value: F,
) -> CalcResult<Vec<V>>
where
    F: Fn(&str) -> CalcResult<V>,
{
    use serde_json::Value;

    let scalar = |item: &Value| -> CalcResult<V> {
        match item {
            Value::String(s) => parse_value(s),
            Value::Number(n) => parse_value(&n.to_string()),
            other => Err(JobCalcError::InvalidNumber(other.to_string())),
        }
    };

    match value {
        Value::Array(items) => items.iter().map(scalar).collect(),
        Value::Object(map) => map.values().map(scalar).collect(),
        _ => Err(JobCalcError::NotIterable {
            field: field.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_currency, parse_percentage};

    fn identity(raw: &str) -> CalcResult<String> {
        Ok(raw.to_string())
    }

    #[test]
    fn test_parse_env_dict_ordered() {
        let dict = parse_env_dict("a=1,b=2", &Delimiters::default(), identity).unwrap();
        assert_eq!(dict.labels().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dict.get("a").unwrap(), "1");
        assert_eq!(dict.get("b").unwrap(), "2");
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_parse_env_dict_trims_and_skips_empty_records() {
        let dict = parse_env_dict(" a = 1 ,, b = 2 ,", &Delimiters::default(), identity).unwrap();
        assert_eq!(dict.labels().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dict.get("a").unwrap(), "1");

        let empty = parse_env_dict("   ", &Delimiters::default(), identity).unwrap();
        assert!(empty.is_empty());
        let empty = parse_env_dict("", &Delimiters::default(), identity).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_env_dict_malformed() {
        assert!(matches!(
            parse_env_dict("a=1,b", &Delimiters::default(), identity),
            Err(JobCalcError::InvalidEnvString(_))
        ));
        assert!(matches!(
            parse_env_dict("=1", &Delimiters::default(), identity),
            Err(JobCalcError::InvalidEnvString(_))
        ));
    }

    #[test]
    fn test_parse_env_dict_last_wins_keeps_position() {
        let dict =
            parse_env_dict("a=1,b=2,a=3", &Delimiters::default(), identity).unwrap();
        assert_eq!(dict.labels().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dict.get("a").unwrap(), "3");
    }

    #[test]
    fn test_parse_env_dict_custom_delimiters() {
        let delims = Delimiters::new(";", ":");
        let dict =
            parse_env_dict("standard:5;deluxe:10;premium:15", &delims, parse_percentage).unwrap();
        assert_eq!(
            dict.labels().collect::<Vec<_>>(),
            vec!["standard", "deluxe", "premium"]
        );
        assert_eq!(dict.get("deluxe").unwrap().bps(), 1_000);
    }

    #[test]
    fn test_parse_env_dict_typed_value_errors_propagate() {
        assert!(matches!(
            parse_env_dict("a=110", &Delimiters::default(), parse_percentage),
            Err(JobCalcError::PercentageOutOfRange(_))
        ));
        assert!(matches!(
            parse_env_dict("a=-5", &Delimiters::default(), parse_currency),
            Err(JobCalcError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_values_from_json() {
        let array: serde_json::Value = serde_json::json!(["100", 25.5]);
        let values = values_from_json("costs", &array, parse_currency).unwrap();
        assert_eq!(values[0].cents(), 10_000);
        assert_eq!(values[1].cents(), 2_550);

        let object: serde_json::Value = serde_json::json!({"labor": "100", "paint": "25"});
        let values = values_from_json("costs", &object, parse_currency).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].cents(), 10_000);

        let scalar: serde_json::Value = serde_json::json!("100");
        assert!(matches!(
            values_from_json("costs", &scalar, parse_currency),
            Err(JobCalcError::NotIterable { field }) if field == "costs"
        ));
    }

    #[test]
    fn test_collection_insert_and_get() {
        let mut collection: Collection<i64> = Collection::new();
        collection.insert("a", 1);
        collection.insert("b", 2);
        collection.insert("a", 3);
        assert_eq!(collection.get("a"), Some(&3));
        assert_eq!(collection.get("missing"), None);
        assert_eq!(collection.values().copied().collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(
            collection.iter().collect::<Vec<_>>(),
            vec![("a", &3), ("b", &2)]
        );
    }
}
