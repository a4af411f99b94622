use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::Value as JsonValue;

use crate::error::{GtexError, Result};

// ---------------------------------------------------------------------------
// FieldValue – a single scalar (or nested list) drawn from a row
// ---------------------------------------------------------------------------

/// A dynamically-typed field value, used where data enters the core without
/// a fixed schema (JSON reports, word lists). Tables loaded from TSV stay
/// plain strings.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<FieldValue>),
    Null,
}

// -- Manual Eq/Ord so a FieldValue can sit in a BTreeSet --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                List(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (List(a), List(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Infer the narrowest type for a bare token: integer, float, bool, text.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return FieldValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return FieldValue::Float(f);
        }
        if s == "true" || s == "false" {
            return FieldValue::Bool(s == "true");
        }
        FieldValue::Text(s.to_string())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&JsonValue> for FieldValue {
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => FieldValue::Text(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::Text(n.to_string())
                }
            }
            JsonValue::Bool(b) => FieldValue::Bool(*b),
            JsonValue::Null => FieldValue::Null,
            JsonValue::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl PartialEq<str> for FieldValue {
    fn eq(&self, other: &str) -> bool {
        matches!(self, FieldValue::Text(s) if s == other)
    }
}

// ---------------------------------------------------------------------------
// Numeric capability
// ---------------------------------------------------------------------------

/// Values that may be read as a number for statistics.
pub trait AsNumber {
    /// `None` when the value is not an integer or floating-point number.
    fn as_number(&self) -> Option<f64>;
}

impl AsNumber for i64 {
    fn as_number(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl AsNumber for u64 {
    fn as_number(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl AsNumber for i32 {
    fn as_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl AsNumber for f64 {
    fn as_number(&self) -> Option<f64> {
        Some(*self)
    }
}

impl AsNumber for FieldValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence capability
// ---------------------------------------------------------------------------

/// An ordered, indexable, fixed-length collection.
///
/// Slices, arrays and vectors are sequences by construction. [`Container`]
/// is the runtime boundary for data whose shape is only known after parsing.
pub trait Sequence {
    type Item;

    /// The elements in order, or `InvalidArgument` for unordered containers.
    fn elements(&self) -> Result<&[Self::Item]>;
}

impl<T> Sequence for [T] {
    type Item = T;

    fn elements(&self) -> Result<&[T]> {
        Ok(self)
    }
}

impl<T, const N: usize> Sequence for [T; N] {
    type Item = T;

    fn elements(&self) -> Result<&[T]> {
        Ok(&self[..])
    }
}

impl<T> Sequence for Vec<T> {
    type Item = T;

    fn elements(&self) -> Result<&[T]> {
        Ok(&self[..])
    }
}

/// A parsed collection of unknown shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    List(Vec<FieldValue>),
    Set(BTreeSet<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    Scalar(FieldValue),
}

impl Container {
    fn shape(&self) -> &'static str {
        match self {
            Container::List(_) => "list",
            Container::Set(_) => "set",
            Container::Map(_) => "mapping",
            Container::Scalar(_) => "scalar",
        }
    }
}

impl Sequence for Container {
    type Item = FieldValue;

    fn elements(&self) -> Result<&[FieldValue]> {
        match self {
            Container::List(items) => Ok(items.as_slice()),
            other => Err(GtexError::invalid_argument(format!(
                "expected an ordered sequence, got a {}",
                other.shape()
            ))),
        }
    }
}

impl From<JsonValue> for Container {
    fn from(val: JsonValue) -> Self {
        match val {
            JsonValue::Array(items) => Container::List(items.iter().map(FieldValue::from).collect()),
            JsonValue::Object(obj) => Container::Map(
                obj.iter()
                    .map(|(key, v)| (key.clone(), FieldValue::from(v)))
                    .collect(),
            ),
            other => Container::Scalar(FieldValue::from(&other)),
        }
    }
}

// ---------------------------------------------------------------------------
// IndexedEntry – a value tagged with where it came from
// ---------------------------------------------------------------------------

/// A value paired with its 0-based offset in the sequence it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEntry<T> {
    pub value: T,
    pub position: usize,
}

// ---------------------------------------------------------------------------
// Table – header plus rows, as yielded by the loader
// ---------------------------------------------------------------------------

/// One tab-separated table: a header and rows of fields in header order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { header, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GroupCounts – one entry of a grouped count collection
// ---------------------------------------------------------------------------

/// A group label with the read counts of its members that had expression data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCounts {
    pub label: String,
    pub counts: Vec<i64>,
}

impl GroupCounts {
    pub fn new(label: impl Into<String>, counts: Vec<i64>) -> Self {
        GroupCounts { label: label.into(), counts }
    }
}

impl TryFrom<&FieldValue> for GroupCounts {
    type Error = GtexError;

    /// Convert a `[label, [count, ...]]` entry; a label-only entry has no counts.
    fn try_from(entry: &FieldValue) -> Result<Self> {
        let FieldValue::List(items) = entry else {
            return Err(GtexError::type_wrong(format!("group entry {entry} is not a [label, counts] list")));
        };
        let label = match items.first() {
            Some(FieldValue::Text(label)) => label.clone(),
            Some(other) => return Err(GtexError::type_wrong(format!("group label {other} is not a string"))),
            None => return Err(GtexError::type_wrong("group entry is empty")),
        };
        let counts = match items.get(1) {
            None => Vec::new(),
            Some(FieldValue::List(values)) => values
                .iter()
                .map(|v| match v {
                    FieldValue::Integer(i) => Ok(*i),
                    other => Err(GtexError::type_wrong(format!("count {other} in group '{label}' is not an integer"))),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => return Err(GtexError::type_wrong(format!("counts {other} of group '{label}' are not a list"))),
        };
        Ok(GroupCounts { label, counts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_json_array_becomes_list() {
        let json: JsonValue = serde_json::from_str(r#"[["Blood", [1, 2.5]], "x"]"#).unwrap();
        let container = Container::from(json);
        let items = container.elements().unwrap();
        assert_eq!(
            items[0],
            FieldValue::List(vec![
                FieldValue::from("Blood"),
                FieldValue::List(vec![FieldValue::Integer(1), FieldValue::Float(2.5)]),
            ])
        );
        assert_eq!(items[1], FieldValue::from("x"));
    }

    #[test]
    fn test_unordered_containers_are_rejected() {
        let json: JsonValue = serde_json::from_str(r#"{"should": 1, "work": 3}"#).unwrap();
        let err = Container::from(json).elements().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let set = Container::Set(["hello", "world"].into_iter().map(FieldValue::from).collect());
        assert_eq!(set.elements().unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_guess() {
        assert_eq!(FieldValue::guess("2"), FieldValue::Integer(2));
        assert_eq!(FieldValue::guess("2.5"), FieldValue::Float(2.5));
        assert_eq!(FieldValue::guess("true"), FieldValue::Bool(true));
        assert_eq!(FieldValue::guess("CRTW"), FieldValue::from("CRTW"));
        assert_eq!(FieldValue::guess(""), FieldValue::Null);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(FieldValue::Integer(3).as_number(), Some(3.0));
        assert_eq!(FieldValue::Float(1.5).as_number(), Some(1.5));
        assert_eq!(FieldValue::from("3").as_number(), None);
        assert_eq!(FieldValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_group_counts_from_entry() {
        let json: JsonValue = serde_json::from_str(r#"["Blood", [5, 9]]"#).unwrap();
        let group = GroupCounts::try_from(&FieldValue::from(&json)).unwrap();
        assert_eq!(group, GroupCounts::new("Blood", vec![5, 9]));

        let label_only = FieldValue::List(vec![FieldValue::from("Brain")]);
        assert!(GroupCounts::try_from(&label_only).unwrap().counts.is_empty());

        let floats: JsonValue = serde_json::from_str(r#"["Blood", [5.5]]"#).unwrap();
        let err = GroupCounts::try_from(&FieldValue::from(&floats)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeWrong);
    }

    #[test]
    fn test_display_list() {
        let v = FieldValue::List(vec![FieldValue::from("a"), FieldValue::Integer(2)]);
        assert_eq!(v.to_string(), "[a, 2]");
    }
}
