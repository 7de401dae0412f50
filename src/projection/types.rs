//! Projection types
//!
//! A [`Schema`] is data: an ordered list of [`FieldSpec`]s read by one
//! generic projector. The result is a [`NormalizedRecord`] whose field order
//! is the schema order.

use crate::types::JsonValue;
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Cells and Records
// ============================================================================

/// A single typed value of a normalized record
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text, the default for backend values
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Bool(bool),
}

impl Cell {
    /// Empty text, used for absent optional fields
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    /// Convert a backend scalar. Lists are joined with `", "`, `null` is
    /// empty text and objects keep their JSON form.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Cell::empty(),
            JsonValue::Bool(b) => Cell::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Cell::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    i64::try_from(u).map_or(Cell::Float(u as f64), Cell::Integer)
                } else {
                    Cell::Float(n.as_f64().unwrap_or_default())
                }
            }
            JsonValue::String(s) => Cell::Text(s.clone()),
            JsonValue::Array(items) => Cell::Text(
                items
                    .iter()
                    .map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            JsonValue::Object(_) => Cell::Text(value.to_string()),
        }
    }

    /// Rendered width in characters
    pub fn width(&self) -> usize {
        self.to_string().chars().count()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

/// Text form of a list element
pub(crate) fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Ordered mapping from column label to value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedRecord {
    fields: IndexMap<String, Cell>,
}

impl NormalizedRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field (replacing the value of an existing label in place)
    pub fn push(&mut self, label: impl Into<String>, cell: impl Into<Cell>) {
        self.fields.insert(label.into(), cell.into());
    }

    /// Copy of `record` with `label = value` as its first field
    pub fn with_identity(label: &str, value: Cell, record: NormalizedRecord) -> Self {
        let mut fields = IndexMap::with_capacity(record.fields.len() + 1);
        fields.insert(label.to_string(), value);
        for (key, cell) in record.fields {
            if key != label {
                fields.insert(key, cell);
            }
        }
        Self { fields }
    }

    /// Value of `label`
    pub fn get(&self, label: &str) -> Option<&Cell> {
        self.fields.get(label)
    }

    /// Column labels, in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Values, in column order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.fields.values()
    }

    /// `(label, value)` pairs, in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// Schemas
// ============================================================================

/// How a source key becomes a column label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Keep the key as is
    Same,
    /// First character upper-cased, the rest lower-cased
    Capitalized,
    /// Fixed label
    Named(&'static str),
}

/// How one element of a joined list is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    /// The element itself
    Scalar,
    /// One key of an object element
    Field(&'static str),
    /// Two keys of an object element, as `a:b`
    Pair(&'static str, &'static str),
}

/// How a value is read from the raw record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Copy; missing is an error
    Required,
    /// Copy if present, else empty text
    Optional,
    /// Byte count to whole gibibytes, label suffixed with `_GB`
    Gibibytes,
    /// Copy `raw[source][key]`; missing is an error
    Nested(&'static str),
    /// List joined with `", "`; absent is empty text
    Joined(Member),
    /// Segment `n` of `raw[source]` split on `/`
    PathSegment(usize),
    /// Position `n` of the current fan-out tuple
    Member(usize),
}

/// One column of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the raw record
    pub source: &'static str,
    /// Column label
    pub label: Label,
    /// Extraction rule
    pub rule: Rule,
}

impl FieldSpec {
    /// Create a field spec
    pub const fn new(source: &'static str, label: Label, rule: Rule) -> Self {
        Self {
            source,
            label,
            rule,
        }
    }
}

/// Ordered field list of one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Resource name, used in log messages
    pub name: &'static str,
    /// Columns, in output order
    pub fields: &'static [FieldSpec],
    /// List whose members each produce one record
    pub fan_out: Option<&'static str>,
}

// ============================================================================
// Errors
// ============================================================================

/// Why a raw record could not be projected. The record is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' is malformed: {message}")]
    Malformed { field: String, message: String },
}

impl ProjectionError {
    /// Create a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a malformed field error
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
            message: message.into(),
        }
    }
}
