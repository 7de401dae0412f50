//! Generic field projector
//!
//! Interprets a [`Schema`] against one raw record. The raw record is only
//! read, never modified.

use super::types::{scalar_text, Cell, FieldSpec, Label, Member, NormalizedRecord, ProjectionError, Rule, Schema};
use crate::types::{JsonValue, RawResource};
use regex::Regex;
use std::sync::LazyLock;

/// Byte count as sent by the backends: digits, optionally followed by `B`
static BYTES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*B?\s*$").unwrap());

const GIBIBYTE: u64 = 1 << 30;

type ProjectionResult<T> = std::result::Result<T, ProjectionError>;

/// Project `raw` into a single record.
///
/// `Member` rules fail here: they only make sense under [`project_all`] with
/// a fan-out schema.
pub fn project(schema: &Schema, raw: &RawResource) -> ProjectionResult<NormalizedRecord> {
    project_with(schema, raw, None)
}

/// Project `raw` into every record it yields: one per fan-out member, or a
/// single record when the schema has no fan-out.
pub fn project_all(schema: &Schema, raw: &RawResource) -> ProjectionResult<Vec<NormalizedRecord>> {
    let Some(list) = schema.fan_out else {
        return Ok(vec![project_with(schema, raw, None)?]);
    };

    let members = match raw.get(list) {
        None => return Err(ProjectionError::missing(list)),
        Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(ProjectionError::malformed(
                list,
                format!("expected a list, got {other}"),
            ))
        }
    };

    members
        .iter()
        .map(|member| {
            let tuple = parse_tuple(member).ok_or_else(|| {
                ProjectionError::malformed(list, format!("unexpected member {member}"))
            })?;
            project_with(schema, raw, Some(&tuple))
        })
        .collect()
}

fn project_with(
    schema: &Schema,
    raw: &RawResource,
    tuple: Option<&[String]>,
) -> ProjectionResult<NormalizedRecord> {
    let mut record = NormalizedRecord::new();

    for spec in schema.fields {
        let cell = extract(spec, raw, tuple)?;
        record.push(label_of(spec), cell);
    }

    Ok(record)
}

fn extract(spec: &FieldSpec, raw: &RawResource, tuple: Option<&[String]>) -> ProjectionResult<Cell> {
    let source = spec.source;

    match spec.rule {
        Rule::Required => raw
            .get(source)
            .map(Cell::from_json)
            .ok_or_else(|| ProjectionError::missing(source)),

        Rule::Optional => Ok(raw.get(source).map_or_else(Cell::empty, Cell::from_json)),

        Rule::Gibibytes => {
            let value = raw.get(source).ok_or_else(|| ProjectionError::missing(source))?;
            let bytes = parse_bytes(value)
                .ok_or_else(|| ProjectionError::malformed(source, format!("not a byte count: {value}")))?;
            Ok(Cell::Integer((bytes / GIBIBYTE) as i64))
        }

        Rule::Nested(key) => raw
            .get(source)
            .and_then(|inner| inner.get(key))
            .map(Cell::from_json)
            .ok_or_else(|| ProjectionError::missing(format!("{source}.{key}"))),

        Rule::Joined(member) => match raw.get(source) {
            None | Some(JsonValue::Null) => Ok(Cell::empty()),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| render_member(item, member, source))
                .collect::<ProjectionResult<Vec<_>>>()
                .map(|parts| Cell::Text(parts.join(", "))),
            Some(other) => Err(ProjectionError::malformed(
                source,
                format!("expected a list, got {other}"),
            )),
        },

        Rule::PathSegment(n) => {
            let path = raw
                .get(source)
                .ok_or_else(|| ProjectionError::missing(source))?
                .as_str()
                .ok_or_else(|| ProjectionError::malformed(source, "not a path"))?;
            path.split('/')
                .nth(n)
                .map(Cell::from)
                .ok_or_else(|| ProjectionError::malformed(source, format!("no segment {n} in '{path}'")))
        }

        Rule::Member(n) => tuple
            .and_then(|members| members.get(n))
            .map(|member| Cell::Text(member.clone()))
            .ok_or_else(|| ProjectionError::malformed(source, format!("no member {n}"))),
    }
}

fn render_member(item: &JsonValue, member: Member, source: &str) -> ProjectionResult<String> {
    let field = |key: &str| {
        item.get(key)
            .map(scalar_text)
            .ok_or_else(|| ProjectionError::missing(format!("{source}[].{key}")))
    };

    match member {
        Member::Scalar => Ok(scalar_text(item)),
        Member::Field(key) => field(key),
        Member::Pair(first, second) => Ok(format!("{}:{}", field(first)?, field(second)?)),
    }
}

fn label_of(spec: &FieldSpec) -> String {
    let label = match spec.label {
        Label::Same => spec.source.to_string(),
        Label::Capitalized => capitalize(spec.source),
        Label::Named(name) => name.to_string(),
    };

    match spec.rule {
        Rule::Gibibytes => format!("{label}_GB"),
        _ => label,
    }
}

/// First character upper-cased, the rest lower-cased: `IO_group_id` gives
/// `Io_group_id`
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Whole bytes from a number or a string such as `10737418240B`
fn parse_bytes(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        JsonValue::String(s) => BYTES_REGEX
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse().ok()),
        _ => None,
    }
}

/// Split a `(a,b,c,d)` member into its parts
fn parse_tuple(member: &JsonValue) -> Option<Vec<String>> {
    match member {
        JsonValue::String(s) => Some(
            s.trim_start_matches('(')
                .trim_end_matches(')')
                .split(',')
                .map(str::to_string)
                .collect(),
        ),
        JsonValue::Array(items) => Some(items.iter().map(scalar_text).collect()),
        _ => None,
    }
}
