//! Delimited text decoders
//!
//! Both decoders keep every value as a JSON string. Quoting follows the usual
//! CSV convention: a quoted field may contain the delimiter, and `""` inside
//! quotes is a literal quote.

use super::types::RecordDecoder;
use crate::error::Result;
use serde_json::{Map, Value};

/// Separator requested from the SVC CLI with `-delim ,`
pub const DELIMITER: char = ',';

// ============================================================================
// Delimited Decoder
// ============================================================================

/// Listing decoder: first non-empty line is the header, each further line a
/// record keyed by the header names
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedDecoder;

impl DelimitedDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for DelimitedDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut lines = body.lines().filter(|line| !line.trim().is_empty());

        let headers = match lines.next() {
            Some(header_line) => parse_delimited_line(header_line, DELIMITER),
            None => return Ok(records),
        };

        for line in lines {
            let fields = parse_delimited_line(line, DELIMITER);
            let mut obj = Map::with_capacity(headers.len());

            // Short rows pad with empty text, extra trailing fields are dropped
            for (i, header) in headers.iter().enumerate() {
                let value = fields.get(i).cloned().unwrap_or_default();
                obj.insert(header.clone(), Value::String(value));
            }

            records.push(Value::Object(obj));
        }

        Ok(records)
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        let records = self.decode(body)?;
        Ok(Value::Array(records))
    }
}

// ============================================================================
// Key/Value Decoder
// ============================================================================

/// Vertical table decoder: each line is `key<delim>value`, no header
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueDecoder;

impl KeyValueDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for KeyValueDecoder {
    /// A key/value table is a single record
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        Ok(vec![self.decode_raw(body)?])
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        let mut obj = Map::new();

        for line in body.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = parse_delimited_line(line, DELIMITER).into_iter();
            let Some(key) = fields.next() else {
                continue;
            };
            let value = fields.next().unwrap_or_default();
            obj.insert(key, Value::String(value));
        }

        Ok(Value::Object(obj))
    }
}

/// Split one line into fields, honouring double quotes
fn parse_delimited_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    fields.push(current);
    fields
}
