//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use serde_json::Value;

/// Trait for decoding command output into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the output into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Decode the output into a single JSON value
    fn decode_raw(&self, body: &str) -> Result<Value>;
}
