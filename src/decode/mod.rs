//! Command output decoder module
//!
//! Supports: delimited listings with a header row, two-column key/value tables
//!
//! # Overview
//!
//! The SVC CLI answers `ls*` commands with `-delim ,` text. Listings carry a
//! header row and become one object per data row; `lssystem` and single-item
//! queries are vertical `key,value` tables and become a single object. Every
//! value is kept as text: the projector decides how to read it.

mod delimited;
mod types;

pub use delimited::{DelimitedDecoder, KeyValueDecoder};
pub use types::RecordDecoder;
