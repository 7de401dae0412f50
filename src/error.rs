//! Error types for Array-XRay
//!
//! This module defines the error hierarchy for the whole inventory pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-record projection failures are not part of this hierarchy: they live in
//! [`crate::projection::ProjectionError`] because they never abort a collection.

use thiserror::Error;

/// The main error type for Array-XRay
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field '{field}' in section '{section}'")]
    MissingConfigField { section: String, field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Connection Errors
    // ============================================================================
    #[error("Authentication failed on {target}: {message}")]
    Authentication { target: String, message: String },

    #[error("Timeout reached on {target} after {timeout_ms}ms")]
    Timeout { target: String, timeout_ms: u64 },

    #[error("Connection to {target} failed: {message}")]
    Connection { target: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Backend Errors
    // ============================================================================
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("The SID {sym_id} doesn't match with any VMAX array model")]
    UnknownModel { sym_id: String },

    #[error("Resource '{resource}' is not available on {backend}")]
    UnsupportedResource { backend: String, resource: String },

    #[error("Invalid page range: start={start} end={end} page_size={page_size}")]
    InvalidPageRange { start: u64, end: u64, page_size: u64 },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            section: section.into(),
            field: field.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Errors raised while talking to an array (authentication, timeout,
    /// transport). The caller skips the array and goes on with the next one.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Error::Authentication { .. }
                | Error::Timeout { .. }
                | Error::Connection { .. }
                | Error::Http(_)
                | Error::HttpStatus { .. }
                | Error::Ssh(_)
        )
    }

    /// Errors that end the whole run: bad configuration or a sink that
    /// cannot be created or written.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingConfigField { .. }
                | Error::YamlParse(_)
                | Error::Output { .. }
                | Error::Workbook(_)
                | Error::Arrow(_)
                | Error::Parquet(_)
                | Error::Io(_)
        )
    }
}

/// Result type alias for Array-XRay
pub type Result<T> = std::result::Result<T, Error>;
