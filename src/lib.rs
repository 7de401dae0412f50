// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Array-XRay
//!
//! Point-in-time inventory of storage arrays, written as one table per
//! resource category.
//!
//! ## Backends
//!
//! - **SVC / FlashSystem**: CLI commands over SSH, comma-delimited output
//! - **VMAX / Symmetrix**: Unisphere REST, paged listings with per-item detail
//! - **VPLEX**: REST with wildcard paths returning expanded lists
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use array_xray::{load_config, Backend, Collector, Connector, MemorySink};
//!
//! let config = load_config("arrays.yaml")?;
//! let mut sink = MemorySink::new();
//!
//! for endpoint in &config.arrays {
//!     let connector = Connector::open(Backend::Vmax, endpoint, &config.settings).await?;
//!     Collector::new().collect(&mut sink, &connector).await?;
//!     connector.close().await?;
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │              Collector (identity step, then plan)            │
//! └──────────────────────────────────────────────────────────────┘
//!          │                        │                     │
//! ┌────────┴────────┐    ┌──────────┴─────────┐   ┌───────┴───────┐
//! │    Connector    │    │     Projection     │   │     Sink      │
//! ├─────────────────┤    ├────────────────────┤   ├───────────────┤
//! │ SVC  (SSH, CLI) │    │ Schema/FieldSpec   │   │ Workbook      │
//! │ VMAX (paged)    │    │ Required/Optional  │   │ Parquet       │
//! │ VPLEX (wildcard)│    │ GiB, fan-out, ...  │   │ Memory        │
//! └─────────────────┘    └────────────────────┘   └───────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// SSH command channel
pub mod transport;

/// Delimited text decoders
pub mod decode;

/// Page window planning
pub mod pagination;

/// Backend connectors and recursive expansion
pub mod connector;

/// Declarative field projection
pub mod projection;

/// Collection plans and orchestration
pub mod engine;

/// Workbook, Parquet and in-memory sinks
pub mod output;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{load_config, load_config_from_str, ArrayEndpoint, InventoryConfig, Settings};
pub use connector::{Connector, ResourceKind};
pub use engine::{CollectionStats, Collector};
pub use output::{MemorySink, OutputFormat, Sink};
pub use projection::{Cell, NormalizedRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
