//! Field projection module
//!
//! Turns backend-shaped records into ordered, typed rows.
//!
//! # Overview
//!
//! The projection module provides:
//! - `Schema` / `FieldSpec` - declarative column lists, one per resource kind
//! - `project` / `project_all` - the generic projector
//! - `NormalizedRecord` - the ordered row handed to a sink
//! - `svc`, `vmax`, `vplex` - the schemas of each backend

mod projector;
mod types;

pub mod svc;
pub mod vmax;
pub mod vplex;

pub use projector::{capitalize, project, project_all};
pub use types::{Cell, FieldSpec, Label, Member, NormalizedRecord, ProjectionError, Rule, Schema};
