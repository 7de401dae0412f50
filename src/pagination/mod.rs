//! Pagination module
//!
//! Plans the page windows used to walk a server-side iterator.
//!
//! # Overview
//!
//! Unisphere returns large listings through an iterator resource that is read
//! page by page with `?from=N&to=M` (1-based, inclusive). The planner computes
//! the ordered, disjoint windows covering `[1, count]` for a given page size.

mod planner;
mod types;

pub use planner::{plan, PageWindows};
pub use types::PageWindow;

#[cfg(test)]
mod tests;
