//! Pagination types

use std::fmt;

/// One page of a paginated listing, 1-based with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    /// First index of the page
    pub from: u64,
    /// Last index of the page
    pub to: u64,
}

impl PageWindow {
    /// Create a new window
    pub fn new(from: u64, to: u64) -> Self {
        Self { from, to }
    }

    /// Number of items covered by the window
    pub fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    /// A window always covers at least one item
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Query string understood by the Unisphere iterator endpoint
    pub fn query(&self) -> String {
        format!("from={}&to={}", self.from, self.to)
    }
}

impl From<(u64, u64)> for PageWindow {
    fn from((from, to): (u64, u64)) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..={}]", self.from, self.to)
    }
}
