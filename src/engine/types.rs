//! Engine types
//!
//! Plans, sessions and statistics of a collection run.

use crate::connector::{ResourceKind, VmaxModel};
use crate::projection::{Cell, NormalizedRecord, Schema};
use std::fmt;

/// Sub-variant condition of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Run on every array
    Always,
    /// VMAX-2 arrays only
    Vmax2,
    /// VMAX-3 arrays only
    Vmax3,
}

impl Gate {
    /// Whether a step with this gate runs on an array of `model`
    pub fn allows(self, model: Option<VmaxModel>) -> bool {
        match self {
            Gate::Always => true,
            Gate::Vmax2 => model == Some(VmaxModel::Vmax2),
            Gate::Vmax3 => model == Some(VmaxModel::Vmax3),
        }
    }
}

/// One annotated collection step
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Sink category (sheet name)
    pub category: &'static str,
    /// Resource listed by the connector
    pub kind: ResourceKind,
    /// Projection of each listed record
    pub schema: &'static Schema,
    /// Sub-variant condition
    pub gate: Gate,
}

/// Where the identity step reads its records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// The array-level description record
    System,
    /// Every record of a listing
    List(ResourceKind),
}

/// Identity column prefixed to every annotated record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityColumn {
    /// Label of the added column
    pub label: &'static str,
    /// Projected column holding the value
    pub source: &'static str,
}

/// First step of every plan
#[derive(Debug, Clone, Copy)]
pub struct IdentityStep {
    /// Sink category (sheet name)
    pub category: &'static str,
    /// Where the records come from
    pub source: IdentitySource,
    /// Projection of the identity records
    pub schema: &'static Schema,
    /// Column prefixed to later records, `None` when records carry their own
    pub column: Option<IdentityColumn>,
}

/// Ordered steps of one backend
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    /// Runs first and produces the session
    pub identity: IdentityStep,
    /// Run in order once the session exists
    pub steps: &'static [Step],
}

/// Identity of the array being collected.
///
/// Only the engine creates sessions, from the result of an identity step, so
/// an annotating step cannot run before the identity is known.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSession {
    /// Label and value put first in every later record, if any
    identity: Option<(&'static str, Cell)>,
}

impl CollectionSession {
    pub(crate) fn new(identity: Option<(&'static str, Cell)>) -> Self {
        Self { identity }
    }

    /// `record` with the identity as its first field
    pub fn annotate(&self, record: NormalizedRecord) -> NormalizedRecord {
        match &self.identity {
            Some((label, value)) => NormalizedRecord::with_identity(label, value.clone(), record),
            None => record,
        }
    }
}

/// State of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionState {
    /// Not started
    #[default]
    Idle,
    /// Steps are running
    Running,
    /// Every step ran
    Done,
    /// A step failed; later steps did not run
    Aborted,
}

impl fmt::Display for CollectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionState::Idle => write!(f, "idle"),
            CollectionState::Running => write!(f, "running"),
            CollectionState::Done => write!(f, "done"),
            CollectionState::Aborted => write!(f, "aborted"),
        }
    }
}

/// Statistics from a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Records handed to the sink
    pub records_saved: usize,
    /// Raw records dropped because their projection failed
    pub skipped: usize,
    /// Steps run, identity included
    pub steps_run: usize,
    /// Steps skipped by their gate
    pub steps_gated: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Firmware or API version reported by the array
    pub version: Option<String>,
}

impl CollectionStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add saved records
    pub fn add_records(&mut self, count: usize) {
        self.records_saved += count;
    }

    /// Add a skipped record
    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Add a step
    pub fn add_step(&mut self) {
        self.steps_run += 1;
    }

    /// Add a gated step
    pub fn add_gated(&mut self) {
        self.steps_gated += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
