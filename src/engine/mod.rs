//! Collection engine module
//!
//! Runs the plan of one array against its connector and hands the projected
//! records to a sink.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Collector` - runs a plan, tracks its state and statistics
//! - `Plan` - identity step plus ordered steps, one per backend
//! - `CollectionSession` - identity of the array, produced by the identity step
//!
//! The identity step runs first and must succeed. The array version is read
//! next and only logged. A connector error in a later step aborts the
//! remaining steps; records already saved stay saved. A record whose
//! projection fails is skipped with a warning.

mod plans;
mod types;

pub use types::{
    CollectionSession, CollectionState, CollectionStats, Gate, IdentityColumn, IdentitySource,
    IdentityStep, Plan, Step,
};

use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::output::Sink;
use crate::projection::{project_all, NormalizedRecord, Schema};
use crate::types::RawResource;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Collects the inventory of one array at a time
#[derive(Debug, Default)]
pub struct Collector {
    state: CollectionState,
    stats: CollectionStats,
}

impl Collector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the last collection
    pub fn state(&self) -> CollectionState {
        self.state
    }

    /// Statistics of the last collection
    pub fn stats(&self) -> &CollectionStats {
        &self.stats
    }

    /// Run the plan of `connector`'s backend, saving every record to `sink`
    pub async fn collect(&mut self, sink: &mut dyn Sink, connector: &Connector) -> Result<CollectionStats> {
        let start = Instant::now();
        let plan = Plan::for_backend(connector.backend());

        self.state = CollectionState::Running;
        self.stats = CollectionStats::new();
        info!("Beginning of data extraction {connector}");

        let result = self.run(plan, sink, connector).await;

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        match result {
            Ok(()) => {
                self.state = CollectionState::Done;
                info!(
                    "End of data extraction {connector}: {} record(s), {} skipped",
                    self.stats.records_saved, self.stats.skipped
                );
                Ok(self.stats.clone())
            }
            Err(e) => {
                self.state = CollectionState::Aborted;
                Err(e)
            }
        }
    }

    async fn run(&mut self, plan: &Plan, sink: &mut dyn Sink, connector: &Connector) -> Result<()> {
        let session = self.identify(&plan.identity, sink, connector).await?;
        self.stats.version = self.version(connector).await;
        let model = connector.vmax_model();

        for step in plan.steps {
            if !step.gate.allows(model) {
                debug!("Skip {} ({:?} only) on {connector}", step.category, step.gate);
                self.stats.add_gated();
                continue;
            }

            info!("- Extraction of {}", step.category);
            let raw = connector.list(step.kind).await?;
            for record in self.project(step.schema, step.category, &raw) {
                sink.save(step.category, &session.annotate(record))?;
                self.stats.add_records(1);
            }
            self.stats.add_step();
        }
        Ok(())
    }

    /// Run the identity step and build the session from its first record
    async fn identify(
        &mut self,
        step: &IdentityStep,
        sink: &mut dyn Sink,
        connector: &Connector,
    ) -> Result<CollectionSession> {
        info!("- Extraction of {}", step.category);

        let raw = match step.source {
            IdentitySource::System => vec![connector.system().await?],
            IdentitySource::List(kind) => connector.list(kind).await?,
        };

        let mut records = Vec::with_capacity(raw.len());
        for item in &raw {
            let projected = project_all(step.schema, item).map_err(|e| {
                Error::malformed(format!("{} of {connector}: {e}", step.schema.name))
            })?;
            records.extend(projected);
        }

        let identity = match step.column {
            Some(column) => {
                let value = records
                    .first()
                    .and_then(|record| record.get(column.source))
                    .cloned()
                    .ok_or_else(|| {
                        Error::malformed(format!("{connector} reports no '{}'", column.source))
                    })?;
                Some((column.label, value))
            }
            None => None,
        };

        for record in &records {
            sink.save(step.category, record)?;
        }
        self.stats.add_records(records.len());
        self.stats.add_step();

        Ok(CollectionSession::new(identity))
    }

    /// Version of the array; a failure here never aborts the collection
    async fn version(&self, connector: &Connector) -> Option<String> {
        match connector.version().await {
            Ok(Some(version)) => {
                info!("{connector} runs {version}");
                Some(version)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("No version from {connector}: {e}");
                None
            }
        }
    }

    /// Project every raw record, skipping those that do not fit the schema
    fn project(&mut self, schema: &Schema, category: &str, raw: &[RawResource]) -> Vec<NormalizedRecord> {
        let mut records = Vec::with_capacity(raw.len());
        for item in raw {
            match project_all(schema, item) {
                Ok(projected) => records.extend(projected),
                Err(e) => {
                    warn!("Skip a {} record of {category}: {e}", schema.name);
                    self.stats.add_skipped();
                }
            }
        }
        records
    }
}

#[cfg(test)]
mod tests;
