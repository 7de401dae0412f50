//! Output module
//!
//! Sinks receive normalized records partitioned by resource category.
//!
//! # Overview
//!
//! This module provides:
//! - `Sink` - the single-writer destination of a collection run
//! - `WorkbookSink` - one Excel worksheet per category
//! - `ParquetSink` - one Parquet file per category
//! - `MemorySink` - keeps records in memory
//! - Arrow schema inference from normalized records

mod schema;
mod workbook;
mod writer;

pub use schema::{infer_schema, records_to_arrow};
pub use workbook::WorkbookSink;
pub use writer::{ParquetSink, ParquetWriter};

use crate::error::{Error, Result};
use crate::projection::NormalizedRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Destination of normalized records.
///
/// The header of a category is taken from the labels of the first record
/// saved to it. Any error is fatal for the run.
pub trait Sink {
    /// Append `record` to `category`
    fn save(&mut self, category: &str, record: &NormalizedRecord) -> Result<()>;

    /// Flush everything to its final destination
    fn finish(&mut self) -> Result<()>;
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook
    #[default]
    Xlsx,
    /// Parquet files
    Parquet,
}

/// Create the sink for `format` in `directory`
pub fn open_sink(format: OutputFormat, directory: &Path, file_name: &str) -> Result<Box<dyn Sink>> {
    match format {
        OutputFormat::Xlsx => Ok(Box::new(WorkbookSink::create(directory, file_name)?)),
        OutputFormat::Parquet => Ok(Box::new(ParquetSink::create(directory, file_name)?)),
    }
}

/// Fail unless `directory` exists and the current user can create files in
/// it. A scratch file is created and removed right away.
pub(crate) fn ensure_directory(directory: &Path) -> Result<()> {
    if !directory.is_dir() {
        return Err(Error::output(format!("Path incorrect ({})", directory.display())));
    }

    tempfile::Builder::new()
        .prefix(".array-xray-")
        .tempfile_in(directory)
        .map(drop)
        .map_err(|e| {
            Error::output(format!(
                "Insufficient rights on {} ({e})",
                directory.display()
            ))
        })
}

/// Sink keeping every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<(String, NormalizedRecord)>,
    finished: bool,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(category, record)` pair, in save order
    pub fn records(&self) -> &[(String, NormalizedRecord)] {
        &self.records
    }

    /// Records of one category, in save order
    pub fn category(&self, name: &str) -> Vec<&NormalizedRecord> {
        self.records
            .iter()
            .filter(|(category, _)| category == name)
            .map(|(_, record)| record)
            .collect()
    }

    /// Distinct categories, in first-save order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (category, _) in &self.records {
            if !seen.contains(&category.as_str()) {
                seen.push(category);
            }
        }
        seen
    }

    /// Number of saved records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was saved
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether [`Sink::finish`] was called
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Sink for MemorySink {
    fn save(&mut self, category: &str, record: &NormalizedRecord) -> Result<()> {
        self.records.push((category.to_string(), record.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
