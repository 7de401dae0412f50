//! Parquet output
//!
//! [`ParquetSink`] buffers rows per category and writes one Parquet file per
//! category when the run is finished.

use super::schema::records_to_arrow;
use super::{ensure_directory, Sink};
use crate::error::{Error, Result};
use crate::projection::NormalizedRecord;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Largest row group written; an inventory category fits in one
const ROW_GROUP_SIZE: usize = 1024 * 1024;

fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(ROW_GROUP_SIZE)
        .build()
}

/// Parquet file writer
pub struct ParquetWriter {
    writer: ArrowWriter<File>,
    rows_written: usize,
}

impl ParquetWriter {
    /// Create the file at `path`, snappy-compressed
    pub fn new(path: impl AsRef<Path>, schema: &Schema) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|e| Error::Output {
            message: format!("Failed to create {}: {e}", path.as_ref().display()),
        })?;

        let writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(writer_properties()))?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch to the file
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Close the writer and finalize the file
    pub fn close(self) -> Result<usize> {
        let rows = self.rows_written;
        self.writer.close()?;
        Ok(rows)
    }
}

/// Sink writing `<stem>_<category>.parquet` files
pub struct ParquetSink {
    directory: PathBuf,
    stem: String,
    categories: IndexMap<String, Vec<NormalizedRecord>>,
    written: Vec<PathBuf>,
}

impl ParquetSink {
    /// Create a sink writing next to `directory/file_name`
    pub fn create(directory: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        let directory = directory.as_ref();
        ensure_directory(directory)?;

        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::output(format!("Invalid file name '{file_name}'")))?
            .to_string();

        info!("Initializing Parquet output ({stem}_*.parquet)");
        Ok(Self {
            directory: directory.to_path_buf(),
            stem,
            categories: IndexMap::new(),
            written: Vec::new(),
        })
    }

    /// Path of the file holding `category`
    pub fn path_for(&self, category: &str) -> PathBuf {
        let category = category.replace(|c: char| !c.is_ascii_alphanumeric(), "_");
        self.directory.join(format!("{}_{category}.parquet", self.stem))
    }

    /// Files written by [`Sink::finish`]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Sink for ParquetSink {
    fn save(&mut self, category: &str, record: &NormalizedRecord) -> Result<()> {
        self.categories
            .entry(category.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for (category, records) in std::mem::take(&mut self.categories) {
            let path = self.path_for(&category);
            let batch = records_to_arrow(&records)?;

            let mut writer = ParquetWriter::new(&path, batch.schema().as_ref())?;
            writer.write(&batch)?;
            let rows = writer.close()?;

            debug!("Wrote {rows} row(s) to {}", path.display());
            self.written.push(path);
        }
        Ok(())
    }
}
