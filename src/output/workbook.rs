//! Excel workbook output
//!
//! One worksheet per category, created on the first record saved to it. The
//! header row comes from the labels of that first record.

use super::{ensure_directory, Sink};
use crate::error::Result;
use crate::projection::{Cell, NormalizedRecord};
use chrono::Local;
use indexmap::IndexMap;
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TITLE: &str = "Array-XRay Inventory";
const HEADER_COLOR: u32 = 0x00C5_D9F1;
const WIDTH_PADDING: usize = 5;

/// Write position and column widths of one worksheet
#[derive(Debug)]
struct SheetState {
    index: usize,
    next_row: u32,
    widths: Vec<usize>,
}

impl SheetState {
    fn memorize_width(&mut self, column: usize, width: usize) {
        if column >= self.widths.len() {
            self.widths.resize(column + 1, 0);
        }
        self.widths[column] = self.widths[column].max(width);
    }
}

/// Sink writing an `.xlsx` workbook
pub struct WorkbookSink {
    path: PathBuf,
    workbook: Workbook,
    sheets: IndexMap<String, SheetState>,
    header: Format,
    cell: Format,
    finished: bool,
}

impl WorkbookSink {
    /// Create the workbook `directory/file_name`.
    ///
    /// The directory must exist and be writable. When the file exists but
    /// cannot be opened for writing (typically open in a spreadsheet
    /// application), a timestamp is inserted before the extension.
    pub fn create(directory: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        let directory = directory.as_ref();
        ensure_directory(directory)?;

        let mut path = directory.join(file_name);
        if path.is_file() && OpenOptions::new().read(true).write(true).open(&path).is_err() {
            warn!("{file_name} already open. Add a time to the filename");
            path = directory.join(timestamped(file_name, &Local::now().format("_%Y-%m-%d_%Hh%Mm%Ss").to_string()));
        }

        info!("Initializing a Excel workbook ({})", path.display());

        let mut workbook = Workbook::new();
        let properties = DocProperties::new()
            .set_title(TITLE)
            .set_subject("Make an inventory of storage arrays")
            .set_category("SAN Storage")
            .set_keywords("SAN, Symmetrix, VMAX, SVC, VPLEX");
        workbook.set_properties(&properties);

        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(Color::RGB(HEADER_COLOR))
            .set_border(FormatBorder::Thin);
        let cell = Format::new()
            .set_align(FormatAlign::Left)
            .set_border(FormatBorder::Thin);

        Ok(Self {
            path,
            workbook,
            sheets: IndexMap::new(),
            header,
            cell,
            finished: false,
        })
    }

    /// Path the workbook is saved to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Categories seen so far, in creation order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    fn open_sheet(&mut self, category: &str, record: &NormalizedRecord) -> Result<()> {
        let index = self.sheets.len();
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(category)?;

        let mut state = SheetState {
            index,
            next_row: 1,
            widths: Vec::with_capacity(record.len()),
        };

        for (column, label) in record.labels().enumerate() {
            worksheet.write_string_with_format(0, column as u16, label, &self.header)?;
            state.memorize_width(column, label.chars().count());
        }

        if !record.is_empty() {
            worksheet.autofilter(0, 0, 0, (record.len() - 1) as u16)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        debug!("New worksheet '{category}'");
        self.sheets.insert(category.to_string(), state);
        Ok(())
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, column: u16, cell: &Cell, format: &Format) -> Result<()> {
    match cell {
        Cell::Text(s) => worksheet.write_string_with_format(row, column, s, format)?,
        #[allow(clippy::cast_precision_loss)]
        Cell::Integer(i) => worksheet.write_number_with_format(row, column, *i as f64, format)?,
        Cell::Float(f) => worksheet.write_number_with_format(row, column, *f, format)?,
        Cell::Bool(b) => worksheet.write_boolean_with_format(row, column, *b, format)?,
    };
    Ok(())
}

/// `inventory.xlsx` + `_stamp` gives `inventory_stamp.xlsx`
fn timestamped(file_name: &str, stamp: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, extension)) => format!("{stem}{stamp}.{extension}"),
        None => format!("{file_name}{stamp}"),
    }
}

impl Sink for WorkbookSink {
    fn save(&mut self, category: &str, record: &NormalizedRecord) -> Result<()> {
        if !self.sheets.contains_key(category) {
            self.open_sheet(category, record)?;
        }
        let Some(state) = self.sheets.get_mut(category) else {
            return Ok(());
        };

        let worksheet = self.workbook.worksheet_from_index(state.index)?;
        let row = state.next_row;
        for (column, cell) in record.cells().enumerate() {
            write_cell(worksheet, row, column as u16, cell, &self.cell)?;
            state.memorize_width(column, cell.width());
        }
        state.next_row += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        for state in self.sheets.values() {
            let worksheet = self.workbook.worksheet_from_index(state.index)?;
            for (column, width) in state.widths.iter().enumerate() {
                worksheet.set_column_width(column as u16, (width + WIDTH_PADDING) as f64)?;
            }
        }

        debug!("Now closing the workbook");
        self.workbook.save(&self.path)?;
        self.finished = true;
        Ok(())
    }
}
