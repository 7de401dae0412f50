//! Arrow schema inference and record to Arrow conversion
//!
//! Column order is the order in which labels are first seen, so a category
//! keeps the field order of its projection schema.

use crate::error::{Error, Result};
use crate::projection::{Cell, NormalizedRecord};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use std::sync::Arc;

/// Infer an Arrow schema from a set of records
///
/// Every column is nullable. Empty text does not vote on a column's type, so
/// an absent optional field does not turn a numeric column into text.
pub fn infer_schema(records: &[NormalizedRecord]) -> Schema {
    let mut field_types: IndexMap<String, DataType> = IndexMap::new();

    for record in records {
        for (label, cell) in record.iter() {
            let inferred = infer_type(cell);
            field_types
                .entry(label.to_string())
                .and_modify(|existing| *existing = merge_types(existing, &inferred))
                .or_insert(inferred);
        }
    }

    let fields: Vec<Field> = field_types
        .into_iter()
        .map(|(name, dtype)| match dtype {
            // A column with no value at all is kept as text
            DataType::Null => Field::new(name, DataType::Utf8, true),
            other => Field::new(name, other, true),
        })
        .collect();

    Schema::new(fields)
}

/// Convert records to an Arrow RecordBatch with an inferred schema
///
/// Empty text stays `""` in text columns, as in the workbook. In numeric and
/// boolean columns it becomes null. A label missing from a record is null.
pub fn records_to_arrow(records: &[NormalizedRecord]) -> Result<RecordBatch> {
    let schema = Arc::new(infer_schema(records));

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<Option<&Cell>> = records
                .iter()
                .map(|record| record.get(field.name()))
                .collect();
            build_array(&values, field.data_type())
        })
        .collect();

    RecordBatch::try_new(schema, columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Infer Arrow DataType from a cell
fn infer_type(cell: &Cell) -> DataType {
    match cell {
        Cell::Text(s) if s.is_empty() => DataType::Null,
        Cell::Text(_) => DataType::Utf8,
        Cell::Integer(_) => DataType::Int64,
        Cell::Float(_) => DataType::Float64,
        Cell::Bool(_) => DataType::Boolean,
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        // Null can merge with anything
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from cells
fn build_array(values: &[Option<&Cell>], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values
                .iter()
                .map(|v| match v {
                    Some(Cell::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        DataType::Int64 => {
            let arr: Int64Array = values
                .iter()
                .map(|v| match v {
                    Some(Cell::Integer(i)) => Some(*i),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        DataType::Float64 => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = values
                .iter()
                .map(|v| match v {
                    Some(Cell::Float(f)) => Some(*f),
                    Some(Cell::Integer(i)) => Some(*i as f64),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        _ => {
            let arr: StringArray = values.iter().map(|v| v.map(ToString::to_string)).collect();
            Arc::new(arr)
        }
    }
}
