//! Column access on record batches

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray};
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;

use crate::{DataError, Result};

/// Look up a column by name, failing with [`DataError::InvalidColumn`]
pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DataError::InvalidColumn(name.to_string()))
}

/// Numeric columns hold integers, floats or decimals
pub fn is_numeric(data_type: &DataType) -> bool {
    data_type.is_numeric()
}

/// Text-like columns: plain strings and dictionary encoded strings
pub fn is_text(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 => true,
        DataType::Dictionary(_, values) => is_text(values),
        _ => false,
    }
}

/// Values of a numeric column as `f64`; nulls and NaNs become `None`
pub fn numeric_values(array: &dyn Array) -> Result<Vec<Option<f64>>> {
    let floats = cast(array, &DataType::Float64)?;
    let floats = floats.as_primitive::<Float64Type>();
    Ok(floats.iter().map(|v| v.filter(|x| !x.is_nan())).collect())
}

/// Values of any column rendered as strings; nulls become `None`
pub fn string_values(array: &dyn Array) -> Result<Vec<Option<String>>> {
    let text = cast(array, &DataType::Utf8)?;
    Ok(text
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Number of distinct non-missing values
pub fn n_unique(array: &dyn Array) -> Result<usize> {
    if is_numeric(array.data_type()) {
        let distinct: HashSet<u64> = numeric_values(array)?
            .into_iter()
            .flatten()
            .map(|v| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
            .collect();
        return Ok(distinct.len());
    }
    let distinct: HashSet<String> = string_values(array)?.into_iter().flatten().collect();
    Ok(distinct.len())
}

/// Largest value across all numeric columns
pub fn max_numeric(batch: &RecordBatch) -> Result<Option<f64>> {
    let mut max: Option<f64> = None;
    for array in batch.columns() {
        if !is_numeric(array.data_type()) {
            continue;
        }
        for v in numeric_values(array.as_ref())?.into_iter().flatten() {
            max = Some(max.map_or(v, |m| m.max(v)));
        }
    }
    Ok(max)
}

/// Copy of `batch` with column `name` replaced by `array`
pub fn replace_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataError::InvalidColumn(name.to_string()))?;
    if array.len() != batch.num_rows() {
        return Err(DataError::LengthMismatch {
            column: name.to_string(),
            expected: batch.num_rows(),
            actual: array.len(),
        });
    }

    let schema = batch.schema();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            if i == idx {
                Field::new(name, array.data_type().clone(), array.null_count() > 0)
            } else {
                field.as_ref().clone()
            }
        })
        .collect();
    let mut columns = batch.columns().to_vec();
    columns[idx] = array;

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Keep only the rows where `mask` is true
pub fn filter_rows(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if mask.len() != batch.num_rows() {
        return Err(DataError::LengthMismatch {
            column: "mask".to_string(),
            expected: batch.num_rows(),
            actual: mask.len(),
        });
    }
    Ok(filter_record_batch(batch, mask)?)
}
