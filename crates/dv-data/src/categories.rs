//! Category pruning and missing-value filling

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::table::{
    column, is_numeric, max_numeric, n_unique, numeric_values, replace_column, string_values,
};
use crate::Result;

/// Label for categories collapsed by pruning
pub const OTHER_CATEGORY: &str = "dv_other";

/// Label for missing entries of text columns
pub const MISSING_CATEGORY: &str = "dv_missing";

/// Retained category count when a column is pruned for plotting
const PRUNED_CATEGORIES: usize = 10;

fn dictionary_type() -> DataType {
    DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
}

/// Frequency of each distinct non-missing value, most frequent first.
/// Equal counts keep the order of first appearance.
pub fn value_counts(values: &[Option<String>]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Coerce any column to a dictionary encoded string column
pub fn to_categorical(array: &dyn Array) -> Result<ArrayRef> {
    let text = cast(array, &DataType::Utf8)?;
    Ok(cast(&text, &dictionary_type())?)
}

/// Keep the `max_categories` most frequent values and relabel every other
/// entry, missing ones included, as [`OTHER_CATEGORY`].
pub fn prune_categories(array: &dyn Array, max_categories: usize) -> Result<ArrayRef> {
    let values = string_values(array)?;
    let keep: HashSet<String> = value_counts(&values)
        .into_iter()
        .take(max_categories)
        .map(|(value, _)| value)
        .collect();

    let pruned: StringArray = values
        .iter()
        .map(|value| match value {
            Some(v) if keep.contains(v) => Some(v.as_str()),
            _ => Some(OTHER_CATEGORY),
        })
        .collect();
    to_categorical(&pruned)
}

/// Prepare `col` for a categorical plot against `target_col`.
///
/// Columns with more than `max_categories` distinct values are pruned to
/// at most ten categories and returned next to the target only; otherwise
/// the whole table comes back with `col` coerced to categorical.
pub fn prune_category_make_x(
    batch: &RecordBatch,
    col: &str,
    target_col: &str,
    max_categories: usize,
) -> Result<RecordBatch> {
    let values = column(batch, col)?;
    let distinct = n_unique(values.as_ref())?;

    if distinct <= max_categories {
        return replace_column(batch, col, to_categorical(values.as_ref())?);
    }

    let retained = PRUNED_CATEGORIES.min(max_categories);
    warn!(
        column = col,
        distinct,
        retained,
        "Column {} has {} categories, showing only the top {}.",
        col,
        distinct,
        retained
    );
    let pruned = prune_categories(values.as_ref(), retained)?;
    let target = column(batch, target_col)?.clone();

    let schema = Schema::new(vec![
        Field::new(target_col, target.data_type().clone(), target.null_count() > 0),
        Field::new(col, pruned.data_type().clone(), false),
    ]);
    Ok(RecordBatch::try_new(Arc::new(schema), vec![target, pruned])?)
}

/// Fill missing entries so every value can act as a category.
///
/// Numeric columns get one more than the largest numeric value of the whole
/// table, everything else gets [`MISSING_CATEGORY`]. Columns without missing
/// entries are passed through untouched.
pub fn fill_missing_categorical(batch: &RecordBatch) -> Result<RecordBatch> {
    let fill_value = max_numeric(batch)?.unwrap_or(0.0) + 1.0;
    let mut filled = batch.clone();

    let schema = batch.schema();
    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        let data_type = array.data_type();

        if is_numeric(data_type) {
            let values = numeric_values(array.as_ref())?;
            if values.iter().all(Option::is_some) {
                continue;
            }
            let replaced: Float64Array = values
                .into_iter()
                .map(|v| Some(v.unwrap_or(fill_value)))
                .collect();
            debug!(column = %field.name(), fill_value, "filled missing numeric values");
            filled = replace_column(&filled, field.name(), Arc::new(replaced))?;
            continue;
        }

        if array.null_count() == 0 {
            continue;
        }
        let values = string_values(array.as_ref())?;
        let replaced: StringArray = values
            .iter()
            .map(|v| Some(v.as_deref().unwrap_or(MISSING_CATEGORY)))
            .collect();
        let replaced: ArrayRef = if matches!(data_type, DataType::Dictionary(_, _)) {
            to_categorical(&replaced)?
        } else {
            Arc::new(replaced)
        };
        debug!(column = %field.name(), "filled missing categories");
        filled = replace_column(&filled, field.name(), replaced)?;
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{AsArray, Int64Array};
    use arrow::datatypes::Int32Type;

    fn labels(values: &[Option<&str>]) -> StringArray {
        StringArray::from(values.to_vec())
    }

    fn decoded(array: &ArrayRef) -> Vec<Option<String>> {
        string_values(array.as_ref()).unwrap()
    }

    #[test]
    fn test_value_counts_orders_by_frequency() {
        let values: Vec<Option<String>> = ["b", "a", "a", "c", "b", "a"]
            .iter()
            .map(|v| Some(v.to_string()))
            .collect();
        let counts = value_counts(&values);
        assert_eq!(
            counts,
            vec![("a".to_string(), 3), ("b".to_string(), 2), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_prune_keeps_top_categories() {
        let array = labels(&[
            Some("a"), Some("a"), Some("a"), Some("b"), Some("b"), Some("c"), Some("d"), None,
        ]);
        let pruned = prune_categories(&array, 2).unwrap();
        assert_eq!(pruned.data_type(), &dictionary_type());

        let values = decoded(&pruned);
        let expected: Vec<Option<String>> = [
            "a", "a", "a", "b", "b", OTHER_CATEGORY, OTHER_CATEGORY, OTHER_CATEGORY,
        ]
        .iter()
        .map(|v| Some(v.to_string()))
        .collect();
        assert_eq!(values, expected);

        let distinct: HashSet<Option<String>> = values.into_iter().collect();
        assert!(distinct.len() <= 3);
    }

    #[test]
    fn test_prune_with_few_categories_only_fills_missing() {
        let array = labels(&[Some("x"), None, Some("y")]);
        let pruned = prune_categories(&array, 5).unwrap();
        let dict = pruned.as_dictionary::<Int32Type>();
        assert_eq!(dict.null_count(), 0);
        assert_eq!(decoded(&pruned)[1].as_deref(), Some(OTHER_CATEGORY));
    }

    fn wide_batch() -> RecordBatch {
        let many: Vec<String> = (0..30).map(|i| format!("c{}", i % 25)).collect();
        let few: Vec<&str> = (0..30).map(|i| if i % 2 == 0 { "even" } else { "odd" }).collect();
        let target: Vec<i64> = (0..30).map(|i| i % 2).collect();
        let schema = Schema::new(vec![
            Field::new("many", DataType::Utf8, false),
            Field::new("few", DataType::Utf8, false),
            Field::new("target", DataType::Int64, false),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(many)) as ArrayRef,
                Arc::new(StringArray::from(few)),
                Arc::new(Int64Array::from(target)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_make_x_prunes_wide_column() {
        let x = prune_category_make_x(&wide_batch(), "many", "target", 20).unwrap();
        assert_eq!(x.num_columns(), 2);
        assert_eq!(x.schema().field(0).name(), "target");
        assert_eq!(x.schema().field(1).name(), "many");

        let distinct: HashSet<Option<String>> = decoded(x.column(1)).into_iter().collect();
        assert_eq!(distinct.len(), 11);
        assert!(distinct.contains(&Some(OTHER_CATEGORY.to_string())));
    }

    #[test]
    fn test_make_x_coerces_narrow_column() {
        let batch = wide_batch();
        let x = prune_category_make_x(&batch, "few", "target", 20).unwrap();
        assert_eq!(x.num_columns(), 3);
        assert_eq!(x.schema().field(1).data_type(), &dictionary_type());
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_fill_missing_is_copy_on_write() {
        let schema = Schema::new(vec![
            Field::new("n", DataType::Int64, true),
            Field::new("f", DataType::Float64, true),
            Field::new("s", DataType::Utf8, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![Some(4), None, Some(2)])) as ArrayRef,
                Arc::new(Float64Array::from(vec![Some(0.5), Some(9.0), None])),
                Arc::new(StringArray::from(vec![None, Some("a"), Some("b")])),
            ],
        )
        .unwrap();

        let filled = fill_missing_categorical(&batch).unwrap();

        assert_eq!(batch.column(0).null_count(), 1);
        assert_eq!(batch.column(2).null_count(), 1);
        for array in filled.columns() {
            assert_eq!(array.null_count(), 0);
        }
        assert_eq!(numeric_values(filled.column(0).as_ref()).unwrap()[1], Some(10.0));
        assert_eq!(numeric_values(filled.column(1).as_ref()).unwrap()[2], Some(10.0));
        assert_eq!(decoded(filled.column(2))[0].as_deref(), Some(MISSING_CATEGORY));
    }
}
