//! Percentile based outlier heuristics

use arrow::array::{Array, BooleanArray};
use arrow::record_batch::RecordBatch;
use tracing::warn;

use crate::table::{is_numeric, numeric_values};
use crate::{DataError, Result};

const LOW_QUANTILE: f64 = 0.01;
const HIGH_QUANTILE: f64 = 0.99;

/// Closed interval of values considered inliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlierRange {
    pub low: f64,
    pub high: f64,
}

impl InlierRange {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Quantile of already sorted values, interpolating linearly between ranks
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    Some(interpolate(sorted, idx))
}

fn interpolate(sorted: &[f64], idx: f64) -> f64 {
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// 1st and 99th percentiles of the non-missing values
fn percentile_band(values: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    sorted.sort_by(f64::total_cmp);

    let low = quantile(&sorted, LOW_QUANTILE)?;
    let high = quantile(&sorted, HIGH_QUANTILE)?;
    Some((low, high))
}

/// Widen the band by half its width on both sides
fn widen(low: f64, high: f64) -> InlierRange {
    let inner_range = (high - low) / 2.0;
    InlierRange {
        low: low - inner_range,
        high: high + inner_range,
    }
}

/// Range outside of which values are treated as outliers
///
/// Missing values are ignored. Fails when there are no values or when the
/// 1st percentile is not strictly below the 99th.
pub fn inlier_range(values: &[Option<f64>]) -> Result<InlierRange> {
    let (low, high) = percentile_band(values).ok_or(DataError::NoValues)?;
    if low >= high {
        return Err(DataError::DegenerateRange { low, high });
    }
    Ok(widen(low, high))
}

/// Inlier mask for a single column; missing values count as inliers
pub fn find_inliers(array: &dyn Array, name: &str) -> Result<BooleanArray> {
    let values = numeric_values(array)?;
    let range = inlier_range(&values)?;

    let mask: Vec<bool> = values
        .iter()
        .map(|v| v.map_or(true, |v| range.contains(v)))
        .collect();
    let dropped = mask.iter().filter(|keep| !**keep).count();
    if dropped > 0 {
        warn!(column = name, dropped, "Dropped {} outliers in column {}.", dropped, name);
    }
    Ok(BooleanArray::from(mask))
}

/// Row mask keeping rows whose numeric values are all inliers
///
/// Non-numeric columns never drop a row. Returns `None` when every row is
/// kept.
pub fn clean_outliers(batch: &RecordBatch) -> Result<Option<BooleanArray>> {
    let mut mask = vec![true; batch.num_rows()];

    for array in batch.columns() {
        if !is_numeric(array.data_type()) {
            continue;
        }
        let values = numeric_values(array.as_ref())?;
        // constant columns keep a zero-width range
        let Some((low, high)) = percentile_band(&values) else {
            continue;
        };
        let range = widen(low, high);
        for (keep, value) in mask.iter_mut().zip(&values) {
            if let Some(v) = value {
                *keep &= range.contains(*v);
            }
        }
    }

    let dropped = mask.iter().filter(|keep| !**keep).count();
    if dropped > 0 {
        warn!(dropped, "Dropped {} outliers.", dropped);
        return Ok(Some(BooleanArray::from(mask)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn ramp(n: usize) -> Vec<Option<f64>> {
        (0..n).map(|i| Some(i as f64)).collect()
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(quantile(&sorted, 0.5), Some(20.0));
        assert_eq!(quantile(&sorted, 0.1), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_inlier_range_widens_percentiles() {
        // 0..=100: 1st percentile 1, 99th percentile 99
        let range = inlier_range(&ramp(101)).unwrap();
        assert!((range.low - -48.0).abs() < 1e-9);
        assert!((range.high - 148.0).abs() < 1e-9);
        assert!((range.width() - 2.0 * 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_inlier_range_ignores_missing() {
        let mut values = ramp(101);
        values.push(None);
        values.insert(0, None);
        assert_eq!(inlier_range(&values).unwrap(), inlier_range(&ramp(101)).unwrap());
    }

    #[test]
    fn test_inlier_range_rejects_degenerate_input() {
        assert!(matches!(inlier_range(&[None, None]), Err(DataError::NoValues)));
        assert!(matches!(
            inlier_range(&[Some(3.0), Some(3.0), Some(3.0)]),
            Err(DataError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_find_inliers_keeps_missing() {
        let mut values: Vec<Option<f64>> = ramp(100);
        values.push(Some(10_000.0));
        values.push(None);
        let array = Float64Array::from(values);

        let mask = find_inliers(&array, "x").unwrap();
        assert_eq!(mask.len(), 102);
        assert!(!mask.value(100));
        assert!(mask.value(101));
        assert_eq!(mask.true_count(), 101);
    }

    #[test]
    fn test_clean_outliers_ands_columns() {
        let mut a: Vec<Option<f64>> = ramp(100);
        let mut b: Vec<Option<f64>> = ramp(100);
        a.push(Some(1e6));
        b.push(Some(50.0));
        a.push(Some(50.0));
        b.push(None);
        let labels: Vec<&str> = (0..102).map(|_| "z").collect();

        let schema = Schema::new(vec![
            Field::new("a", DataType::Float64, true),
            Field::new("b", DataType::Float64, true),
            Field::new("label", DataType::Utf8, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Float64Array::from(a)) as ArrayRef,
                Arc::new(Float64Array::from(b)),
                Arc::new(StringArray::from(labels)),
            ],
        )
        .unwrap();

        let mask = clean_outliers(&batch).unwrap().expect("one row dropped");
        assert_eq!(mask.false_count(), 1);
        assert!(!mask.value(100));
        assert!(mask.value(101));
    }

    #[test]
    fn test_clean_outliers_keeps_fully_missing_rows() {
        let mut a: Vec<Option<f64>> = ramp(100);
        let mut b: Vec<Option<f64>> = ramp(100);
        a.push(None);
        b.push(None);
        a.push(Some(-1e6));
        b.push(Some(10.0));

        let schema = Schema::new(vec![
            Field::new("a", DataType::Float64, true),
            Field::new("b", DataType::Float64, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Float64Array::from(a)) as ArrayRef,
                Arc::new(Float64Array::from(b)),
            ],
        )
        .unwrap();

        let mask = clean_outliers(&batch).unwrap().expect("one row dropped");
        assert_eq!(mask.len(), 102);
        assert!(mask.value(100));
        assert!(!mask.value(101));
        assert_eq!(mask.false_count(), 1);
    }

    #[test]
    fn test_clean_outliers_none_when_nothing_dropped() {
        let schema = Schema::new(vec![Field::new("a", DataType::Float64, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])) as ArrayRef],
        )
        .unwrap();
        assert!(clean_outliers(&batch).unwrap().is_none());
    }
}
