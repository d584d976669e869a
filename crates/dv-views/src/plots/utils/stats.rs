//! Statistical utilities for plots

use dv_data::outliers::quantile;
use dv_data::DataError;
use serde::{Deserialize, Serialize};

use crate::{PlotError, Result};

/// How histogram bins are chosen
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bins {
    /// The narrower of the Sturges and Freedman-Diaconis widths
    #[default]
    Auto,
    /// Fixed number of equal-width bins
    Count(usize),
    /// Explicit, increasing bin edges
    Edges(Vec<f64>),
}

/// Calculate quartiles using linear interpolation
pub fn calculate_quartiles(sorted: &[f64]) -> Option<(f64, f64, f64)> {
    Some((
        quantile(sorted, 0.25)?,
        quantile(sorted, 0.5)?,
        quantile(sorted, 0.75)?,
    ))
}

fn linspace(first: f64, last: f64, n_bins: usize) -> Vec<f64> {
    let step = (last - first) / n_bins as f64;
    (0..=n_bins)
        .map(|i| if i == n_bins { last } else { first + step * i as f64 })
        .collect()
}

fn validated_edges(edges: &[f64]) -> Result<Vec<f64>> {
    if edges.len() < 2 || edges.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(PlotError::invalid("bins", "edges must increase monotonically"));
    }
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(PlotError::invalid("bins", "edges must be finite"));
    }
    Ok(edges.to_vec())
}

/// The narrower of the Sturges and Freedman-Diaconis bin widths, as a count
fn auto_bin_count(sorted: &[f64], range: f64) -> usize {
    let n = sorted.len() as f64;
    let sturges = range / (n.log2() + 1.0);
    let freedman_diaconis = match calculate_quartiles(sorted) {
        Some((q1, _, q3)) => 2.0 * (q3 - q1) * n.powf(-1.0 / 3.0),
        None => 0.0,
    };
    let width = if freedman_diaconis > 0.0 {
        sturges.min(freedman_diaconis)
    } else {
        sturges
    };
    ((range / width).ceil() as usize).max(1)
}

/// Bin edges for `values` (missing values already removed).
///
/// A constant sample is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram_bin_edges(values: &[f64], bins: &Bins) -> Result<Vec<f64>> {
    let n_bins = match bins {
        Bins::Edges(edges) => return validated_edges(edges),
        Bins::Count(0) => return Err(PlotError::invalid("bins", "need at least one bin")),
        Bins::Count(n) => Some(*n),
        Bins::Auto => None,
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (mut first, mut last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(DataError::NoValues.into()),
    };
    if !first.is_finite() || !last.is_finite() {
        return Err(PlotError::invalid(
            "bins",
            format!("range [{}, {}] of values is not finite", first, last),
        ));
    }
    if first == last {
        first -= 0.5;
        last += 0.5;
    }

    let n_bins = n_bins.unwrap_or_else(|| auto_bin_count(&sorted, last - first));
    Ok(linspace(first, last, n_bins))
}

/// Count values per bin. Bins are half open except the last, which also
/// holds its right edge; values outside the edges are ignored.
pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let n_bins = edges.len().saturating_sub(1);
    let mut counts = vec![0; n_bins];
    let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
        return counts;
    };
    if n_bins == 0 {
        return counts;
    }

    for &v in values {
        if v < *first || v > *last || v.is_nan() {
            continue;
        }
        let bin = edges.partition_point(|e| *e <= v).saturating_sub(1).min(n_bins - 1);
        counts[bin] += 1;
    }
    counts
}
