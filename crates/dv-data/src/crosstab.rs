//! Contingency tables and grouped values

use std::collections::HashMap;

use arrow::record_batch::RecordBatch;
use indexmap::{IndexMap, IndexSet};

use crate::table::{column, numeric_values, string_values};
use crate::Result;

/// Counts of co-occurring labels of two columns
#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab {
    /// Sorted labels of the row variable
    pub index: Vec<String>,
    /// Sorted labels of the column variable
    pub columns: Vec<String>,
    /// `counts[i][j]` rows with `index[i]` and `columns[j]`
    pub counts: Vec<Vec<usize>>,
}

impl Crosstab {
    pub fn column_counts(&self, j: usize) -> Vec<usize> {
        self.counts.iter().map(|row| row[j]).collect()
    }

    pub fn column_total(&self, j: usize) -> usize {
        self.counts.iter().map(|row| row[j]).sum()
    }

    /// Share of `index[0]` within each column; empty columns get 0
    pub fn first_row_shares(&self) -> Vec<f64> {
        (0..self.columns.len())
            .map(|j| {
                let total = self.column_total(j);
                match self.counts.first() {
                    Some(row) if total > 0 => row[j] as f64 / total as f64,
                    _ => 0.0,
                }
            })
            .collect()
    }
}

/// Sort distinct labels by value when every one of them is a number,
/// otherwise as text
fn sort_labels(labels: Vec<String>) -> Vec<String> {
    let values: Option<Vec<f64>> = labels.iter().map(|l| l.parse::<f64>().ok()).collect();
    match values {
        Some(values) => {
            let mut keyed: Vec<(f64, String)> = values.into_iter().zip(labels).collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            keyed.into_iter().map(|(_, label)| label).collect()
        }
        None => {
            let mut labels = labels;
            labels.sort();
            labels
        }
    }
}

fn distinct_sorted<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let unique: IndexSet<&str> = labels.collect();
    sort_labels(unique.into_iter().map(str::to_string).collect())
}

fn positions(labels: &[String]) -> HashMap<&str, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(pos, label)| (label.as_str(), pos))
        .collect()
}

/// Cross-tabulate two columns; rows where either value is missing are skipped
pub fn crosstab(batch: &RecordBatch, index_col: &str, columns_col: &str) -> Result<Crosstab> {
    let index_values = string_values(column(batch, index_col)?.as_ref())?;
    let column_values = string_values(column(batch, columns_col)?.as_ref())?;

    let pairs: Vec<(&str, &str)> = index_values
        .iter()
        .zip(&column_values)
        .filter_map(|(i, c)| Some((i.as_deref()?, c.as_deref()?)))
        .collect();

    let index = distinct_sorted(pairs.iter().map(|(i, _)| *i));
    let columns = distinct_sorted(pairs.iter().map(|(_, c)| *c));

    let mut counts = vec![vec![0usize; columns.len()]; index.len()];
    {
        let rows = positions(&index);
        let cols = positions(&columns);
        for (i, c) in &pairs {
            if let (Some(row), Some(col)) = (rows.get(i), cols.get(c)) {
                counts[*row][*col] += 1;
            }
        }
    }

    Ok(Crosstab {
        index,
        columns,
        counts,
    })
}

/// Non-missing values of `value_col` grouped by the sorted labels of `by`
pub fn group_values(
    batch: &RecordBatch,
    by: &str,
    value_col: &str,
) -> Result<Vec<(String, Vec<f64>)>> {
    let keys = string_values(column(batch, by)?.as_ref())?;
    let values = numeric_values(column(batch, value_col)?.as_ref())?;

    let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        let Some(key) = key else { continue };
        let group = groups.entry(key).or_default();
        if let Some(v) = value {
            group.push(v);
        }
    }

    let order = sort_labels(groups.keys().cloned().collect());
    Ok(order
        .into_iter()
        .filter_map(|key| {
            let values = groups.swap_remove(&key)?;
            Some((key, values))
        })
        .collect())
}
