//! Target column validation

use std::fmt;

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::schema::{ColumnKind, ColumnTypeDetector, ColumnTypes, TypeDetector, TypeHints};
use crate::table::{column, n_unique, string_values};
use crate::{DataError, Result};

/// Supervised task a target column is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Classification,
    Regression,
}

impl Task {
    /// Column kind a target needs for this task
    pub fn required_kind(&self) -> ColumnKind {
        match self {
            Task::Classification => ColumnKind::Categorical,
            Task::Regression => ColumnKind::Continuous,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Classification => f.write_str("classification"),
            Task::Regression => f.write_str("regression"),
        }
    }
}

/// Check that `target_col` is usable as a target and return the column types.
///
/// Types are detected with [`ColumnTypeDetector`] unless `types` is given.
pub fn check_x_target_col(
    batch: &RecordBatch,
    target_col: &str,
    types: Option<ColumnTypes>,
    type_hints: Option<&TypeHints>,
    task: Option<Task>,
) -> Result<ColumnTypes> {
    let types = match types {
        Some(types) => types,
        None => ColumnTypeDetector::default().detect(batch, type_hints)?,
    };

    let target = column(batch, target_col)?;
    if n_unique(target.as_ref())? < 2 {
        let first_value = string_values(target.as_ref())?
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(|| "null".to_string());
        return Err(DataError::TooFewClasses {
            column: target_col.to_string(),
            first_value,
        });
    }

    if let Some(task) = task {
        let detected = types.get(target_col).unwrap_or(ColumnKind::Unknown);
        let expected = task.required_kind();
        if detected != expected {
            return Err(DataError::TypeMismatch {
                column: target_col.to_string(),
                detected,
                expected,
                task,
            });
        }
    }

    Ok(types)
}
