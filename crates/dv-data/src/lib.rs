//! Data shaping helpers for exploratory plots
//!
//! Everything here works on an arrow [`RecordBatch`](arrow::record_batch::RecordBatch)
//! and returns new batches or arrays; input tables are never modified.

pub mod categories;
pub mod crosstab;
pub mod outliers;
pub mod schema;
pub mod table;
pub mod validation;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use categories::{
    fill_missing_categorical, prune_categories, prune_category_make_x, to_categorical,
    value_counts, MISSING_CATEGORY, OTHER_CATEGORY,
};
pub use crosstab::{crosstab, group_values, Crosstab};
pub use outliers::{clean_outliers, find_inliers, inlier_range, InlierRange};
pub use schema::{ColumnKind, ColumnTypeDetector, ColumnTypes, TypeDetector, TypeHints};
pub use validation::{check_x_target_col, Task};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("{0} is not a valid column of X")]
    InvalidColumn(String),

    #[error("Less than two classes present, {first_value}, need at least two for classification.")]
    TooFewClasses { column: String, first_value: String },

    #[error("Type for target column {column} detected as {detected}, need {expected} for {task}.")]
    TypeMismatch {
        column: String,
        detected: ColumnKind,
        expected: ColumnKind,
        task: Task,
    },

    #[error("Degenerate value range: low quantile {low} is not below high quantile {high}")]
    DegenerateRange { low: f64, high: f64 },

    #[error("No non-missing values to compute a range from")]
    NoValues,

    #[error("Column {column} has length {actual}, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
