use std::collections::{HashMap, HashSet};
use std::fmt;

use arrow::array::Array;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::{is_numeric, is_text, numeric_values, string_values};
use crate::Result;

/// Per-column overrides for type detection
pub type TypeHints = HashMap<String, ColumnKind>;

/// Declared kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Categorical,
    Continuous,
    Unknown,
}

impl ColumnKind {
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnKind::Categorical)
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, ColumnKind::Continuous)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Categorical => "categorical",
            ColumnKind::Continuous => "continuous",
            ColumnKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Detected kinds for every column of a table, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTypes {
    kinds: IndexMap<String, ColumnKind>,
}

impl ColumnTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, kind: ColumnKind) {
        self.kinds.insert(column.into(), kind);
    }

    pub fn get(&self, column: &str) -> Option<ColumnKind> {
        self.kinds.get(column).copied()
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.get(column).map_or(false, |k| k.is_categorical())
    }

    pub fn is_continuous(&self, column: &str) -> bool {
        self.get(column).map_or(false, |k| k.is_continuous())
    }

    /// Columns of the given kind, in table order
    pub fn columns_of(&self, kind: ColumnKind) -> Vec<&str> {
        self.kinds
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.kinds.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnKind)> for ColumnTypes {
    fn from_iter<I: IntoIterator<Item = (S, ColumnKind)>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().map(|(name, kind)| (name.into(), kind)).collect(),
        }
    }
}

/// Anything that can classify the columns of a table
pub trait TypeDetector {
    fn detect(&self, batch: &RecordBatch, type_hints: Option<&TypeHints>) -> Result<ColumnTypes>;
}

/// Cardinality based detector
///
/// Dictionary and boolean columns are categorical. Numeric columns are
/// categorical when they hold only integral values with few distinct
/// entries, continuous otherwise. Text columns with few distinct values are
/// categorical; free text is unknown.
#[derive(Debug, Clone)]
pub struct ColumnTypeDetector {
    max_categories: usize,
}

impl ColumnTypeDetector {
    pub fn new() -> Self {
        Self { max_categories: 10 }
    }

    /// Set the largest distinct count still treated as categorical
    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories;
        self
    }

    fn analyze_column(&self, array: &dyn Array) -> Result<ColumnKind> {
        let data_type = array.data_type();

        if matches!(data_type, DataType::Boolean | DataType::Dictionary(_, _)) {
            return Ok(ColumnKind::Categorical);
        }

        if is_numeric(data_type) {
            let values: Vec<f64> = numeric_values(array)?.into_iter().flatten().collect();
            if values.is_empty() {
                return Ok(ColumnKind::Unknown);
            }
            let integral = values.iter().all(|v| v.fract() == 0.0);
            let distinct: HashSet<u64> = values.iter().map(|v| v.to_bits()).collect();
            if integral && distinct.len() <= self.max_categories {
                return Ok(ColumnKind::Categorical);
            }
            return Ok(ColumnKind::Continuous);
        }

        if is_text(data_type) {
            let distinct: HashSet<String> = string_values(array)?.into_iter().flatten().collect();
            if !distinct.is_empty() && distinct.len() <= self.max_categories {
                return Ok(ColumnKind::Categorical);
            }
        }

        Ok(ColumnKind::Unknown)
    }
}

impl Default for ColumnTypeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDetector for ColumnTypeDetector {
    fn detect(&self, batch: &RecordBatch, type_hints: Option<&TypeHints>) -> Result<ColumnTypes> {
        let schema = batch.schema();
        let mut types = ColumnTypes::new();
        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let hinted = type_hints.and_then(|hints| hints.get(field.name()).copied());
            let kind = match hinted {
                Some(kind) => kind,
                None => self.analyze_column(array.as_ref())?,
            };
            types.insert(field.name().clone(), kind);
        }
        Ok(types)
    }
}
