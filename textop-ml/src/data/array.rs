//! Array-like sample containers exchanged with operators.

use crate::error::TextOpError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A one- or two-dimensional collection of arbitrary-typed cells.
///
/// The outer array is always over samples. A 1-D array is a single feature
/// column; a 2-D array holds one row of cells per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayLike {
    TwoD(Vec<Vec<Value>>),
    OneD(Vec<Value>),
}

impl ArrayLike {
    /// Parse an array-like from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, TextOpError> {
        match value {
            Value::Array(_) => Ok(serde_json::from_value(value)?),
            other => Err(TextOpError::invalid_shape(format!(
                "expected a 1-D or 2-D array, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Number of samples (length of the outer array).
    pub fn n_samples(&self) -> usize {
        match self {
            ArrayLike::TwoD(rows) => rows.len(),
            ArrayLike::OneD(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    pub fn is_two_d(&self) -> bool {
        matches!(self, ArrayLike::TwoD(_))
    }

    /// Rows as a rectangular table; a 1-D array becomes a single column.
    ///
    /// Fails with [`TextOpError::InvalidShape`] when 2-D rows differ in length.
    pub fn to_rows(&self) -> Result<Vec<Vec<Value>>, TextOpError> {
        match self {
            ArrayLike::OneD(cells) => Ok(cells.iter().map(|c| vec![c.clone()]).collect()),
            ArrayLike::TwoD(rows) => {
                if let Some(first) = rows.first() {
                    let width = first.len();
                    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
                        return Err(TextOpError::invalid_shape(format!(
                            "row {i} has {} cells, expected {width}",
                            row.len()
                        )));
                    }
                }
                Ok(rows.clone())
            }
        }
    }

    /// Number of feature columns, `None` for an empty 2-D array.
    pub fn n_columns(&self) -> Option<usize> {
        match self {
            ArrayLike::OneD(_) => Some(1),
            ArrayLike::TwoD(rows) => rows.first().map(Vec::len),
        }
    }
}

impl From<Vec<Vec<Value>>> for ArrayLike {
    fn from(rows: Vec<Vec<Value>>) -> Self {
        ArrayLike::TwoD(rows)
    }
}

impl From<Vec<Value>> for ArrayLike {
    fn from(cells: Vec<Value>) -> Self {
        ArrayLike::OneD(cells)
    }
}

/// A named, rectangular batch of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from an array-like, naming columns by position.
    pub fn from_array(array: &ArrayLike) -> Result<Self, TextOpError> {
        let rows = array.to_rows()?;
        let width = rows.first().map(Vec::len).unwrap_or(0);
        Ok(Self {
            columns: (0..width).map(|i| i.to_string()).collect(),
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn into_array(self) -> ArrayLike {
        ArrayLike::TwoD(self.rows)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
