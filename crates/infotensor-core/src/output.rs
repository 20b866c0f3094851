//! Metric results.
//!
//! Every metric reports one of three shapes: a single number, a vector keyed
//! by label (or label pair), or a matrix with named rows and columns.

use serde::Serialize;

/// Result of a metric evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricOutput {
    Scalar {
        value: f64,
    },
    Vector {
        keys: Vec<String>,
        values: Vec<f64>,
    },
    /// `values[r][c]` belongs to `rows[r]` and `columns[c]`.
    Matrix {
        rows: Vec<String>,
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
    },
}

impl MetricOutput {
    pub fn scalar(value: f64) -> Self {
        Self::Scalar { value }
    }

    /// Build a keyed vector from `(key, value)` pairs.
    pub fn vector<K: Into<String>>(entries: impl IntoIterator<Item = (K, f64)>) -> Self {
        let (keys, values) = entries.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self::Vector { keys, values }
    }

    pub fn matrix(rows: Vec<String>, columns: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(rows.len(), values.len());
        Self::Matrix {
            rows,
            columns,
            values,
        }
    }

    /// The value of a scalar result.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar { value } => Some(*value),
            _ => None,
        }
    }

    /// The entry `key` of a vector result.
    pub fn get(&self, key: &str) -> Option<f64> {
        match self {
            Self::Vector { keys, values } => {
                keys.iter().position(|k| k == key).map(|i| values[i])
            }
            _ => None,
        }
    }

    /// The cell at (`row`, `column`) of a matrix result.
    pub fn cell(&self, row: &str, column: &str) -> Option<f64> {
        match self {
            Self::Matrix {
                rows,
                columns,
                values,
            } => {
                let r = rows.iter().position(|k| k == row)?;
                let c = columns.iter().position(|k| k == column)?;
                values.get(r)?.get(c).copied()
            }
            _ => None,
        }
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar { .. } => 1,
            Self::Vector { values, .. } => values.len(),
            Self::Matrix { values, .. } => values.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
