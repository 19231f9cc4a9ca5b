//! Calibration/evaluation dataset bundle.
//!
//! The bundle is a single JSON document with parallel input and label
//! sequences:
//!
//! ```json
//! { "x": [[0.1, 0.4, 1.0], [0.3, 0.2, 0.0]], "y": [[1.0], [0.0]] }
//! ```
//!
//! Labels may also be given as bare scalars (`"y": [1.0, 0.0]`), which are
//! read as width-one rows. The first input row doubles as the representative
//! sample for latency probing.

use crate::error::{BenchError, Result};
use crate::tensor::Matrix;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One entry of an `x` or `y` sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Entry {
    Scalar(f32),
    Row(Vec<f32>),
}

impl Entry {
    fn into_row(self) -> Vec<f32> {
        match self {
            Self::Scalar(v) => vec![v],
            Self::Row(r) => r,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Bundle {
    x: Vec<Entry>,
    y: Vec<Entry>,
}

/// Immutable evaluation dataset plus the representative latency sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Matrix,
    labels: Matrix,
    sample: Matrix,
}

impl Dataset {
    /// Build a dataset from input and label matrices.
    ///
    /// Input and label row counts are allowed to differ here; that mismatch
    /// is an evaluation failure, reported by
    /// [`MetricEvaluator::evaluate`](crate::evaluator::MetricEvaluator::evaluate).
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Dataset`] if there are no input rows, the inputs
    /// have zero width (no representative sample can be sliced), or labels
    /// are present but have zero width.
    pub fn new(inputs: Matrix, labels: Matrix) -> Result<Self> {
        if inputs.is_empty() {
            return Err(BenchError::Dataset(
                "dataset has no input rows".to_owned(),
            ));
        }
        if inputs.cols() == 0 {
            return Err(BenchError::Dataset(
                "dataset input rows have zero width".to_owned(),
            ));
        }
        if labels.rows() > 0 && labels.cols() == 0 {
            return Err(BenchError::Dataset(
                "dataset label rows have zero width".to_owned(),
            ));
        }
        let sample = inputs.slice_rows(0..1);
        Ok(Self {
            inputs,
            labels,
            sample,
        })
    }

    /// Read a JSON bundle from disk.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Dataset`] if the file is missing, unreadable,
    /// not a valid bundle, or has ragged rows.
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading dataset bundle");
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BenchError::Dataset(format!("failed to read {}: {e}", path.display()))
        })?;
        let dataset = Self::from_json(&raw)?;
        info!(
            inputs = ?dataset.inputs.shape(),
            labels = ?dataset.labels.shape(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse a JSON bundle from a string.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Dataset`] on malformed JSON, missing `x`/`y`,
    /// ragged rows or an empty input sequence.
    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle: Bundle = serde_json::from_str(raw)
            .map_err(|e| BenchError::Dataset(format!("malformed dataset bundle: {e}")))?;
        let inputs = to_matrix("x", bundle.x)?;
        let labels = to_matrix("y", bundle.y)?;
        Self::new(inputs, labels)
    }

    /// All evaluation inputs.
    pub fn inputs(&self) -> &Matrix {
        &self.inputs
    }

    /// All evaluation labels.
    pub fn labels(&self) -> &Matrix {
        &self.labels
    }

    /// Representative single-row input for latency probing.
    pub fn sample(&self) -> &Matrix {
        &self.sample
    }
}

fn to_matrix(field: &str, entries: Vec<Entry>) -> Result<Matrix> {
    let rows: Vec<Vec<f32>> = entries.into_iter().map(Entry::into_row).collect();
    Matrix::from_rows(&rows)
        .ok_or_else(|| BenchError::Dataset(format!("`{field}` has rows of differing width")))
}
