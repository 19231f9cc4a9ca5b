//! Dense row-major `f32` matrix used for model inputs, labels and outputs.

use crate::error::{BenchError, Result};
use std::ops::Range;

/// Row-major 2-D `f32` tensor of shape `[rows, cols]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Build a matrix from flat row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Inference`] if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            BenchError::Inference(format!("matrix shape [{rows}, {cols}] overflows"))
        })?;
        if data.len() != expected {
            return Err(BenchError::Inference(format!(
                "matrix shape [{rows}, {cols}] needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from nested rows. All rows must share one width.
    ///
    /// Returns `None` for ragged input. An empty `rows` yields a `[0, 0]`
    /// matrix.
    pub fn from_rows(rows: &[Vec<f32>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let data = rows.iter().flatten().copied().collect();
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Flat row-major values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// A single row, or `None` when out of bounds.
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Copy a contiguous range of rows into a new matrix.
    ///
    /// The range is clamped to the number of rows.
    pub fn slice_rows(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.rows);
        let start = range.start.min(end);
        Self {
            rows: end - start,
            cols: self.cols,
            data: self.data[start * self.cols..end * self.cols].to_vec(),
        }
    }

    /// Iterate over row-aligned chunks of at most `batch_rows` rows.
    ///
    /// `batch_rows` of zero is treated as one.
    pub fn batches(&self, batch_rows: usize) -> impl Iterator<Item = Matrix> + '_ {
        let step = batch_rows.max(1);
        (0..self.rows)
            .step_by(step)
            .map(move |start| self.slice_rows(start..start + step))
    }
}
