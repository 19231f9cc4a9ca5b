//! Cumulative Poisson log-loss accumulator.
//!
//! Per sample the loss is `mean_j(p_j - y_j * ln(p_j + EPSILON))` over that
//! sample's outputs. The dataset score is the mean of the per-sample losses
//! over every sample seen, held as a running sum and count. Batches of any
//! size feed the same statistic, so the final score does not depend on how
//! the dataset was split.

use crate::error::{BenchError, Result};
use crate::tensor::Matrix;

/// Fuzz factor added to predictions inside the logarithm.
pub const EPSILON: f64 = 1e-7;

/// Running Poisson log-loss sums across batches.
///
/// The score is only observable through [`PoissonAccumulator::finalize`],
/// which consumes the accumulator.
#[derive(Debug, Default)]
pub struct PoissonAccumulator {
    loss_sum: f64,
    samples: u64,
}

impl PoissonAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one batch of labels and predictions.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Evaluation`] if the two shapes differ. The
    /// accumulator is left unchanged in that case.
    pub fn update(&mut self, labels: &Matrix, predictions: &Matrix) -> Result<()> {
        if labels.shape() != predictions.shape() {
            return Err(BenchError::Evaluation(format!(
                "prediction shape {:?} does not match label shape {:?}",
                predictions.shape(),
                labels.shape()
            )));
        }
        if labels.cols() == 0 {
            if labels.rows() == 0 {
                return Ok(());
            }
            return Err(BenchError::Evaluation(
                "labels have zero width".to_owned(),
            ));
        }

        let width = labels.cols() as f64;
        let mut batch_sum = 0.0_f64;
        for (y_row, p_row) in labels
            .as_slice()
            .chunks_exact(labels.cols())
            .zip(predictions.as_slice().chunks_exact(predictions.cols()))
        {
            let row_loss: f64 = y_row
                .iter()
                .zip(p_row)
                .map(|(&y, &p)| {
                    let (y, p) = (f64::from(y), f64::from(p));
                    p - y * (p + EPSILON).ln()
                })
                .sum();
            batch_sum += row_loss / width;
        }
        self.loss_sum += batch_sum;
        self.samples += labels.rows() as u64;
        Ok(())
    }

    /// Number of samples accumulated so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Convert the running sums into the final score.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Evaluation`] if no samples were accumulated or
    /// the score is not finite.
    pub fn finalize(self) -> Result<f64> {
        if self.samples == 0 {
            return Err(BenchError::Evaluation(
                "no samples were scored".to_owned(),
            ));
        }
        let score = self.loss_sum / self.samples as f64;
        if !score.is_finite() {
            return Err(BenchError::Evaluation(format!(
                "poisson loss is not finite ({score}); predictions must be non-negative"
            )));
        }
        Ok(score)
    }
}
