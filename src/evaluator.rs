//! Quality scoring of a model handle over the evaluation dataset.

use crate::artifact::InferenceModel;
use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::metric::PoissonAccumulator;
use tracing::debug;

/// Inference batch size used when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 512;

/// Runs a model over a dataset in fixed-size batches and scores it with
/// Poisson log loss (lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricEvaluator {
    batch_size: usize,
}

impl Default for MetricEvaluator {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl MetricEvaluator {
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] if `batch_size` is zero.
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(BenchError::Config(
                "evaluation batch size must be greater than zero".to_owned(),
            ));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Score `model` over every (input, label) pair of `dataset`.
    ///
    /// The dataset is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Evaluation`] if input and label counts differ,
    /// a batch's predictions do not match its labels in shape, or inference
    /// fails. No partial score is returned.
    pub fn evaluate<M: InferenceModel + ?Sized>(
        &self,
        model: &mut M,
        dataset: &Dataset,
    ) -> Result<f64> {
        let inputs = dataset.inputs();
        let labels = dataset.labels();
        if inputs.rows() != labels.rows() {
            return Err(BenchError::Evaluation(format!(
                "dataset has {} inputs but {} labels",
                inputs.rows(),
                labels.rows()
            )));
        }

        let mut acc = PoissonAccumulator::new();
        for (index, (x, y)) in inputs
            .batches(self.batch_size)
            .zip(labels.batches(self.batch_size))
            .enumerate()
        {
            let predictions = model.infer(&x).map_err(|e| {
                BenchError::Evaluation(format!("inference failed on batch {index}: {e}"))
            })?;
            acc.update(&y, &predictions).map_err(|e| match e {
                BenchError::Evaluation(msg) => {
                    BenchError::Evaluation(format!("batch {index}: {msg}"))
                }
                other => other,
            })?;
            debug!(batch = index, rows = x.rows(), "batch scored");
        }

        acc.finalize()
    }
}
