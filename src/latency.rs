//! Single-inference latency probing.
//!
//! [`probe`] is the measurement contract: one untimed warm-up call on the
//! sample, then one timed call, reported in milliseconds. It does no
//! repetition and no outlier rejection. [`probe_repeated`] is an opt-in
//! superset that calls [`probe`] several times and summarises the results.

use crate::artifact::InferenceModel;
use crate::error::{BenchError, Result};
use crate::tensor::Matrix;
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Instant;
use tracing::debug;

/// Repeated-probe configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Number of [`probe`] invocations to collect.
    pub samples: usize,
}

/// Summary statistics over repeated probes, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub samples: usize,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Measure steady-state latency of one inference on `sample`.
///
/// Performs exactly two inference calls; only the second is timed.
///
/// # Errors
///
/// Returns [`BenchError::Probe`] if `sample` is not a single non-empty row
/// or the model rejects it on either call.
pub fn probe<M: InferenceModel + ?Sized>(model: &mut M, sample: &Matrix) -> Result<f64> {
    if sample.rows() != 1 || sample.cols() == 0 {
        return Err(BenchError::Probe(format!(
            "latency sample must be a single non-empty row, got shape {:?}",
            sample.shape()
        )));
    }

    let warm = model
        .infer(sample)
        .map_err(|e| BenchError::Probe(format!("warm-up inference failed: {e}")))?;
    black_box(warm);

    let start = Instant::now();
    let timed = model.infer(sample);
    let latency_ms = elapsed_ms(start);
    let timed = timed.map_err(|e| BenchError::Probe(format!("timed inference failed: {e}")))?;
    black_box(timed);

    debug!(latency_ms, "latency probe");
    Ok(latency_ms)
}

/// Invoke [`probe`] `config.samples` times and summarise the latencies.
///
/// # Errors
///
/// Returns [`BenchError::Config`] if `config.samples` is zero, or the first
/// probe error.
pub fn probe_repeated<M: InferenceModel + ?Sized>(
    model: &mut M,
    sample: &Matrix,
    config: ProbeConfig,
) -> Result<LatencyStats> {
    validate_config(config)?;

    let mut timings = Vec::with_capacity(config.samples);
    for _ in 0..config.samples {
        timings.push(probe(model, sample)?);
    }
    Ok(build_stats(timings))
}

fn validate_config(config: ProbeConfig) -> Result<()> {
    if config.samples == 0 {
        return Err(BenchError::Config(
            "probe samples must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}

fn build_stats(mut timings_ms: Vec<f64>) -> LatencyStats {
    timings_ms.sort_unstable_by(f64::total_cmp);
    let samples = timings_ms.len();
    let mean_ms = if samples == 0 {
        0.0
    } else {
        timings_ms.iter().sum::<f64>() / samples as f64
    };
    LatencyStats {
        samples,
        p50_ms: percentile(&timings_ms, 50),
        p95_ms: percentile(&timings_ms, 95),
        p99_ms: percentile(&timings_ms, 99),
        mean_ms,
        min_ms: timings_ms.first().copied().unwrap_or(0.0),
        max_ms: timings_ms.last().copied().unwrap_or(0.0),
    }
}

fn percentile(sorted: &[f64], pct: usize) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (sorted.len().saturating_sub(1) * pct) / 100;
    sorted[idx]
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
