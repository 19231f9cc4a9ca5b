//! Sequential per-variant measurement into one ordered comparison report.
//!
//! Each variant is measured inside a single scoped acquisition of its model
//! handle: load, then footprint, quality and latency against that same
//! handle, then release. Variants run strictly one after another so no
//! latency probe ever competes with another variant's inference.

use crate::artifact::integrity::verify_sha256;
use crate::artifact::{ArtifactLoader, footprint_mb};
use crate::config::{VariantSpec, validate_variants};
use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::evaluator::MetricEvaluator;
use crate::latency::{LatencyStats, ProbeConfig, probe, probe_repeated};
use crate::progress::{ProgressCallback, RunState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Measurements of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Poisson log loss over the whole dataset (lower is better).
    pub quality_score: f64,
    /// Single-inference latency in milliseconds.
    pub latency_ms: f64,
    /// On-disk footprint in megabytes.
    pub size_mb: f64,
}

/// One row of a [`ComparisonReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    #[serde(flatten)]
    pub result: MeasurementResult,
    /// Repeated-probe statistics, present only when extra probes were run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_stats: Option<LatencyStats>,
}

/// Ordered per-variant results; insertion order is evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonReport {
    entries: Vec<ReportEntry>,
}

impl ComparisonReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant's result.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] if `name` is already present.
    pub fn push(&mut self, name: &str, result: MeasurementResult) -> Result<()> {
        self.push_entry(ReportEntry {
            name: name.to_owned(),
            result,
            latency_stats: None,
        })
    }

    /// Append a full entry.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] if the entry's name is already present.
    pub fn push_entry(&mut self, entry: ReportEntry) -> Result<()> {
        if self.get(&entry.name).is_some() {
            return Err(BenchError::Config(format!(
                "variant `{}` is already in the report",
                entry.name
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Variant names in report order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&MeasurementResult> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.result)
    }

    /// `(name, quality_score)` in report order.
    pub fn quality_series(&self) -> Vec<(&str, f64)> {
        self.series(|r| r.quality_score)
    }

    /// `(name, latency_ms)` in report order.
    pub fn latency_series(&self) -> Vec<(&str, f64)> {
        self.series(|r| r.latency_ms)
    }

    /// `(name, size_mb)` in report order.
    pub fn size_series(&self) -> Vec<(&str, f64)> {
        self.series(|r| r.size_mb)
    }

    /// `(name, (latency_ms, quality_score))` in report order.
    pub fn tradeoff_series(&self) -> Vec<(&str, (f64, f64))> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), (e.result.latency_ms, e.result.quality_score)))
            .collect()
    }

    fn series(&self, pick: impl Fn(&MeasurementResult) -> f64) -> Vec<(&str, f64)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), pick(&e.result)))
            .collect()
    }
}

/// Measures every configured variant into a [`ComparisonReport`].
pub struct Aggregator<L: ArtifactLoader> {
    loader: L,
    evaluator: MetricEvaluator,
    repeat_probes: usize,
    state: RunState,
    progress: Option<ProgressCallback>,
}

impl<L: ArtifactLoader> Aggregator<L> {
    pub fn new(loader: L, evaluator: MetricEvaluator) -> Self {
        Self {
            loader,
            evaluator,
            repeat_probes: 0,
            state: RunState::NotStarted,
            progress: None,
        }
    }

    /// Run `n` extra latency probes per variant after the headline probe.
    pub fn with_repeat_probes(mut self, n: usize) -> Self {
        self.repeat_probes = n;
        self
    }

    /// Report every state transition to `callback`.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Measure `variants` in order against `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] for an empty, blank or duplicated
    /// variant list, or the first measurement error wrapped in
    /// [`BenchError::Variant`]. No report is returned on error and no further
    /// variant is measured.
    pub fn aggregate(
        &mut self,
        variants: &[VariantSpec],
        dataset: &Dataset,
    ) -> Result<ComparisonReport> {
        self.transition(RunState::NotStarted);
        if let Err(e) = validate_variants(variants) {
            self.transition(RunState::Aborted { name: None });
            return Err(e);
        }

        let mut report = ComparisonReport::new();
        for (index, variant) in variants.iter().enumerate() {
            self.transition(RunState::Loading {
                index,
                name: variant.name.clone(),
            });

            let entry = match self.measure_variant(index, variant, dataset) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(variant = %variant.name, error = %e, "variant measurement failed, aborting run");
                    self.transition(RunState::Aborted {
                        name: Some(variant.name.clone()),
                    });
                    return Err(BenchError::for_variant(&variant.name, e));
                }
            };

            info!(
                variant = %entry.name,
                quality = entry.result.quality_score,
                latency_ms = entry.result.latency_ms,
                size_mb = entry.result.size_mb,
                "variant measured"
            );
            report.push_entry(entry)?;
        }

        self.transition(RunState::Done);
        Ok(report)
    }

    /// Load once, measure three ways, release.
    fn measure_variant(
        &mut self,
        index: usize,
        variant: &VariantSpec,
        dataset: &Dataset,
    ) -> Result<ReportEntry> {
        if let Some(expected) = &variant.sha256 {
            verify_sha256(&self.loader.model_path(&variant.path), expected)?;
        }
        let mut model = self.loader.load(&variant.path)?;

        self.transition(RunState::Measuring {
            index,
            name: variant.name.clone(),
        });

        let size_mb = footprint_mb(&variant.path)?;
        let quality_score = self.evaluator.evaluate(&mut model, dataset)?;
        let latency_ms = probe(&mut model, dataset.sample())?;
        let latency_stats = if self.repeat_probes > 0 {
            Some(probe_repeated(
                &mut model,
                dataset.sample(),
                ProbeConfig {
                    samples: self.repeat_probes,
                },
            )?)
        } else {
            None
        };

        drop(model);
        debug!(variant = %variant.name, "model handle released");

        Ok(ReportEntry {
            name: variant.name.clone(),
            result: MeasurementResult {
                quality_score,
                latency_ms,
                size_mb,
            },
            latency_stats,
        })
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
        if let Some(cb) = &self.progress {
            cb(&self.state);
        }
    }
}
