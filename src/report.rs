//! Report rendering and the JSON summary.
//!
//! [`ReportRenderer`] is the seam between the harness and whatever turns a
//! [`ComparisonReport`] into charts. [`PngReportRenderer`] is the production
//! implementation backed by `bench-charts`.

use crate::aggregate::{ComparisonReport, ReportEntry};
use crate::error::{BenchError, Result};
use bench_charts::{ChartOptions, ChartRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the JSON summary written next to the charts.
pub const SUMMARY_FILE: &str = "comparison_report.json";

/// Turns a finished report into output artifacts.
pub trait ReportRenderer {
    /// Produce the quality, latency, size and trade-off charts for `report`,
    /// keyed by the report's variant order. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Render`] if any chart cannot be produced.
    fn render(&mut self, report: &ComparisonReport) -> Result<Vec<PathBuf>>;
}

/// Writes the four comparison charts as PNG files.
#[derive(Debug, Clone)]
pub struct PngReportRenderer {
    out_dir: PathBuf,
    options: ChartOptions,
}

impl PngReportRenderer {
    pub fn new(out_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            out_dir: out_dir.into(),
            options: ChartOptions { width, height },
        }
    }
}

impl ReportRenderer for PngReportRenderer {
    fn render(&mut self, report: &ComparisonReport) -> Result<Vec<PathBuf>> {
        let rows = chart_rows(report);
        let paths = bench_charts::write_charts(&rows, &self.out_dir, self.options)?;
        info!(charts = paths.len(), dir = %self.out_dir.display(), "report charts written");
        Ok(paths)
    }
}

/// Report entries as chart rows, in report order.
pub fn chart_rows(report: &ComparisonReport) -> Vec<ChartRow> {
    report
        .entries()
        .iter()
        .map(|e| ChartRow {
            label: e.name.clone(),
            quality: e.result.quality_score,
            latency_ms: e.result.latency_ms,
            size_mb: e.result.size_mb,
        })
        .collect()
}

/// Variants not dominated on the quality/latency plane, in report order.
///
/// Lower is better on both axes. A variant is dominated when another one is
/// at least as good on both and strictly better on one.
pub fn pareto_front(report: &ComparisonReport) -> Vec<&str> {
    let points = report.tradeoff_series();
    points
        .iter()
        .filter(|(_, (lat, q))| {
            !points.iter().any(|(_, (other_lat, other_q))| {
                other_lat <= lat && other_q <= q && (other_lat < lat || other_q < q)
            })
        })
        .map(|(name, _)| *name)
        .collect()
}

/// Machine-readable run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub batch_size: usize,
    pub variants: Vec<ReportEntry>,
    pub pareto_front: Vec<String>,
}

impl ReportSummary {
    pub fn new(report: &ComparisonReport, batch_size: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            batch_size,
            variants: report.entries().to_vec(),
            pareto_front: pareto_front(report)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Write a summary as pretty JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn write_summary(summary: &ReportSummary, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| BenchError::Render(format!("failed to serialize report summary: {e}")))?;
    std::fs::write(output, json)?;
    Ok(())
}
