//! End-to-end comparison run: dataset → measurements → charts → summary.
//!
//! Rendering only starts once every variant has been measured; a failed
//! run produces no report and never reaches the renderer.

use crate::aggregate::{Aggregator, ComparisonReport};
use crate::artifact::{ArtifactLoader, OnnxLoader};
use crate::config::BenchConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::evaluator::MetricEvaluator;
use crate::progress::ProgressCallback;
use crate::report::{PngReportRenderer, ReportRenderer, ReportSummary, SUMMARY_FILE, write_summary};
use std::path::PathBuf;
use tracing::info;

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: ComparisonReport,
    /// Chart files in quality, latency, size, trade-off order.
    pub charts: Vec<PathBuf>,
    /// JSON summary path, when enabled.
    pub summary: Option<PathBuf>,
}

/// Run the full comparison with the ONNX loader and PNG charts.
///
/// # Errors
///
/// Returns the first configuration, dataset, measurement or render error.
pub fn run(config: &BenchConfig, progress: Option<ProgressCallback>) -> Result<RunOutcome> {
    let loader = OnnxLoader::new(&config.onnx);
    let mut renderer = PngReportRenderer::new(
        &config.output.dir,
        config.output.chart_width,
        config.output.chart_height,
    );
    run_with(config, loader, &mut renderer, progress)
}

/// Run the full comparison with an explicit loader and renderer.
///
/// # Errors
///
/// Returns the first configuration, dataset, measurement or render error.
pub fn run_with<L, R>(
    config: &BenchConfig,
    loader: L,
    renderer: &mut R,
    progress: Option<ProgressCallback>,
) -> Result<RunOutcome>
where
    L: ArtifactLoader,
    R: ReportRenderer + ?Sized,
{
    config.validate()?;
    let dataset = Dataset::load(&config.dataset.path)?;
    let evaluator = MetricEvaluator::new(config.evaluation.batch_size)?;

    let mut aggregator =
        Aggregator::new(loader, evaluator).with_repeat_probes(config.latency.repeat_probes);
    if let Some(cb) = progress {
        aggregator = aggregator.with_progress(cb);
    }

    info!(variants = config.variants.len(), "starting comparison run");
    let report = aggregator.aggregate(&config.variants, &dataset)?;

    let charts = renderer.render(&report)?;

    let summary = if config.output.write_json {
        let path = config.output.dir.join(SUMMARY_FILE);
        write_summary(
            &ReportSummary::new(&report, evaluator.batch_size()),
            &path,
        )?;
        info!(path = %path.display(), "report summary written");
        Some(path)
    } else {
        None
    };

    Ok(RunOutcome {
        report,
        charts,
        summary,
    })
}
