//! CLI binary for variant-bench.
//!
//! Measures every configured variant, then writes the comparison charts and
//! JSON summary into the output directory. Diagnostics go to stderr and to
//! `variant-bench.log` next to the charts.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use variant_bench::{BenchConfig, ProgressCallback, RunState};

const LOG_FILE: &str = "variant-bench.log";
const DEFAULT_FILTER: &str = "variant_bench=info,bench_charts=info,ort=warn";

/// Compare quality, latency and footprint of model variants.
#[derive(Parser)]
#[command(name = "variant-bench", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for charts, summary and log (overrides the config file).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Extra latency probes per variant, reported as percentiles.
    #[arg(short, long)]
    repeat: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        BenchConfig::from_file(path)?
    } else {
        BenchConfig::default()
    };
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if let Some(n) = cli.repeat {
        config.latency.repeat_probes = n;
    }

    let _log_guard = init_tracing(&config.output.dir)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        variants = config.variants.len(),
        "variant-bench starting"
    );

    let bar = progress_bar(config.variants.len());
    let outcome = variant_bench::run(&config, Some(progress_callback(bar))).map_err(|e| {
        tracing::error!(error = %e, "run failed");
        anyhow::anyhow!(e)
    })?;

    println!();
    for entry in outcome.report.entries() {
        println!(
            "{:<12} quality {:>10.6}  latency {:>9.3} ms  size {:>9.2} MB",
            entry.name, entry.result.quality_score, entry.result.latency_ms, entry.result.size_mb
        );
    }
    for path in outcome.charts.iter().chain(outcome.summary.iter()) {
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Stderr plus a plain-text file log in the output directory.
fn init_tracing(out_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(out_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(out_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();
    Ok(guard)
}

fn progress_bar(variants: usize) -> ProgressBar {
    let pb = ProgressBar::new(variants as u64);
    if let Ok(style) = ProgressStyle::with_template("  {msg:<24} [{bar:30}] {pos}/{len}") {
        pb.set_style(style);
    }
    pb
}

fn progress_callback(pb: ProgressBar) -> ProgressCallback {
    Box::new(move |state| match state {
        RunState::NotStarted => pb.set_position(0),
        RunState::Loading { index, name } => {
            pb.set_position(*index as u64);
            pb.set_message(format!("loading {name}"));
        }
        RunState::Measuring { name, .. } => pb.set_message(format!("measuring {name}")),
        RunState::Done => {
            if let Some(len) = pb.length() {
                pb.set_position(len);
            }
            pb.finish_with_message("done");
        }
        RunState::Aborted { name } => {
            let msg = match name {
                Some(name) => format!("aborted at {name}"),
                None => "aborted".to_owned(),
            };
            pb.abandon_with_message(msg);
        }
    })
}
