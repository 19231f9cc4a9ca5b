//! # bench-charts
//!
//! PNG comparison charts for variant-bench reports.
//!
//! The harness hands this crate an ordered list of [`ChartRow`]s (one per
//! measured model variant) and gets back four charts:
//!
//! - `accuracy_comparison.png` - quality score by variant
//! - `latency_comparison.png` - single-inference latency by variant
//! - `model_size_comparison.png` - on-disk footprint by variant
//! - `quality_vs_latency.png` - quality against latency (trade-off curve)
//!
//! Every chart keeps the row order it was given. Rasterisation goes through
//! `canvas_renderer::chart`, PNG encoding through `image`.

pub mod chart;
pub mod error;
pub mod render;

pub use chart::{ChartKind, ChartRow, chart_payload};
pub use error::{ChartError, Result};
pub use render::{ChartOptions, render_all, render_chart_png, write_charts};
