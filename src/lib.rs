//! variant-bench: side-by-side benchmarking of model variants.
//!
//! Given a set of named artifacts (for example a float32 student model and
//! its post-training and quantization-aware int8 counterparts), the harness
//! measures each one on three axes and renders the comparison:
//!
//! Artifact → Load → Footprint / Quality / Latency → Report → Charts
//!
//! # Architecture
//!
//! - **Artifact loading**: [`artifact::ArtifactLoader`] resolves a storage
//!   root to an [`artifact::InferenceModel`]; the production loader is ONNX
//!   Runtime via `ort`
//! - **Quality**: [`evaluator::MetricEvaluator`] streams the dataset in
//!   batches into a Poisson log-loss accumulator
//! - **Latency**: [`latency::probe`] warms up once then times a single call
//! - **Aggregation**: [`aggregate::Aggregator`] measures variants strictly in
//!   sequence, one model handle at a time
//! - **Rendering**: [`report::ReportRenderer`] writes bar and trade-off
//!   charts through the `bench-charts` crate

pub mod aggregate;
pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod latency;
pub mod metric;
pub mod progress;
pub mod report;
pub mod runner;
pub mod tensor;

pub use aggregate::{Aggregator, ComparisonReport, MeasurementResult, ReportEntry};
pub use artifact::{ArtifactLoader, InferenceModel, OnnxLoader};
pub use config::{BenchConfig, VariantSpec};
pub use dataset::Dataset;
pub use error::{BenchError, Result};
pub use evaluator::MetricEvaluator;
pub use progress::{ProgressCallback, RunState};
pub use report::{PngReportRenderer, ReportRenderer};
pub use runner::{RunOutcome, run, run_with};
pub use tensor::Matrix;
