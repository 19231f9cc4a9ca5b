//! Error types for the benchmarking harness.
//!
//! Every error is fatal to a run: the harness never retries, never
//! substitutes a default measurement and never continues with the remaining
//! variants once one has failed.

use std::path::PathBuf;

/// Top-level error type for variant benchmarking.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The artifact path does not resolve to a loadable model.
    #[error("artifact not found: {}", .path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The artifact exists but its stored model cannot be deserialized.
    #[error("artifact corrupt: {}: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Quality scoring failed (length or shape mismatch, failed inference).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Latency probing failed (incompatible sample shape, failed inference).
    #[error("probe error: {0}")]
    Probe(String),

    /// The calibration/evaluation bundle is missing or malformed.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Raw inference backend failure.
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Report rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// A measurement failed for the named variant.
    #[error("variant `{name}` failed: {source}")]
    Variant {
        name: String,
        #[source]
        source: Box<BenchError>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Attach the identifying variant name to an error.
    pub fn for_variant(name: &str, source: BenchError) -> Self {
        Self::Variant {
            name: name.to_owned(),
            source: Box::new(source),
        }
    }

    /// Name of the variant this error belongs to, if any.
    pub fn variant_name(&self) -> Option<&str> {
        match self {
            Self::Variant { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The underlying error with any variant wrapper removed.
    pub fn root(&self) -> &BenchError {
        match self {
            Self::Variant { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<bench_charts::ChartError> for BenchError {
    fn from(e: bench_charts::ChartError) -> Self {
        Self::Render(e.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BenchError>;
