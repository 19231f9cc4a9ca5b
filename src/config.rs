//! Configuration types for a benchmarking run.
//!
//! Every field has a static default, so the harness runs with no config
//! file at all: three variants (`fp32`, `ptq`, `qat`) under `models/`, the
//! calibration bundle under `data/`, charts written to the working
//! directory.

use crate::error::{BenchError, Result};
use crate::evaluator::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level configuration for a benchmarking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Evaluation dataset settings.
    pub dataset: DatasetConfig,
    /// Quality scoring settings.
    pub evaluation: EvaluationConfig,
    /// Latency probing settings.
    pub latency: LatencyConfig,
    /// ONNX Runtime loader settings.
    pub onnx: OnnxConfig,
    /// Report output settings.
    pub output: OutputConfig,
    /// Variants to compare, in report order.
    pub variants: Vec<VariantSpec>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            evaluation: EvaluationConfig::default(),
            latency: LatencyConfig::default(),
            onnx: OnnxConfig::default(),
            output: OutputConfig::default(),
            variants: vec![
                VariantSpec::new("fp32", "models/fp32_student/"),
                VariantSpec::new("ptq", "models/ptq_int8/"),
                VariantSpec::new("qat", "models/qat_int8/"),
            ],
        }
    }
}

/// One model variant to measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Report label (e.g. `"fp32"`). Must be unique within a run.
    pub name: String,
    /// Artifact storage root.
    pub path: PathBuf,
    /// Expected SHA-256 hex digest of the model file. `None` skips the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl VariantSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            sha256: None,
        }
    }
}

/// Evaluation dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// JSON bundle with parallel `x` / `y` sequences.
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/calibration.json"),
        }
    }
}

/// Quality scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Rows per inference batch.
    pub batch_size: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Latency probing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Extra probes per variant, summarised as percentiles in the report.
    ///
    /// `0` keeps the single warm-up-then-measure contract only. The headline
    /// latency is always that single probe; repeated probes run after it.
    pub repeat_probes: usize,
}

/// ONNX Runtime loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OnnxConfig {
    /// Model file name inside each artifact directory.
    pub model_file: String,
    /// Name of the graph's input tensor.
    pub input_name: String,
    /// Intra-op thread count for each session.
    pub intra_threads: usize,
}

impl Default for OnnxConfig {
    fn default() -> Self {
        Self {
            model_file: "model.onnx".to_owned(),
            input_name: "input".to_owned(),
            intra_threads: 4,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the charts, JSON summary and run log.
    pub dir: PathBuf,
    /// Chart width in pixels.
    pub chart_width: u32,
    /// Chart height in pixels.
    pub chart_height: u32,
    /// Also write `comparison_report.json`.
    pub write_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            chart_width: 700,
            chart_height: 500,
            write_json: true,
        }
    }
}

impl BenchConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BenchError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| BenchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    ///
    /// `$VARIANT_BENCH_CONFIG_DIR/config.toml` when set, otherwise
    /// `<platform config dir>/variant-bench/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(dir) = std::env::var_os("VARIANT_BENCH_CONFIG_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        dirs::config_dir()
            .map(|d| d.join("variant-bench"))
            .unwrap_or_else(|| PathBuf::from("/tmp/variant-bench-config"))
            .join("config.toml")
    }

    /// Check the configuration before any artifact is touched.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] for an empty or duplicated variant
    /// name, an empty variant list, or zero batch size / chart dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.evaluation.batch_size == 0 {
            return Err(BenchError::Config(
                "evaluation.batch_size must be greater than zero".to_owned(),
            ));
        }
        if self.output.chart_width == 0 || self.output.chart_height == 0 {
            return Err(BenchError::Config(
                "chart dimensions must be greater than zero".to_owned(),
            ));
        }
        validate_variants(&self.variants)
    }
}

/// Variant names must be non-empty and unique, and at least one variant
/// must be configured.
///
/// # Errors
///
/// Returns [`BenchError::Config`] describing the first offending entry.
pub fn validate_variants(variants: &[VariantSpec]) -> Result<()> {
    if variants.is_empty() {
        return Err(BenchError::Config("no variants configured".to_owned()));
    }
    let mut seen = HashSet::with_capacity(variants.len());
    for variant in variants {
        if variant.name.trim().is_empty() {
            return Err(BenchError::Config(format!(
                "variant at {} has an empty name",
                variant.path.display()
            )));
        }
        if !seen.insert(variant.name.as_str()) {
            return Err(BenchError::Config(format!(
                "duplicate variant name `{}`",
                variant.name
            )));
        }
    }
    Ok(())
}
