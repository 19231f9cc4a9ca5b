//! Shared helpers for integration tests.
//!
//! Scripted stand-ins for ONNX artifacts: every variant directory holds a
//! sparse `model.bin` of the requested size, and the loader hands out a
//! model that predicts a constant and sleeps for a fixed time per call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use variant_bench::artifact::BYTES_PER_MB;
use variant_bench::{
    ArtifactLoader, BenchConfig, BenchError, ComparisonReport, InferenceModel, Matrix,
    ReportRenderer, Result, VariantSpec,
};

/// How a scripted variant behaves once loaded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Script {
    /// Constant prediction for every output.
    pub prediction: f32,
    /// Sleep per inference call.
    pub delay: Duration,
}

impl Script {
    pub(crate) fn new(prediction: f32, delay_ms: f64) -> Self {
        Self {
            prediction,
            delay: Duration::from_secs_f64(delay_ms / 1000.0),
        }
    }
}

/// Model produced by [`ScriptedLoader`]; counts its own calls.
pub(crate) struct ScriptedModel {
    script: Script,
    calls: Rc<RefCell<usize>>,
}

impl InferenceModel for ScriptedModel {
    fn infer(&mut self, input: &Matrix) -> Result<Matrix> {
        *self.calls.borrow_mut() += 1;
        std::thread::sleep(self.script.delay);
        Matrix::new(input.rows(), 1, vec![self.script.prediction; input.rows()])
    }
}

/// Serves scripted models per artifact directory. Directories without a
/// script load as corrupt.
#[derive(Default)]
pub(crate) struct ScriptedLoader {
    scripts: HashMap<PathBuf, Script>,
    /// Artifact roots in load order.
    pub loads: Rc<RefCell<Vec<PathBuf>>>,
    /// Inference calls per artifact root.
    pub calls: Rc<RefCell<HashMap<PathBuf, Rc<RefCell<usize>>>>>,
}

impl ScriptedLoader {
    pub(crate) fn insert(&mut self, root: &Path, script: Script) {
        self.scripts.insert(root.to_path_buf(), script);
    }
}

impl ArtifactLoader for ScriptedLoader {
    type Model = ScriptedModel;

    fn model_path(&self, root: &Path) -> PathBuf {
        root.join("model.bin")
    }

    fn load(&self, path: &Path) -> Result<ScriptedModel> {
        self.loads.borrow_mut().push(path.to_path_buf());
        let script = self
            .scripts
            .get(path)
            .copied()
            .ok_or_else(|| BenchError::ArtifactCorrupt {
                path: path.join("model.bin"),
                reason: "graph could not be deserialized".to_owned(),
            })?;
        let calls = Rc::clone(
            self.calls
                .borrow_mut()
                .entry(path.to_path_buf())
                .or_default(),
        );
        Ok(ScriptedModel { script, calls })
    }
}

/// Captures every report it is asked to render.
#[derive(Default)]
pub(crate) struct RecordingRenderer {
    pub reports: Vec<ComparisonReport>,
}

impl RecordingRenderer {
    pub(crate) fn calls(&self) -> usize {
        self.reports.len()
    }
}

impl ReportRenderer for RecordingRenderer {
    fn render(&mut self, report: &ComparisonReport) -> Result<Vec<PathBuf>> {
        self.reports.push(report.clone());
        Ok(Vec::new())
    }
}

/// Create `root/<name>/model.bin` as a sparse file of `size_mb` MB.
pub(crate) fn write_artifact(root: &Path, name: &str, size_mb: u64) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).expect("create artifact dir");
    let file = File::create(dir.join("model.bin")).expect("create model file");
    file.set_len(size_mb * BYTES_PER_MB as u64)
        .expect("size model file");
    dir
}

/// Write a dataset bundle whose labels are all zero, so a constant
/// prediction `p` scores exactly `p`.
pub(crate) fn write_zero_label_dataset(root: &Path, rows: usize) -> PathBuf {
    let x: Vec<Vec<f32>> = (0..rows).map(|i| vec![i as f32, 1.0, 0.5]).collect();
    let y = vec![0.0_f32; rows];
    let path = root.join("calibration.json");
    let body = serde_json::json!({ "x": x, "y": y });
    std::fs::write(&path, body.to_string()).expect("write dataset");
    path
}

/// A config rooted entirely inside `root`.
pub(crate) fn config_in(root: &Path, dataset: PathBuf, variants: Vec<VariantSpec>) -> BenchConfig {
    let mut config = BenchConfig::default();
    config.dataset.path = dataset;
    config.output.dir = root.join("report");
    config.variants = variants;
    config
}

/// Build artifacts, scripts and config for `(name, size_mb, script)` rows.
/// A `None` script makes that variant load as corrupt.
pub(crate) fn scenario(
    root: &Path,
    rows: &[(&str, u64, Option<Script>)],
) -> (BenchConfig, ScriptedLoader) {
    let mut loader = ScriptedLoader::default();
    let mut variants = Vec::new();
    for &(name, size_mb, script) in rows {
        let dir = write_artifact(root, name, size_mb);
        if let Some(script) = script {
            loader.insert(&dir, script);
        }
        variants.push(VariantSpec::new(name, dir));
    }
    let dataset = write_zero_label_dataset(root, 16);
    (config_in(root, dataset, variants), loader)
}
