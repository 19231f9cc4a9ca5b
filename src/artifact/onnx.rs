//! ONNX Runtime artifact backend.
//!
//! Each variant directory holds one ONNX graph (`model.onnx` by default)
//! taking a single `f32` input of shape `[batch, features]` and producing
//! `f32` predictions of shape `[batch, outputs]` as its first output.

use super::{ArtifactLoader, InferenceModel};
use crate::config::OnnxConfig;
use crate::error::{BenchError, Result};
use crate::tensor::Matrix;
use ort::session::{Session, SessionInputValue, SessionInputs};
use ort::value::Tensor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads ONNX variants from their artifact directories.
#[derive(Debug, Clone)]
pub struct OnnxLoader {
    model_file: String,
    input_name: String,
    intra_threads: usize,
}

impl OnnxLoader {
    pub fn new(config: &OnnxConfig) -> Self {
        Self {
            model_file: config.model_file.clone(),
            input_name: config.input_name.clone(),
            intra_threads: config.intra_threads.max(1),
        }
    }
}

impl Default for OnnxLoader {
    fn default() -> Self {
        Self::new(&OnnxConfig::default())
    }
}

impl ArtifactLoader for OnnxLoader {
    type Model = OnnxModel;

    fn model_path(&self, root: &Path) -> PathBuf {
        root.join(&self.model_file)
    }

    fn load(&self, path: &Path) -> Result<OnnxModel> {
        if !path.is_dir() {
            return Err(BenchError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        let model_path = self.model_path(path);
        if !model_path.is_file() {
            return Err(BenchError::ArtifactNotFound { path: model_path });
        }

        info!("loading ONNX model: {}", model_path.display());
        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(self.intra_threads))
            .and_then(|b| b.commit_from_file(&model_path))
            .map_err(|e| BenchError::ArtifactCorrupt {
                path: model_path.clone(),
                reason: e.to_string(),
            })?;

        Ok(OnnxModel {
            session,
            input_name: self.input_name.clone(),
        })
    }
}

/// A loaded ONNX session.
pub struct OnnxModel {
    session: Session,
    input_name: String,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl InferenceModel for OnnxModel {
    fn infer(&mut self, input: &Matrix) -> Result<Matrix> {
        let rows = input.rows();
        let tensor = Tensor::from_array(([rows, input.cols()], input.as_slice().to_vec()))
            .map_err(|e| BenchError::Inference(format!("failed to create input tensor: {e}")))?;

        let mut feed: HashMap<String, SessionInputValue> = HashMap::new();
        feed.insert(self.input_name.clone(), tensor.into());

        let outputs = self
            .session
            .run(SessionInputs::from(feed))
            .map_err(|e| BenchError::Inference(format!("ONNX inference failed: {e}")))?;

        let (_shape, data) = outputs[0_usize]
            .try_extract_tensor::<f32>()
            .map_err(|e| BenchError::Inference(format!("failed to extract output tensor: {e}")))?;

        if rows == 0 {
            return Matrix::new(0, 0, Vec::new());
        }
        if data.len() % rows != 0 {
            return Err(BenchError::Inference(format!(
                "output of {} values does not split into {rows} rows",
                data.len()
            )));
        }
        Matrix::new(rows, data.len() / rows, data.to_vec())
    }
}
