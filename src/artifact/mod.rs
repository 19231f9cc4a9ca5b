//! Artifact loading: resolve a variant's storage root to a runnable model
//! handle and to its on-disk footprint.
//!
//! The harness only depends on two things about an artifact: that an
//! [`ArtifactLoader`] can turn its path into an [`InferenceModel`], and that
//! its directory can be sized in bytes ([`footprint_bytes`]).

pub mod footprint;
pub mod integrity;
pub mod onnx;

use crate::error::Result;
use crate::tensor::Matrix;
use std::path::{Path, PathBuf};

pub use footprint::{BYTES_PER_MB, footprint_bytes, footprint_mb};
pub use onnx::{OnnxLoader, OnnxModel};

/// A loaded, runnable model.
pub trait InferenceModel {
    /// Run one forward pass over a batch of input rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the input or inference fails.
    fn infer(&mut self, input: &Matrix) -> Result<Matrix>;
}

impl<M: InferenceModel + ?Sized> InferenceModel for Box<M> {
    fn infer(&mut self, input: &Matrix) -> Result<Matrix> {
        (**self).infer(input)
    }
}

/// Resolves an artifact path to a model handle.
pub trait ArtifactLoader {
    type Model: InferenceModel;

    /// Path of the file a digest check applies to for an artifact rooted
    /// at `root`. Defaults to the root itself.
    fn model_path(&self, root: &Path) -> PathBuf {
        root.to_path_buf()
    }

    /// Load the model stored under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::ArtifactNotFound`](crate::BenchError::ArtifactNotFound)
    /// if `path` does not resolve to a loadable model and
    /// [`BenchError::ArtifactCorrupt`](crate::BenchError::ArtifactCorrupt) if
    /// it resolves but cannot be deserialized.
    fn load(&self, path: &Path) -> Result<Self::Model>;
}
