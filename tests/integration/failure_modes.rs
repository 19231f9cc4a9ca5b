//! Fatal errors abort the run before anything is rendered.

use crate::helpers::{RecordingRenderer, Script, scenario};
use variant_bench::{BenchError, run_with};

#[test]
fn corrupt_second_variant_leaves_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let (config, loader) = scenario(
        dir.path(),
        &[
            ("fp32", 4, Some(Script::new(0.10, 0.0))),
            ("ptq", 1, None),
            ("qat", 1, Some(Script::new(0.11, 0.0))),
        ],
    );
    let loads = std::rc::Rc::clone(&loader.loads);
    let mut renderer = RecordingRenderer::default();

    let err = run_with(&config, loader, &mut renderer, None).unwrap_err();

    assert_eq!(err.variant_name(), Some("ptq"));
    assert!(matches!(err.root(), BenchError::ArtifactCorrupt { .. }));
    assert!(err.to_string().contains("ptq"));
    assert_eq!(renderer.calls(), 0);
    assert_eq!(loads.borrow().len(), 2, "qat must not be loaded");
    assert!(!config.output.dir.join("comparison_report.json").exists());
}

#[test]
fn unknown_artifact_root_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(dir.path(), &[("fp32", 1, Some(Script::new(0.1, 0.0)))]);
    config.variants[0].path = dir.path().join("never-built");
    let mut renderer = RecordingRenderer::default();

    let err = run_with(&config, loader, &mut renderer, None).unwrap_err();
    assert_eq!(err.variant_name(), Some("fp32"));
    assert_eq!(renderer.calls(), 0);
}

#[test]
fn mismatched_dataset_lengths_fail_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(dir.path(), &[("fp32", 1, Some(Script::new(0.1, 0.0)))]);
    let path = dir.path().join("short_labels.json");
    std::fs::write(&path, r#"{"x": [[1.0], [2.0], [3.0]], "y": [0.0, 1.0]}"#).unwrap();
    config.dataset.path = path;
    let mut renderer = RecordingRenderer::default();

    let err = run_with(&config, loader, &mut renderer, None).unwrap_err();
    assert!(matches!(err.root(), BenchError::Evaluation(_)));
    assert_eq!(renderer.calls(), 0);
}

#[test]
fn digest_mismatch_stops_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(dir.path(), &[("qat", 1, Some(Script::new(0.1, 0.0)))]);
    config.variants[0].sha256 = Some("f".repeat(64));
    let loads = std::rc::Rc::clone(&loader.loads);

    let err = run_with(&config, loader, &mut RecordingRenderer::default(), None).unwrap_err();
    assert!(matches!(err.root(), BenchError::ArtifactCorrupt { .. }));
    assert!(loads.borrow().is_empty());
}

#[test]
fn matching_digest_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(dir.path(), &[("qat", 1, Some(Script::new(0.1, 0.0)))]);
    let model = config.variants[0].path.join("model.bin");
    let digest = variant_bench::artifact::integrity::sha256_hex(&model).unwrap();
    config.variants[0].sha256 = Some(digest.to_uppercase());

    let outcome = run_with(&config, loader, &mut RecordingRenderer::default(), None).unwrap();
    assert_eq!(outcome.report.names(), ["qat"]);
}

#[test]
fn zero_width_labels_fail_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(dir.path(), &[("fp32", 1, Some(Script::new(0.1, 0.0)))]);
    let path = dir.path().join("empty_labels.json");
    std::fs::write(&path, r#"{"x": [[1.0], [2.0]], "y": [[], []]}"#).unwrap();
    config.dataset.path = path;
    let loads = std::rc::Rc::clone(&loader.loads);

    let err = run_with(&config, loader, &mut RecordingRenderer::default(), None).unwrap_err();
    assert!(matches!(err, BenchError::Dataset(_)));
    assert!(loads.borrow().is_empty());
}
