//! A config saved to TOML drives the same run when loaded back.

use crate::helpers::{RecordingRenderer, Script, scenario};
use std::sync::{Arc, Mutex};
use variant_bench::{BenchConfig, BenchError, ProgressCallback, RunState, run_with};

#[test]
fn saved_config_drives_identical_run() {
    let dir = tempfile::tempdir().unwrap();
    let (config, loader) = scenario(
        dir.path(),
        &[
            ("fp32", 2, Some(Script::new(0.3, 0.0))),
            ("ptq", 1, Some(Script::new(0.4, 2.0))),
        ],
    );
    let path = dir.path().join("bench.toml");
    config.save_to_file(&path).unwrap();
    let loaded = BenchConfig::from_file(&path).unwrap();
    assert_eq!(loaded.variants, config.variants);
    assert_eq!(loaded.dataset.path, config.dataset.path);

    let outcome = run_with(&loaded, loader, &mut RecordingRenderer::default(), None).unwrap();
    assert_eq!(outcome.report.names(), ["fp32", "ptq"]);

    let summary = outcome.summary.unwrap();
    let raw = std::fs::read_to_string(summary).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["batch_size"], 512);
    assert_eq!(json["variants"][1]["name"], "ptq");
    assert_eq!(json["pareto_front"], serde_json::json!(["fp32"]));
}

#[test]
fn invalid_config_fails_before_any_load() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(dir.path(), &[("fp32", 1, Some(Script::new(0.1, 0.0)))]);
    config.evaluation.batch_size = 0;
    let loads = std::rc::Rc::clone(&loader.loads);

    let err = run_with(&config, loader, &mut RecordingRenderer::default(), None).unwrap_err();
    assert!(matches!(err, BenchError::Config(_)));
    assert!(loads.borrow().is_empty());
}

#[test]
fn progress_callback_sees_terminal_state() {
    let dir = tempfile::tempdir().unwrap();
    let (config, loader) = scenario(
        dir.path(),
        &[("fp32", 1, Some(Script::new(0.1, 0.0))), ("qat", 1, None)],
    );
    let states: Arc<Mutex<Vec<RunState>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    let progress: ProgressCallback = Box::new(move |s: &RunState| {
        if let Ok(mut guard) = sink.lock() {
            guard.push(s.clone());
        }
    });

    assert!(run_with(&config, loader, &mut RecordingRenderer::default(), Some(progress)).is_err());
    let states = states.lock().unwrap();
    assert_eq!(
        states.last(),
        Some(&RunState::Aborted {
            name: Some("qat".into())
        })
    );
    assert!(states.iter().filter(|s| s.is_terminal()).count() == 1);
}
