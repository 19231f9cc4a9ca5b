//! End-to-end fp32 / ptq / qat comparison through the runner.

use crate::helpers::{RecordingRenderer, Script, scenario};
use variant_bench::{
    BenchError, ComparisonReport, MeasurementResult, PngReportRenderer, ReportRenderer, run_with,
};

const EXPECTED: [(&str, u64, f32, f64); 3] = [
    ("fp32", 400, 0.10, 8.0),
    ("ptq", 100, 0.12, 2.5),
    ("qat", 100, 0.11, 2.6),
];

#[test]
fn three_variant_scenario_reaches_renderer_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<_> = EXPECTED
        .iter()
        .map(|&(name, size, q, lat)| (name, size, Some(Script::new(q, lat))))
        .collect();
    let (config, loader) = scenario(dir.path(), &rows);
    let mut renderer = RecordingRenderer::default();

    let outcome = run_with(&config, loader, &mut renderer, None).unwrap();

    assert_eq!(renderer.calls(), 1);
    let report = &renderer.reports[0];
    assert_eq!(report, &outcome.report);
    assert_eq!(report.names(), ["fp32", "ptq", "qat"]);

    let tradeoff = report.tradeoff_series();
    assert_eq!(tradeoff.len(), 3);
    for ((name, (latency, quality)), &(expected_name, _, q, lat)) in tradeoff.iter().zip(&EXPECTED) {
        assert_eq!(*name, expected_name);
        assert!((quality - f64::from(q)).abs() < 1e-6, "{name} quality {quality}");
        assert!(*latency >= lat, "{name} latency {latency} below scripted {lat}");
    }

    let sizes = report.size_series();
    assert_eq!(sizes, [("fp32", 400.0), ("ptq", 100.0), ("qat", 100.0)]);
    assert!(sizes[1..].iter().all(|(_, s)| sizes[0].1 > *s));
}

#[test]
fn each_variant_sees_one_load_and_two_probe_calls() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(
        dir.path(),
        &[
            ("fp32", 2, Some(Script::new(0.1, 0.0))),
            ("qat", 1, Some(Script::new(0.1, 0.0))),
        ],
    );
    // 16 rows in batches of 5 → 4 evaluation calls
    config.evaluation.batch_size = 5;
    let loads = std::rc::Rc::clone(&loader.loads);
    let calls = std::rc::Rc::clone(&loader.calls);

    run_with(&config, loader, &mut RecordingRenderer::default(), None).unwrap();

    let expected: Vec<_> = config.variants.iter().map(|v| v.path.clone()).collect();
    assert_eq!(*loads.borrow(), expected);
    for variant in &config.variants {
        let n = *calls.borrow()[&variant.path].borrow();
        assert_eq!(n, 4 + 2, "{}", variant.name);
    }
}

#[test]
fn quality_does_not_depend_on_batch_size() {
    let mut scores = Vec::new();
    for batch_size in [1, 3, 16, 512] {
        let dir = tempfile::tempdir().unwrap();
        let (mut config, loader) =
            scenario(dir.path(), &[("fp32", 1, Some(Script::new(0.37, 0.0)))]);
        config.evaluation.batch_size = batch_size;
        let outcome = run_with(&config, loader, &mut RecordingRenderer::default(), None).unwrap();
        scores.push(outcome.report.quality_series()[0].1);
    }
    for s in &scores[1..] {
        assert!((s - scores[0]).abs() < 1e-12, "{scores:?}");
    }
}

#[test]
fn repeated_probes_keep_headline_latency() {
    let dir = tempfile::tempdir().unwrap();
    let (mut config, loader) = scenario(dir.path(), &[("ptq", 1, Some(Script::new(0.2, 1.0)))]);
    config.latency.repeat_probes = 3;
    let outcome = run_with(&config, loader, &mut RecordingRenderer::default(), None).unwrap();

    let entry = &outcome.report.entries()[0];
    let stats = entry.latency_stats.as_ref().unwrap();
    assert_eq!(stats.samples, 3);
    assert!(stats.min_ms >= 1.0);
    assert!(entry.result.latency_ms >= 1.0);
}

fn scenario_report(latency_override: Option<f64>) -> ComparisonReport {
    let mut report = ComparisonReport::new();
    for (name, size, q, lat) in EXPECTED {
        report
            .push(
                name,
                MeasurementResult {
                    quality_score: f64::from(q),
                    latency_ms: latency_override.unwrap_or(lat),
                    size_mb: size as f64,
                },
            )
            .unwrap();
    }
    report
}

const CHART_FILES: [&str; 4] = [
    "accuracy_comparison.png",
    "latency_comparison.png",
    "model_size_comparison.png",
    "quality_vs_latency.png",
];

#[test]
fn png_renderer_writes_all_four_charts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let mut renderer = PngReportRenderer::new(&out, 320, 240);

    let paths = renderer.render(&scenario_report(None)).unwrap();
    let written: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written, CHART_FILES);
    for path in &paths {
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }
}

#[test]
fn png_renderer_writes_nothing_for_unplottable_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let mut renderer = PngReportRenderer::new(&out, 320, 240);

    let err = renderer.render(&scenario_report(Some(f64::NAN))).unwrap_err();
    assert!(matches!(err, BenchError::Render(_)));
    for name in CHART_FILES {
        assert!(!out.join(name).exists(), "{name} written despite failure");
    }
}
