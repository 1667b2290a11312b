mod common;

use common::synthetic_volume::symmetric_head;
use nalgebra::Point3;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use symmetry_plane::preprocess::{DownsampleOptions, PreprocessOptions};
use symmetry_plane::volume::io::{load_volume, save_volume};
use symmetry_plane::{
    EvaluationRecord, ExhaustiveSearch, ReflectionParameters, SearchOptions, VolumeGeometry,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "symmetry_plane_pipeline_{name}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn saved_head_is_recovered_after_preprocessing() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = scratch_dir("library");
    let geometry = VolumeGeometry::default().with_origin(Point3::new(-15.5, -11.5, -7.5));
    let head = symmetric_head([32, 24, 16], geometry);
    let header = dir.join("head.json");
    save_volume(&header, &head).expect("save volume");

    let loaded = load_volume(&header).expect("load volume");
    assert_eq!(loaded.dims(), [32, 24, 16]);

    let preprocess = PreprocessOptions {
        downsample: Some(DownsampleOptions {
            target_spacing_mm: 2.0,
        }),
        ..PreprocessOptions::default()
    };
    let working = preprocess.apply(&loaded).expect("preprocess");
    assert_eq!(working.dims(), [8, 6, 4]);
    // The physical centre, and therefore the nominal plane, does not move.
    assert!((working.physical_center() - loaded.physical_center()).norm() < 1e-9);

    let options = SearchOptions::from_ranges([5.0, 5.0, 1.0], [5.0, 5.0, 1.0]);
    let mut trace: Vec<EvaluationRecord> = Vec::new();
    let result = ExhaustiveSearch::new(options)
        .run(&working, ReflectionParameters::IDENTITY, Some(&mut trace))
        .expect("search");

    assert_eq!(trace.len(), 27);
    assert_eq!(result.best.params, ReflectionParameters::IDENTITY);
    assert!((result.best.score - 1.0).abs() < 1e-4, "score={}", result.best.score);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tool_writes_trace_and_report() {
    let dir = scratch_dir("tool");
    let head = symmetric_head([16, 12, 8], VolumeGeometry::default());
    save_volume(&dir.join("head.json"), &head).expect("save volume");

    let config = r#"{
        "input": "head.json",
        "preprocess": { "downsample": null },
        "search": {
            "head_tilt": { "range": 5.0, "step": 5.0 },
            "base_angle": { "range": 0.0, "step": 1.0 },
            "left_right": { "range": 2.0, "step": 1.0 }
        },
        "output": { "trace_csv": "out/trace.csv", "report_json": "out/report.json" }
    }"#;
    let config_path = dir.join("config.json");
    fs::write(&config_path, config).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_symmetry_search"))
        .arg(&config_path)
        .output()
        .expect("run symmetry_search");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Optimize parameters by exhaustive search: [0, 0, 0]"), "{stdout}");

    let csv = fs::read_to_string(dir.join("out/trace.csv")).expect("trace csv");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("head_tilt_deg,base_angle_deg,left_right_mm,score")
    );
    assert_eq!(lines.count(), 3 * 1 * 5);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("out/report.json")).expect("report"))
            .expect("report is JSON");
    assert_eq!(report["evaluations"], 15);
    assert!(report["totalMs"].as_f64().is_some_and(|ms| ms >= 0.0));
    assert_eq!(report["workingVolume"]["dims"], serde_json::json!([16, 12, 8]));
    let stages: Vec<&str> = report["timing"]["stages"]
        .as_array()
        .expect("stages")
        .iter()
        .filter_map(|s| s["stage"].as_str())
        .collect();
    assert_eq!(
        stages,
        ["load", "standardize", "downsample", "initial", "search"]
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tool_fails_cleanly_on_missing_volume() {
    let dir = scratch_dir("missing");
    let config_path = dir.join("config.json");
    fs::write(&config_path, r#"{"input": "nowhere.json"}"#).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_symmetry_search"))
        .arg(&config_path)
        .output()
        .expect("run symmetry_search");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: Failed to read header"), "{stderr}");
    let _ = fs::remove_dir_all(&dir);
}
