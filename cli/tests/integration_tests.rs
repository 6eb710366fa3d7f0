use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;

fn run(args: &[&str], cwd: &Path) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_default-audit"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run default-audit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Spec with a passing root and one sub-command whose default is invalid.
fn write_spec(dir: &TempDir, resolution_default: &str) -> PathBuf {
    let json = serde_json::json!({
        "name": "facefusion",
        "arguments": [
            {
                "name": "execution_providers",
                "default": ["cpu"],
                "choices": ["cpu", "cuda", "tensorrt"]
            },
            { "name": "output_path", "default": "out.mp4" }
        ],
        "subcommands": [
            {
                "name": "train",
                "arguments": [
                    {
                        "name": "resolution",
                        "default": resolution_default,
                        "choices": ["1080p", "720p"]
                    }
                ]
            }
        ]
    });
    let path = dir.path().join("program.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).expect("failed to write spec");
    path
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("facefusion.ini");
    fs::write(&path, body).expect("failed to write config");
    path
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_passes_for_consistent_spec() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "720p");

    let output = run(&["validate", "--spec", spec.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(text.contains("=== Validating facefusion ==="));
    assert!(text.contains("=== Validating facefusion.train ==="));
    assert!(text.contains("Result: passed"));
}

#[test]
fn validate_reports_offending_subcommand_path() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "4k");

    let output = run(
        &["validate", "--spec", spec.to_str().unwrap(), "--root-name", "main"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("main.train: FAILED"));
    assert!(text.contains("main.train: argument 'resolution' default 4k not in choices [1080p, 720p]"));
}

#[test]
fn validate_names_root_after_spec_without_root_name() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "4k");

    let output = run(&["validate", "--spec", spec.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("facefusion.train: FAILED"));
    assert!(!text.contains("main."));
}

#[test]
fn validate_rejects_missing_spec_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");

    let output = run(&["validate", "--spec", missing.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load spec"));
}

#[test]
fn validate_uses_mode_from_settings_file() {
    let dir = TempDir::new().unwrap();
    let json = serde_json::json!({
        "name": "main",
        "arguments": [
            { "name": "a", "default": "x", "choices": ["y"] },
            { "name": "b", "default": "x", "choices": ["y"] }
        ]
    });
    let spec = dir.path().join("spec.json");
    fs::write(&spec, json.to_string()).unwrap();
    let settings = dir.path().join("settings.yaml");
    fs::write(&settings, "mode: collect-all\nroot_name: app\n").unwrap();

    let output = run(
        &[
            "validate",
            "--spec",
            spec.to_str().unwrap(),
            "--settings",
            settings.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("Result: FAILED (2 violation(s), mode collect-all)"));
    assert!(text.contains("app: argument 'b'"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_lists_populated_values_from_default_path() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        "[paths]\ntemp_path =\njobs_path = .jobs\n\n[execution]\nexecution_providers = cuda\n",
    );

    let output = run(&["config"], dir.path());
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(text.contains("Config path: facefusion.ini"));
    assert!(text.contains("Parsed 2 section(s)"));
    assert!(text.contains("Section [execution]:\n  execution_providers = cuda"));
    assert!(!text.contains("temp_path"));
}

#[test]
fn config_reports_parse_error_with_line() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[paths]\nnot an option\n");

    let output = run(&["config", "--path", path.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config parsing error"));
    assert!(stderr.contains("line 2"));
}

// ---------------------------------------------------------------------------
// doctor
// ---------------------------------------------------------------------------

#[test]
fn doctor_flags_invalid_config_value() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "720p");
    let config = write_config(&dir, "[execution]\nexecution_providers = cuda rocm\n");

    let output = run(
        &[
            "doctor",
            "--spec",
            spec.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("Applied 1 configuration value(s)"));
    assert!(text.contains("[FAIL] invalid defaults: [rocm]"));
    assert!(text.contains("Config file: OK"));
    assert!(text.contains("Validation: FAILED"));
    assert!(text.contains("Potential fixes:"));
}

#[test]
fn doctor_passes_without_hints() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "1080p");
    write_config(&dir, "[execution]\nexecution_providers = cuda cpu\n");

    let output = run(&["doctor", "--spec", spec.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(text.contains("Config file: OK"));
    assert!(text.contains("Validation: OK"));
    assert!(!text.contains("Potential fixes:"));
}

#[test]
fn doctor_still_validates_when_config_is_missing() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "720p");

    let output = run(&["doctor", "--spec", spec.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("Config file error"));
    assert!(text.contains("Result: passed"));
    assert!(text.contains("Config file: FAILED"));
    assert!(text.contains("Validation: OK"));
}

// ---------------------------------------------------------------------------
// self-check
// ---------------------------------------------------------------------------

#[test]
fn self_check_passes() {
    let dir = TempDir::new().unwrap();
    let output = run(&["self-check"], dir.path());
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("=== Validating default-audit.self-check ==="));
}
