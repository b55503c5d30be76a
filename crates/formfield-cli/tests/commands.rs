//! Integration tests for the formfield CLI commands

use clap::Parser;
use formfield_cli::cli::run;
use formfield_cli::{ExitCode, FormfieldCli};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FORM: &str = r#"{
    "version": 4,
    "fields": [
        {"id": 1, "type": "text", "required": true, "label": "Name"},
        {"id": 2, "type": "checkbox-group", "label": "Topics",
         "options": [{"label": "A", "isDefault": true}, {"label": "B"}], "selectionLimit": 1},
        {"id": 3, "type": "range", "label": "Score", "minValue": 0, "maxValue": 9}
    ]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn run_args(args: &[&str]) -> ExitCode {
    let mut argv = vec!["formfield"];
    argv.extend_from_slice(args);
    let cli = FormfieldCli::try_parse_from(argv).expect("Failed to parse arguments");
    match run(cli) {
        Ok(code) => code,
        Err(e) => ExitCode::from_error(&e),
    }
}

fn arg(path: &PathBuf) -> &str {
    path.to_str().expect("Non-UTF-8 temp path")
}

#[test]
fn test_validate_rejected_submission() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "form.json", FORM);
    let submission = write(&dir, "payload.json", r#"{"values": {"1": "", "2": ["A", "B"]}}"#);

    let code = run_args(&[
        "validate",
        "--schema",
        arg(&schema),
        "--submission",
        arg(&submission),
        "--format",
        "json",
    ]);
    assert_eq!(code, ExitCode::ValidationFailed);
}

#[test]
fn test_validate_accepted_yaml_submission() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "form.json", FORM);
    let submission = write(
        &dir,
        "payload.yaml",
        "values:\n  \"1\": Ada\n  \"2\": [B]\nrating: 5\ncomment: Great\n",
    );

    let code = run_args(&[
        "validate",
        "--schema",
        arg(&schema),
        "--submission",
        arg(&submission),
    ]);
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_defaults_and_render() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "form.json", FORM);
    let values = write(&dir, "draft.json", r#"{"1": "Ada", "2": ["B"]}"#);

    assert_eq!(
        run_args(&["defaults", "--schema", arg(&schema), "--seeded-only"]),
        ExitCode::Success
    );
    assert_eq!(
        run_args(&["render", "--schema", arg(&schema), "--values", arg(&values), "--format", "yaml"]),
        ExitCode::Success
    );
}

#[test]
fn test_render_rejects_mismatched_value() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "form.json", FORM);
    let values = write(&dir, "draft.json", r#"{"1": ["A", "B"]}"#);

    assert_eq!(
        run_args(&["render", "--schema", arg(&schema), "--values", arg(&values)]),
        ExitCode::InvalidInput
    );
}

#[test]
fn test_decode_with_revalidation() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "form.json", FORM);
    let good = write(&dir, "good.json", r#"{"1": "Ada", "2": "[\"A\"]", "3": "4", "99": "old"}"#);
    let bad = write(&dir, "bad.json", r#"{"answers": {"1": "", "2": "[\"A\",\"B\"]"}}"#);

    assert_eq!(
        run_args(&["decode", "--schema", arg(&schema), "--response", arg(&good), "--revalidate"]),
        ExitCode::Success
    );
    assert_eq!(
        run_args(&["decode", "--schema", arg(&schema), "--response", arg(&bad), "--revalidate"]),
        ExitCode::ValidationFailed
    );
    assert_eq!(
        run_args(&["decode", "--schema", arg(&schema), "--response", arg(&bad)]),
        ExitCode::Success
    );
}

#[test]
fn test_config_file_applies() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "form.json", FORM);
    let config = write(&dir, "formfield.toml", "rating_max = 3\n");
    let submission = write(&dir, "payload.json", r#"{"values": {"1": "Ada"}, "rating": 4}"#);

    let code = run_args(&[
        "--config",
        arg(&config),
        "validate",
        "--schema",
        arg(&schema),
        "--submission",
        arg(&submission),
    ]);
    assert_eq!(code, ExitCode::ValidationFailed);
}

#[test]
fn test_error_exit_codes() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "form.json", FORM);
    let broken = write(&dir, "broken.json", r#"{"fields": "nope"}"#);
    let missing = dir.path().join("missing.json");

    assert_eq!(
        run_args(&["defaults", "--schema", arg(&missing)]),
        ExitCode::FileError
    );
    assert_eq!(
        run_args(&["defaults", "--schema", arg(&broken)]),
        ExitCode::SchemaError
    );

    let unsupported = write(&dir, "payload.txt", "values");
    assert_eq!(
        run_args(&["validate", "--schema", arg(&schema), "--submission", arg(&unsupported)]),
        ExitCode::InvalidInput
    );
}
