//! Runs the `speclint` binary against the fixture documents.

use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn speclint(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_speclint"))
        .args(args)
        .env_remove("SPECLINT_POLICY")
        .env_remove("SPECLINT_SEVERITIES")
        .env_remove("SPECLINT_MIN_SEVERITY")
        .env("SPECLINT_LOG_LEVEL", "error")
        .output()
        .expect("run speclint")
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn test_lint_with_policy_file_reports_json() {
    let spec = fixture("petstore.yaml");
    let policy = fixture("policy.json");
    let output = speclint(&[
        "lint",
        "--spec",
        spec.to_str().unwrap(),
        "--policy",
        policy.to_str().unwrap(),
        "--severity",
        "info",
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(0));

    let body = json_stdout(&output);
    // the non-standard path prefix rule is skipped by the binary
    assert_eq!(body["summary"]["total"], 7);
    assert_eq!(body["summary"]["bySeverity"]["error"], 3);
    assert_eq!(body["summary"]["bySeverity"]["warning"], 2);
    assert_eq!(body["summary"]["bySeverity"]["info"], 2);

    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| {
        v["ruleName"] == "servers-url-https" && v["pointer"] == "#/servers/1/url"
    }));
}

#[test]
fn test_fail_on_error_exit_code() {
    let spec = fixture("petstore.yaml");
    let policy = fixture("policy.json");
    let output = speclint(&[
        "lint",
        "-s",
        spec.to_str().unwrap(),
        "-p",
        policy.to_str().unwrap(),
        "--severity",
        "error",
        "--fail-on-error",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ERROR (3):"), "unexpected output: {stdout}");
    assert!(!stdout.contains("WARNING"));
}

#[test]
fn test_clean_document_passes_recommended_policy() {
    let spec = fixture("ping.json");
    let output = speclint(&[
        "lint",
        "--spec",
        spec.to_str().unwrap(),
        "--severity",
        "error",
        "--fail-on-error",
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No violations found"));
}

#[test]
fn test_pointer_base_prefixes_output() {
    let spec = fixture("ping.json");
    let output = speclint(&[
        "lint",
        "--spec",
        spec.to_str().unwrap(),
        "--pointer-base",
        "ping.json",
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let body = json_stdout(&output);
    let violations = body["violations"].as_array().unwrap();
    assert!(!violations.is_empty());
    assert!(violations
        .iter()
        .all(|v| v["pointer"].as_str().unwrap().starts_with("ping.json#/")));
}

#[test]
fn test_missing_spec_exits_with_error() {
    let output = speclint(&["lint", "--spec", "does-not-exist.yaml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.yaml"));
}

#[test]
fn test_unknown_severity_filter_exits_with_error() {
    let spec = fixture("ping.json");
    let output = speclint(&["lint", "--spec", spec.to_str().unwrap(), "--severity", "fatal"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("fatal"));
}

#[test]
fn test_bad_policy_file_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let policy = dir.path().join("policy.json");
    std::fs::write(
        &policy,
        r#"{ "rules": { "operation-has-cake": { "severity": "error" } } }"#,
    )
    .unwrap();
    let spec = fixture("ping.json");
    let output = speclint(&[
        "lint",
        "--spec",
        spec.to_str().unwrap(),
        "--policy",
        policy.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("operation-has-cake"));
}

#[test]
fn test_custom_severity_scale_from_env() {
    let spec = fixture("ping.json");
    let output = Command::new(env!("CARGO_BIN_EXE_speclint"))
        .args(["lint", "--spec", spec.to_str().unwrap()])
        .env_remove("SPECLINT_POLICY")
        .env("SPECLINT_SEVERITIES", "low,high")
        .env_remove("SPECLINT_MIN_SEVERITY")
        .env("SPECLINT_LOG_LEVEL", "error")
        .output()
        .expect("run speclint");
    // the recommended policy uses default-scale labels, which the custom scale rejects
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_rules_command_lists_catalog() {
    let output = speclint(&["rules", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));
    let body = json_stdout(&output);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 10);
    assert!(names.contains(&"operation-summary-exist"));
    assert!(names.contains(&"schema-reference-has-schema"));
}
