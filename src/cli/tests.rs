//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands, OutputFormat, EXIT_VIOLATIONS};
use crate::runtime_config::RuntimeConfig;
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

const SPEC: &str = r#"
openapi: 3.1.0
info:
  title: Ping
  version: "1.0"
servers:
  - url: http://ping.example.com
paths:
  /ping:
    get:
      operationId: ping
      responses:
        "200": { description: pong }
"#;

fn spec_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(SPEC.as_bytes()).unwrap();
    file
}

fn policy_file(json: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn run_args(args: &[&str]) -> anyhow::Result<(u8, String)> {
    let cli = Cli::try_parse_from(args)?;
    let mut buf = Vec::new();
    let code = run(&cli, &RuntimeConfig::default(), &mut buf)?;
    Ok((code, String::from_utf8(buf)?))
}

#[test]
fn test_lint_command_defaults() {
    let cli = Cli::try_parse_from(["speclint", "lint", "--spec", "test.yaml"]).unwrap();
    match cli.command {
        Commands::Lint {
            spec,
            pointer_base,
            format,
            fail_on_error,
            severity,
            ..
        } => {
            assert_eq!(spec.to_string_lossy(), "test.yaml");
            assert_eq!(pointer_base, "");
            assert_eq!(format, OutputFormat::Text);
            assert!(!fail_on_error);
            assert!(severity.is_none());
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "speclint",
        "lint",
        "-s",
        "test.yaml",
        "--policy",
        "policy.json",
        "--severity",
        "warning",
        "--pointer-base",
        "api.yaml",
        "--format",
        "json",
        "--fail-on-error",
    ])
    .unwrap();
    match cli.command {
        Commands::Lint {
            policy,
            severity,
            pointer_base,
            format,
            fail_on_error,
            ..
        } => {
            assert_eq!(policy.unwrap().to_string_lossy(), "policy.json");
            assert_eq!(severity.as_deref(), Some("warning"));
            assert_eq!(pointer_base, "api.yaml");
            assert_eq!(format, OutputFormat::Json);
            assert!(fail_on_error);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_lint_requires_spec() {
    assert!(Cli::try_parse_from(["speclint", "lint"]).is_err());
    assert!(Cli::try_parse_from(["speclint", "lint", "-s", "a.yaml", "--format", "xml"]).is_err());
}

#[test]
fn test_lint_with_policy_file() {
    let spec = spec_file();
    let policy = policy_file(
        r#"{ "name": "ping", "rules": {
            "operation-summary-exist": { "severity": "warning" },
            "servers-url-https": { "severity": "error" }
        } }"#,
    );
    let (code, text) = run_args(&[
        "speclint",
        "lint",
        "--spec",
        spec.path().to_str().unwrap(),
        "--policy",
        policy.path().to_str().unwrap(),
        "--format",
        "json",
    ])
    .unwrap();
    assert_eq!(code, 0);

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["summary"]["total"], 2);
    let pointers: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v["pointer"].as_str())
        .collect();
    assert_eq!(pointers, vec!["#/paths/~1ping/get", "#/servers/0/url"]);
}

#[test]
fn test_severity_filter_and_fail_on_error() {
    let spec = spec_file();
    let policy = policy_file(
        r#"{ "rules": {
            "operation-summary-exist": { "severity": "warning" },
            "servers-url-https": { "severity": "error" }
        } }"#,
    );
    let spec_path = spec.path().to_str().unwrap();
    let policy_path = policy.path().to_str().unwrap();

    let (code, text) = run_args(&[
        "speclint", "lint", "-s", spec_path, "-p", policy_path, "--severity", "error", "--fail-on-error",
    ])
    .unwrap();
    assert_eq!(code, EXIT_VIOLATIONS);
    assert!(text.contains("[servers-url-https] #/servers/0/url"));
    assert!(!text.contains("operation-summary-exist"));

    let relaxed = policy_file(r#"{ "rules": { "operation-summary-exist": { "severity": "warning" } } }"#);
    let (code, _) = run_args(&[
        "speclint",
        "lint",
        "-s",
        spec_path,
        "-p",
        relaxed.path().to_str().unwrap(),
        "--fail-on-error",
    ])
    .unwrap();
    assert_eq!(code, 0);
}

#[test]
fn test_lint_reports_configuration_errors() {
    let spec = spec_file();
    let spec_path = spec.path().to_str().unwrap();

    let unknown_rule = policy_file(r#"{ "rules": { "no-such-rule": { "severity": "error" } } }"#);
    let err = run_args(&["speclint", "lint", "-s", spec_path, "-p", unknown_rule.path().to_str().unwrap()])
        .unwrap_err();
    assert!(format!("{err:#}").contains("no-such-rule"));

    let err = run_args(&["speclint", "lint", "-s", spec_path, "--severity", "loud"]).unwrap_err();
    assert!(format!("{err:#}").contains("loud"));

    assert!(run_args(&["speclint", "lint", "-s", "/definitely/missing.yaml"]).is_err());
}

#[test]
fn test_lint_recommended_policy() {
    let spec = spec_file();
    let (code, text) = run_args(&["speclint", "lint", "-s", spec.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, 0);
    assert!(text.contains("servers-url-https"));
    assert!(text.contains("operation-summary-exist"));
}

#[test]
fn test_rules_command() {
    let (code, text) = run_args(&["speclint", "rules"]).unwrap();
    assert_eq!(code, 0);
    assert!(text.contains("operation-summary-exist"));
    assert!(text.lines().any(|l| l.starts_with("tag-description-exist") && l.ends_with("specification")));
}
