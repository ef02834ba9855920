use super::render::{render_report, render_rules, OutputFormat};
use crate::policy::PolicyConfig;
use crate::registry::standard_registry;
use crate::runtime_config::RuntimeConfig;
use crate::severity::{severity_scale, RULE_FAULT_SEVERITY};
use crate::spec::{load_document, operation_count};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Exit code for a lint run that found violations at the failing severity
pub const EXIT_VIOLATIONS: u8 = 1;

/// Command-line interface for speclint
#[derive(Debug, Parser)]
#[command(name = "speclint")]
#[command(about = "Policy-driven OpenAPI 3 linter", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lint an OpenAPI specification against a policy
    Lint {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Policy configuration file (JSON). Defaults to the recommended
        /// standard rules.
        #[arg(short, long, env = "SPECLINT_POLICY")]
        policy: Option<PathBuf>,

        /// Minimum severity to report
        #[arg(long)]
        severity: Option<String>,

        /// Prefix for every violation pointer
        #[arg(long, default_value = "")]
        pointer_base: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with a non-zero code if any violation reaches the highest
        /// severity, or a rule failed
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,
    },
    /// List the standard rules
    Rules {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Parse arguments from the process, run the command against stdout.
///
/// Returns the process exit code for a completed run.
///
/// # Errors
///
/// Returns an error if the runtime configuration, specification or policy
/// cannot be loaded, or if validation itself fails.
pub fn run_cli() -> anyhow::Result<u8> {
    let cli = Cli::parse();
    let runtime = RuntimeConfig::from_env();
    runtime
        .install()
        .context("invalid severity configuration")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &runtime, &mut out)
}

/// Run a parsed command, writing its output to `out`.
///
/// # Errors
///
/// See [`run_cli`].
pub fn run<W: Write>(cli: &Cli, runtime: &RuntimeConfig, out: &mut W) -> anyhow::Result<u8> {
    match &cli.command {
        Commands::Lint {
            spec,
            policy,
            severity,
            pointer_base,
            format,
            fail_on_error,
        } => {
            let doc = load_document(spec)?;
            let config = match policy {
                Some(path) => PolicyConfig::from_file(path)?,
                None => PolicyConfig::recommended(),
            };
            let policy = config
                .standard_policy()
                .with_context(|| format!("failed to build policy [{}]", config.name))?;
            for missing in config.missing_non_standard_rules(&policy) {
                warn!(rule = %missing, "non-standard rule is not available to the CLI, skipping");
            }

            let scale = severity_scale();
            let filter = severity
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| runtime.default_filter(scale));

            let report = policy
                .validate_spec(Some(&doc), pointer_base, &filter)
                .with_context(|| format!("failed to lint {}", spec.display()))?;
            info!(
                spec = %spec.display(),
                operations = operation_count(&doc),
                violations = report.len(),
                "lint finished"
            );
            render_report(&report, scale, *format, out)?;

            if !*fail_on_error {
                return Ok(0);
            }
            let top = scale.labels().last().map(String::as_str).unwrap_or_default();
            let failing = report.has_severity_at_least(scale, top)?
                || report.iter().any(|v| v.severity == RULE_FAULT_SEVERITY);
            Ok(if failing { EXIT_VIOLATIONS } else { 0 })
        }
        Commands::Rules { format } => {
            render_rules(standard_registry(), *format, out)?;
            Ok(0)
        }
    }
}
