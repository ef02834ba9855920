//! # CLI Module
//!
//! Command-line front end for linting OpenAPI documents.
//!
//! ## Commands
//!
//! ### `lint`
//!
//! Validate a specification against a policy:
//!
//! ```bash
//! speclint lint --spec openapi.yaml --policy policy.json --severity warning
//! ```
//!
//! Options:
//! - `--spec <FILE>` - OpenAPI specification, YAML or JSON (required)
//! - `--policy <FILE>` - policy configuration; defaults to the recommended
//!   standard rules (`SPECLINT_POLICY` also works)
//! - `--severity <LABEL>` - minimum severity to report; defaults to
//!   `SPECLINT_MIN_SEVERITY` or the lowest label on the scale
//! - `--pointer-base <PREFIX>` - prefix for every violation pointer
//! - `--format text|json`
//! - `--fail-on-error` - exit with code 1 when a violation reaches the
//!   highest severity or a rule failed
//!
//! ### `rules`
//!
//! List the standard rules and their scopes:
//!
//! ```bash
//! speclint rules --format json
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | completed |
//! | 1 | `--fail-on-error` and failing violations found |
//! | 2 | bad input: unreadable spec or policy, invalid policy, unknown severity |
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use speclint::cli::{run, Cli};
//! use speclint::runtime_config::RuntimeConfig;
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["speclint", "lint", "--spec", "openapi.yaml"]);
//! let code = run(&cli, &RuntimeConfig::default(), &mut std::io::stdout())?;
//! ```

mod commands;
mod render;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands, EXIT_VIOLATIONS};
pub use render::{render_report, render_rules, OutputFormat};
