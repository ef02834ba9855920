//! Structured logging setup
//!
//! Library code only emits `tracing` events; nothing is printed unless the
//! binary installs a subscriber through [`init_logging`]. Log output goes to
//! stderr so it never mixes with a report written to stdout.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SPECLINT_LOG_LEVEL` | `warn` | trace/debug/info/warn/error |
//! | `SPECLINT_LOG_FORMAT` | `pretty` | `json` or `pretty` |
//! | `SPECLINT_LOG_TARGET_FILTER` | unset | extra comma-separated filter directives |
//! | `SPECLINT_LOG_INCLUDE_LOCATION` | `false` | include file:line |
//!
//! `RUST_LOG`, when set, replaces the level entirely.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty-print for people
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "warn".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            log_level: lookup("SPECLINT_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("SPECLINT_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: lookup("SPECLINT_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: lookup("SPECLINT_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Parsed level; unknown strings fall back to WARN
    pub fn level(&self) -> Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {}", filter),
                }
            }
        }
        env_filter
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, LogConfig::default());
        assert_eq!(cfg.level(), Level::WARN);
    }

    #[test]
    fn test_from_lookup() {
        let cfg = LogConfig::from_lookup(lookup(&[
            ("SPECLINT_LOG_LEVEL", "debug"),
            ("SPECLINT_LOG_FORMAT", "json"),
            ("SPECLINT_LOG_TARGET_FILTER", "speclint::policy=trace"),
            ("SPECLINT_LOG_INCLUDE_LOCATION", "true"),
        ]));
        assert_eq!(cfg.level(), Level::DEBUG);
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.target_filter.as_deref(), Some("speclint::policy=trace"));
        assert!(cfg.include_location);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = LogConfig::from_lookup(lookup(&[
            ("SPECLINT_LOG_LEVEL", "loud"),
            ("SPECLINT_LOG_INCLUDE_LOCATION", "maybe"),
            ("SPECLINT_LOG_TARGET_FILTER", "  "),
        ]));
        assert_eq!(cfg.level(), Level::WARN);
        assert!(!cfg.include_location);
        assert!(cfg.target_filter.is_none());
    }
}
