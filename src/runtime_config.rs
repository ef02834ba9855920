//! # Runtime Configuration Module
//!
//! Environment-driven settings that apply to a whole process.
//!
//! ## Environment Variables
//!
//! ### `SPECLINT_SEVERITIES`
//!
//! Comma-separated severity labels, lowest first. Replaces the default
//! `info,warning,error` scale.
//!
//! ```bash
//! export SPECLINT_SEVERITIES=hint,info,warning,error,critical
//! ```
//!
//! ### `SPECLINT_MIN_SEVERITY`
//!
//! Default filter severity for validation runs when none is given on the
//! command line. Default: the lowest label on the scale.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use speclint::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.install().unwrap();
//! ```

use crate::error::LintError;
use crate::severity::{install_severity_scale, SeverityScale};
use std::env;
use tracing::debug;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Severity labels, lowest first; `None` keeps the default scale
    pub severities: Option<Vec<String>>,
    /// Filter severity used when the caller does not supply one
    pub min_severity: Option<String>,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let severities = lookup("SPECLINT_SEVERITIES")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|labels| !labels.is_empty());
        let min_severity = lookup("SPECLINT_MIN_SEVERITY")
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        RuntimeConfig {
            severities,
            min_severity,
        }
    }

    /// The scale these settings describe.
    ///
    /// # Errors
    ///
    /// [`LintError::InvalidSeverityScale`] for duplicate or blank labels.
    pub fn severity_scale(&self) -> Result<SeverityScale, LintError> {
        match &self.severities {
            Some(labels) => SeverityScale::new(labels),
            None => Ok(SeverityScale::default()),
        }
    }

    /// Filter severity to use when none is given: the configured minimum,
    /// else the lowest label on `scale`.
    pub fn default_filter(&self, scale: &SeverityScale) -> String {
        self.min_severity
            .clone()
            .or_else(|| scale.labels().first().cloned())
            .unwrap_or_default()
    }

    /// Install the configured scale process-wide.
    ///
    /// Does nothing when no custom scale is configured.
    ///
    /// # Errors
    ///
    /// Scale construction errors, or [`LintError::SeverityScaleInstalled`]
    /// if a scale is already in place.
    pub fn install(&self) -> Result<(), LintError> {
        if self.severities.is_none() {
            return Ok(());
        }
        let scale = self.severity_scale()?;
        debug!(labels = ?scale.labels(), "installing severity scale");
        install_severity_scale(scale)
    }
}
