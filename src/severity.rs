//! # Severity Ordering
//!
//! Severities are free-text labels drawn from a small, totally ordered scale.
//! The scale is process-wide: it is installed once at startup (see
//! [`install_severity_scale`]) and never changes afterwards. If nothing is
//! installed, the default scale `info < warning < error` is used.
//!
//! Comparisons never coerce unknown labels. A label outside the scale is
//! reported as [`LintError::UnknownSeverity`] so a rule with a typo in its
//! severity cannot be silently admitted to, or dropped from, a report.
//!
//! ```rust
//! use speclint::severity::severity_include;
//!
//! assert!(severity_include("warning", "error").unwrap());
//! assert!(!severity_include("warning", "info").unwrap());
//! assert!(severity_include("warning", "fatal").is_err());
//! ```

use crate::error::LintError;
use once_cell::sync::OnceCell;

/// Default labels, lowest first
pub const DEFAULT_SEVERITIES: [&str; 3] = ["info", "warning", "error"];

/// Severity attached to violations produced when a rule itself fails
///
/// Deliberately not on any scale, so report consumers can tell a broken rule
/// apart from a genuine finding.
pub const RULE_FAULT_SEVERITY: &str = "rule-fault";

static SCALE: OnceCell<SeverityScale> = OnceCell::new();

/// Ordered set of severity labels, lowest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityScale {
    labels: Vec<String>,
}

impl SeverityScale {
    /// Build a scale from labels ordered lowest to highest.
    ///
    /// Labels are trimmed and lowercased. Fails on an empty list, a blank
    /// label or a duplicate.
    pub fn new<I, S>(labels: I) -> Result<Self, LintError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = normalize(label.as_ref());
            if label.is_empty() {
                return Err(LintError::InvalidSeverityScale {
                    reason: "blank severity label".to_string(),
                });
            }
            if out.contains(&label) {
                return Err(LintError::InvalidSeverityScale {
                    reason: format!("duplicate severity label [{}]", label),
                });
            }
            out.push(label);
        }
        if out.is_empty() {
            return Err(LintError::InvalidSeverityScale {
                reason: "no severity labels".to_string(),
            });
        }
        Ok(SeverityScale { labels: out })
    }

    /// Labels, lowest first
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of `label` on the scale (0 = lowest)
    pub fn rank(&self, label: &str) -> Option<usize> {
        let label = normalize(label);
        self.labels.iter().position(|l| *l == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.rank(label).is_some()
    }

    /// Returns true iff `item_severity` is at or above `configured_minimum`.
    ///
    /// # Errors
    ///
    /// [`LintError::UnknownSeverity`] listing every argument that is not on
    /// the scale.
    pub fn include(
        &self,
        configured_minimum: &str,
        item_severity: &str,
    ) -> Result<bool, LintError> {
        match (self.rank(configured_minimum), self.rank(item_severity)) {
            (Some(min), Some(item)) => Ok(item >= min),
            (min, item) => {
                let mut severities = Vec::new();
                if min.is_none() {
                    severities.push(configured_minimum.to_string());
                }
                if item.is_none() {
                    severities.push(item_severity.to_string());
                }
                Err(LintError::UnknownSeverity {
                    rules: Vec::new(),
                    severities,
                    valid: self.labels.clone(),
                })
            }
        }
    }
}

impl Default for SeverityScale {
    fn default() -> Self {
        SeverityScale {
            labels: DEFAULT_SEVERITIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Install the process-wide severity scale.
///
/// Must happen before the first comparison; the scale is immutable once set.
///
/// # Errors
///
/// [`LintError::SeverityScaleInstalled`] if a scale was already installed or
/// the default scale was already put in use.
pub fn install_severity_scale(scale: SeverityScale) -> Result<(), LintError> {
    SCALE
        .set(scale)
        .map_err(|_| LintError::SeverityScaleInstalled)
}

/// The active process-wide scale
pub fn severity_scale() -> &'static SeverityScale {
    SCALE.get_or_init(SeverityScale::default)
}

/// [`SeverityScale::include`] against the process-wide scale
pub fn severity_include(configured_minimum: &str, item_severity: &str) -> Result<bool, LintError> {
    severity_scale().include(configured_minimum, item_severity)
}

/// Canonical form of a label: trimmed, lowercase
pub fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}
