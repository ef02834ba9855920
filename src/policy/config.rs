use super::Policy;
use crate::error::LintError;
use crate::registry::{standard_registry, RuleRegistry};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Per-rule settings from a policy file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Severity label the rule reports with
    pub severity: String,
}

/// Policy configuration as stored on disk
///
/// ```json
/// {
///   "name": "acme-api-policy",
///   "version": "1.0.0",
///   "lastUpdated": "2024-05-01T00:00:00Z",
///   "rules": { "operation-summary-exist": { "severity": "error" } },
///   "nonStandardRules": ["acme-path-prefix"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleConfig>,
    /// Rules the caller supplies itself instead of the standard registry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_standard_rules: Vec<String>,
}

/// Configured rule names split by origin; each list trimmed, deduplicated and
/// sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleNames {
    pub all: Vec<String>,
    pub standard: Vec<String>,
    pub custom: Vec<String>,
}

impl PolicyConfig {
    /// Read a policy configuration JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid policy JSON.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read policy {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse policy {}", path.display()))
    }

    /// Parse policy configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid policy document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let cfg: PolicyConfig = serde_json::from_str(json).context("invalid policy JSON")?;
        Ok(cfg)
    }

    /// The standard rules most APIs want, at default-scale severities.
    ///
    /// The two operationId style rules contradict each other, so only the
    /// camelCase one is included.
    pub fn recommended() -> Self {
        let rules = [
            ("operation-operationid-exist", "error"),
            ("operation-operationid-style-camelcase", "warning"),
            ("operation-summary-exist", "warning"),
            ("operation-summary-case-first-capitalized", "info"),
            ("operation-tags-exist", "info"),
            ("operation-parameter-name-style-camelcase", "warning"),
            ("servers-url-https", "error"),
            ("schema-reference-has-schema", "error"),
            ("tag-description-exist", "info"),
        ]
        .into_iter()
        .map(|(name, severity)| {
            (
                name.to_string(),
                RuleConfig {
                    severity: severity.to_string(),
                },
            )
        })
        .collect();
        PolicyConfig {
            name: "recommended".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            last_updated: None,
            rules,
            non_standard_rules: Vec::new(),
        }
    }

    /// Configured rule names, split into standard and custom
    pub fn rule_names(&self) -> RuleNames {
        self.rule_names_with_registry(standard_registry())
    }

    pub fn rule_names_with_registry(&self, registry: &RuleRegistry) -> RuleNames {
        let all: BTreeSet<String> = self
            .rules
            .keys()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        let (standard, custom): (Vec<String>, Vec<String>) =
            all.iter().cloned().partition(|name| registry.contains(name));
        RuleNames {
            all: all.into_iter().collect(),
            standard,
            custom,
        }
    }

    /// Severity configured for `rule_name`, if any
    pub fn severity_for(&self, rule_name: &str) -> Option<&str> {
        self.rules.get(rule_name).map(|c| c.severity.as_str())
    }

    /// Build a policy from the standard registry.
    ///
    /// # Errors
    ///
    /// See [`PolicyConfig::policy_with_registry`].
    pub fn standard_policy(&self) -> Result<Policy, LintError> {
        self.policy_with_registry(standard_registry())
    }

    /// Build a policy by resolving each configured rule against `registry`.
    ///
    /// Names listed in `nonStandardRules` are skipped; the caller adds those
    /// rules itself (see [`PolicyConfig::missing_non_standard_rules`]).
    /// Rules are added collision-strict.
    ///
    /// # Errors
    ///
    /// - [`LintError::UnknownRule`] for a configured name the registry cannot
    ///   build
    /// - any error from [`Policy::add_rule`]
    pub fn policy_with_registry(&self, registry: &RuleRegistry) -> Result<Policy, LintError> {
        let mut policy = Policy::new();
        for (rule_name, rule_cfg) in &self.rules {
            let rule_name = rule_name.trim();
            if self.non_standard_rules.iter().any(|n| n.trim() == rule_name) {
                debug!(rule = %rule_name, "skipping non-standard rule");
                continue;
            }
            let rule = registry.build(rule_name, &rule_cfg.severity)?;
            policy.add_rule(rule, true)?;
        }
        debug!(
            policy = %self.name,
            version = %self.version,
            rules = policy.len(),
            "built policy from configuration"
        );
        Ok(policy)
    }

    /// Non-standard rule names not yet present in `policy`
    pub fn missing_non_standard_rules(&self, policy: &Policy) -> Vec<String> {
        self.non_standard_rules
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty() && policy.rule(n).is_none())
            .map(str::to_string)
            .collect()
    }
}
