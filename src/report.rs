//! Violation aggregation.
//!
//! A [`ViolationsReport`] groups violations by the rule that produced them.
//! Within one rule, emission order is kept. Across rules there is no global
//! order; use [`ViolationsReport::sorted`] when a stable listing is needed.

use crate::error::LintError;
use crate::rule::Violation;
use crate::severity::SeverityScale;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Violations keyed by rule name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationsReport {
    violations: BTreeMap<String, Vec<Violation>>,
}

/// Totals for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Number of violations
    pub total: usize,
    /// Number of rules with at least one violation
    pub rules: usize,
    /// Violation count per severity label
    pub by_severity: BTreeMap<String, usize>,
}

impl ViolationsReport {
    /// An empty report
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_violation(&mut self, violation: Violation) {
        self.violations
            .entry(violation.rule_name.clone())
            .or_default()
            .push(violation);
    }

    /// Append violations, keeping their order within each rule
    pub fn add_violations<I>(&mut self, violations: I)
    where
        I: IntoIterator<Item = Violation>,
    {
        for v in violations {
            self.add_violation(v);
        }
    }

    /// Merge another report into this one.
    ///
    /// Each rule's sequence from `other` is appended after this report's
    /// sequence for the same rule. Nothing is dropped or deduplicated, so the
    /// merged multiset does not depend on merge order.
    pub fn upsert_sets(&mut self, other: ViolationsReport) {
        for (rule_name, violations) in other.violations {
            self.violations
                .entry(rule_name)
                .or_default()
                .extend(violations);
        }
    }

    /// Total number of violations
    pub fn len(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.values().all(Vec::is_empty)
    }

    /// Names of rules with at least one violation, sorted
    pub fn rule_names(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Violations from one rule, in emission order
    pub fn by_rule(&self, rule_name: &str) -> &[Violation] {
        self.violations
            .get(rule_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All violations, grouped by rule name
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.values().flatten()
    }

    /// All violations ordered by pointer, then rule name, then message
    pub fn sorted(&self) -> Vec<&Violation> {
        let mut out: Vec<&Violation> = self.iter().collect();
        out.sort_by(|a, b| {
            a.pointer
                .cmp(&b.pointer)
                .then_with(|| a.rule_name.cmp(&b.rule_name))
                .then_with(|| a.message.cmp(&b.message))
        });
        out
    }

    pub fn summary(&self) -> ReportSummary {
        let mut by_severity: BTreeMap<String, usize> = BTreeMap::new();
        for v in self.iter() {
            *by_severity.entry(v.severity.clone()).or_default() += 1;
        }
        ReportSummary {
            total: self.len(),
            rules: self.rule_names().len(),
            by_severity,
        }
    }

    /// Whether any violation is at or above `minimum` on `scale`.
    ///
    /// Violations whose severity is not on the scale (such as rule faults)
    /// never count.
    ///
    /// # Errors
    ///
    /// [`LintError::UnknownSeverity`] if `minimum` is not on the scale.
    pub fn has_severity_at_least(
        &self,
        scale: &SeverityScale,
        minimum: &str,
    ) -> Result<bool, LintError> {
        let Some(min) = scale.rank(minimum) else {
            return Err(LintError::UnknownSeverity {
                rules: Vec::new(),
                severities: vec![minimum.to_string()],
                valid: scale.labels().to_vec(),
            });
        };
        Ok(self
            .iter()
            .filter_map(|v| scale.rank(&v.severity))
            .any(|rank| rank >= min))
    }
}
