//! The unit of validation.

use crate::spec::{Document, Operation};
use serde::{Deserialize, Serialize};

/// One reported finding
///
/// Created only by rule evaluation and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Name of the rule that produced this finding
    pub rule_name: String,
    /// Severity label of the producing rule
    pub severity: String,
    /// Location reference, e.g. `#/paths/~1ping/get`
    pub pointer: String,
    /// Human-readable description of the problem
    pub message: String,
}

impl Violation {
    pub fn new(
        rule_name: impl Into<String>,
        severity: impl Into<String>,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Violation {
            rule_name: rule_name.into(),
            severity: severity.into(),
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    /// Violation attributed to `rule`, using its name and severity
    pub fn for_rule<R: Rule + ?Sized>(
        rule: &R,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Violation::new(rule.name(), rule.severity(), pointer, message)
    }
}

/// A named check with a declared scope and severity
///
/// Scope and severity are declared as labels and resolved by the policy at
/// validation time, so a misconfigured rule is reported instead of silently
/// skipped. Every rule implements both entry points; the one that does not
/// match the rule's scope should return no violations.
///
/// Implementations must not keep mutable state between invocations: a built
/// policy may be shared across threads validating different documents.
pub trait Rule: Send + Sync {
    /// Unique kebab-case identifier, e.g. `operation-summary-exist`
    fn name(&self) -> &str;

    /// Scope label: `specification` or `operation`
    fn scope(&self) -> &str;

    /// Severity label on the active scale
    fn severity(&self) -> &str;

    /// Evaluate against the whole document.
    ///
    /// `pointer_base` prefixes every pointer this rule builds.
    fn process_spec(&self, doc: &Document, pointer_base: &str) -> Vec<Violation>;

    /// Evaluate against one operation.
    ///
    /// `pointer` already addresses the operation; `path` and `method` are the
    /// raw path template and upper-case verb.
    fn process_operation(
        &self,
        doc: &Document,
        op: &Operation,
        pointer: &str,
        path: &str,
        method: &str,
    ) -> Vec<Violation>;
}
