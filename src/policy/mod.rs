//! # Policy Module
//!
//! A [`Policy`] is a set of uniquely-named [`Rule`]s plus the orchestration
//! that runs them against a document.
//!
//! ## Validation flow
//!
//! [`Policy::validate_spec`] runs in four steps:
//!
//! 1. **Pre-flight** - every rule's scope label must parse. One bad scope
//!    aborts the run before any rule executes.
//! 2. **Document pass** - each specification-scoped rule at or above the
//!    filter severity runs once via [`Rule::process_spec`].
//! 3. **Operation pass** - if any operation-scoped rule survives the filter,
//!    every operation is visited once and each such rule runs via
//!    [`Rule::process_operation`] with the operation's pointer.
//! 4. **Merge** - both passes are merged into one [`ViolationsReport`]. If a
//!    severity could not be compared in either pass, the run fails with an
//!    [`LintError::UnknownSeverity`] naming every offending rule instead of
//!    returning a partial report.
//!
//! A rule that panics during evaluation does not abort the run: the panic is
//! caught and reported as a violation with severity
//! [`RULE_FAULT_SEVERITY`]. A rule's name, scope and severity are read once,
//! when it is added; a rule that panics there is rejected by
//! [`Policy::add_rule`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use speclint::policy::PolicyConfig;
//! use speclint::spec::load_document;
//!
//! let config = PolicyConfig::from_file("policy.json".as_ref())?;
//! let policy = config.standard_policy()?;
//! let doc = load_document("openapi.yaml".as_ref())?;
//! let report = policy.validate_spec(Some(&doc), "", "warning")?;
//! ```

mod config;


pub use config::{PolicyConfig, RuleConfig, RuleNames};

use crate::casing::is_kebab_case;
use crate::error::LintError;
use crate::report::ViolationsReport;
use crate::rule::{Rule, Violation};
use crate::scope::{parse_scope, scope_match, Scope};
use crate::severity::{severity_include, severity_scale, RULE_FAULT_SEVERITY};
use crate::spec::{document_pointer, operation_pointer, visit_operations, Document};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Uniquely-named rules and the orchestration that runs them
///
/// Rules are kept sorted by name so every pass visits them in the same order.
#[derive(Default)]
pub struct Policy {
    rules: BTreeMap<String, PolicyRule>,
}

/// A rule with the labels it declared when it was added
struct PolicyRule {
    scope: String,
    severity: String,
    rule: Box<dyn Rule>,
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Reject empty and non-kebab-case rule names
pub fn validate_rule_name(name: &str) -> Result<(), LintError> {
    if name.is_empty() {
        return Err(LintError::InvalidRuleName {
            name: name.to_string(),
            reason: "rule to add must have non-empty name".to_string(),
        });
    }
    if !is_kebab_case(name) {
        return Err(LintError::InvalidRuleName {
            name: name.to_string(),
            reason: "rule name must be in kebab-case format".to_string(),
        });
    }
    Ok(())
}

impl Policy {
    /// An empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule under its own name.
    ///
    /// With `error_on_collision` set, adding a second rule with an existing
    /// name fails; otherwise the new rule replaces the old one.
    ///
    /// # Errors
    ///
    /// - [`LintError::RuleAccessorPanicked`] if reading the rule's name,
    ///   scope or severity panics
    /// - [`LintError::InvalidRuleName`] for an empty or non-kebab-case name
    /// - [`LintError::RuleNameCollision`] on collision when requested
    pub fn add_rule(&mut self, rule: Box<dyn Rule>, error_on_collision: bool) -> Result<(), LintError> {
        let labels = catch_unwind(AssertUnwindSafe(|| {
            (
                rule.name().to_string(),
                rule.scope().to_string(),
                rule.severity().to_string(),
            )
        }));
        let (name, scope, severity) = labels.map_err(|panic| LintError::RuleAccessorPanicked {
            detail: panic_message(&*panic),
        })?;
        validate_rule_name(&name)?;
        if self.rules.contains_key(&name) {
            if error_on_collision {
                return Err(LintError::RuleNameCollision { name });
            }
            debug!(rule = %name, "replacing existing rule");
        }
        self.rules.insert(
            name,
            PolicyRule {
                scope,
                severity,
                rule,
            },
        );
        Ok(())
    }

    /// Rule names, sorted
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn rule(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(|entry| entry.rule.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate `doc` against every rule at or above `filter_severity`.
    ///
    /// See the [module documentation](self) for the full flow.
    ///
    /// # Errors
    ///
    /// - [`LintError::NilInput`] when `doc` is `None`
    /// - [`LintError::UnknownScope`] when any rule's scope does not parse; no
    ///   rule runs in that case
    /// - [`LintError::UnknownSeverity`] when `filter_severity` or any rule's
    ///   severity is not on the active scale. An unknown filter is rejected
    ///   before any rule runs, even for an empty policy.
    pub fn validate_spec(
        &self,
        doc: Option<&Document>,
        pointer_base: &str,
        filter_severity: &str,
    ) -> Result<ViolationsReport, LintError> {
        let doc = doc.ok_or_else(|| LintError::NilInput {
            what: "spec".to_string(),
        })?;

        self.check_scopes()?;

        if !severity_scale().contains(filter_severity) {
            let all: Vec<(String, String)> = self
                .rules
                .iter()
                .map(|(name, entry)| (name.clone(), entry.severity.clone()))
                .collect();
            let err = unknown_severity_error(all, filter_severity);
            warn!(error = %err, "validation aborted");
            return Err(err);
        }

        let mut severity_errors: Vec<(String, String)> = Vec::new();

        let spec_rules = self.included_rules(Scope::Specification, filter_severity, &mut severity_errors);
        let op_rules = self.included_rules(Scope::Operation, filter_severity, &mut severity_errors);

        let mut report = ViolationsReport::new();
        report.upsert_sets(process_rules_specification(&spec_rules, doc, pointer_base));
        if !op_rules.is_empty() {
            report.upsert_sets(process_rules_operation(&op_rules, doc, pointer_base));
        }

        if !severity_errors.is_empty() {
            let err = unknown_severity_error(severity_errors, filter_severity);
            warn!(error = %err, "validation aborted");
            return Err(err);
        }

        info!(
            rules = self.rules.len(),
            violations = report.len(),
            filter_severity = %filter_severity,
            "validation complete"
        );
        Ok(report)
    }

    /// Pre-flight: every rule's scope label must parse.
    fn check_scopes(&self) -> Result<(), LintError> {
        let mut rules = Vec::new();
        let mut scopes = Vec::new();
        for (name, entry) in &self.rules {
            if parse_scope(&entry.scope).is_err() {
                rules.push(name.clone());
                scopes.push(entry.scope.clone());
            }
        }
        if rules.is_empty() {
            return Ok(());
        }
        let err = LintError::UnknownScope { rules, scopes };
        warn!(error = %err, "bad policy");
        Err(err)
    }

    /// Rules of `scope` that pass the severity filter. Rules whose severity
    /// cannot be compared are recorded in `errors` and left out.
    fn included_rules(
        &self,
        scope: Scope,
        filter_severity: &str,
        errors: &mut Vec<(String, String)>,
    ) -> Vec<(&str, &dyn Rule)> {
        let mut out = Vec::new();
        for (name, entry) in &self.rules {
            if !scope_match(scope, &entry.scope) {
                continue;
            }
            match severity_include(filter_severity, &entry.severity) {
                Ok(true) => out.push((name.as_str(), entry.rule.as_ref())),
                Ok(false) => debug!(rule = %name, severity = %entry.severity, "rule filtered out"),
                Err(_) => errors.push((name.clone(), entry.severity.clone())),
            }
        }
        out
    }
}

fn process_rules_specification(
    rules: &[(&str, &dyn Rule)],
    doc: &Document,
    pointer_base: &str,
) -> ViolationsReport {
    let mut report = ViolationsReport::new();
    let root = document_pointer(pointer_base, std::iter::empty::<&str>());
    for (name, rule) in rules {
        debug!(rule = %name, "processing specification rule");
        report.add_violations(run_guarded(name, &root, || {
            rule.process_spec(doc, pointer_base)
        }));
    }
    report
}

fn process_rules_operation(
    rules: &[(&str, &dyn Rule)],
    doc: &Document,
    pointer_base: &str,
) -> ViolationsReport {
    let mut report = ViolationsReport::new();
    visit_operations(doc, |path, method, op| {
        let op_pointer = operation_pointer(pointer_base, path, method);
        for (name, rule) in rules {
            report.add_violations(run_guarded(name, &op_pointer, || {
                rule.process_operation(doc, op, &op_pointer, path, method.as_str())
            }));
        }
    });
    report
}

/// Run one rule evaluation, turning a panic into a rule-fault violation.
fn run_guarded<F>(rule_name: &str, pointer: &str, eval: F) -> Vec<Violation>
where
    F: FnOnce() -> Vec<Violation>,
{
    match catch_unwind(AssertUnwindSafe(eval)) {
        Ok(violations) => violations,
        Err(panic) => {
            let detail = panic_message(&*panic);
            error!(rule = %rule_name, pointer = %pointer, detail = %detail, "rule panicked");
            vec![Violation::new(
                rule_name,
                RULE_FAULT_SEVERITY,
                pointer,
                format!("rule [{}] failed during evaluation: {}", rule_name, detail),
            )]
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn unknown_severity_error(errors: Vec<(String, String)>, filter_severity: &str) -> LintError {
    let scale = severity_scale();
    let mut rules: Vec<String> = errors.iter().map(|(r, _)| r.clone()).collect();
    rules.sort();
    rules.dedup();
    let mut severities: Vec<String> = errors
        .into_iter()
        .map(|(_, s)| s)
        .filter(|s| !scale.contains(s))
        .collect();
    if !scale.contains(filter_severity) {
        severities.push(filter_severity.to_string());
    }
    severities.sort();
    severities.dedup();
    LintError::UnknownSeverity {
        rules,
        severities,
        valid: scale.labels().to_vec(),
    }
}
