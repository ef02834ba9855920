use std::fmt;

/// Errors raised by policy construction and validation runs
///
/// Configuration-shape errors (`InvalidRuleName`, `RuleNameCollision`,
/// `UnknownRule`) surface while a [`Policy`](crate::policy::Policy) is being
/// built. Scope and severity errors surface from
/// [`Policy::validate_spec`](crate::policy::Policy::validate_spec) and carry
/// every offending rule, so a policy can be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintError {
    /// Rule name is empty or not kebab-case
    InvalidRuleName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },
    /// A rule with this name is already part of the policy
    RuleNameCollision {
        /// The colliding name
        name: String,
    },
    /// One or more rules declare a scope outside the known set
    UnknownScope {
        /// Rules whose scope could not be parsed
        rules: Vec<String>,
        /// The unparseable scope labels, aligned with `rules`
        scopes: Vec<String>,
    },
    /// One or more severity labels are not on the active scale
    UnknownSeverity {
        /// Rules whose severity could not be compared (may be empty when the
        /// error comes from a direct comparison)
        rules: Vec<String>,
        /// The unrecognized labels
        severities: Vec<String>,
        /// Labels on the active scale, lowest first
        valid: Vec<String>,
    },
    /// A required input was absent
    NilInput {
        /// What was missing
        what: String,
    },
    /// Reading a rule's name, scope or severity panicked
    RuleAccessorPanicked {
        /// The panic message
        detail: String,
    },
    /// A policy configuration names a rule the registry cannot build
    UnknownRule {
        /// The unknown rule name
        name: String,
    },
    /// A severity scale could not be built
    InvalidSeverityScale {
        /// Why the scale was rejected
        reason: String,
    },
    /// The process-wide severity scale was already installed
    SeverityScaleInstalled,
    /// Operations left without an operationId after derivation from summaries
    OperationIdsMissing {
        /// `METHOD path` keys of the affected operations
        path_methods: Vec<String>,
    },
    /// An operation meta carries a documentation URL that does not parse
    InvalidDocsUrl {
        /// operationId the meta is keyed by
        operation_id: String,
        /// The rejected URL
        url: String,
        /// Parser message
        reason: String,
    },
    /// The document model has no slot for this method
    UnsupportedMethod {
        /// Upper-case method
        method: String,
    },
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintError::InvalidRuleName { name, reason } => {
                write!(f, "invalid rule name [{}]: {}", name, reason)
            }
            LintError::RuleNameCollision { name } => {
                write!(f, "add rule collision for [{}]", name)
            }
            LintError::UnknownScope { rules, scopes } => {
                write!(
                    f,
                    "bad policy: rules have unknown scopes rules[{}] scopes[{}]",
                    rules.join(","),
                    scopes.join(",")
                )
            }
            LintError::UnknownSeverity {
                rules,
                severities,
                valid,
            } => {
                write!(
                    f,
                    "unknown severities rules[{}] severities[{}] valid[{}]",
                    rules.join(","),
                    severities.join(","),
                    valid.join(",")
                )
            }
            LintError::NilInput { what } => write!(f, "cannot process nil {}", what),
            LintError::RuleAccessorPanicked { detail } => {
                write!(f, "rule to add panicked while declaring itself: {}", detail)
            }
            LintError::UnknownRule { name } => {
                write!(f, "rule [{}] is not a standard rule", name)
            }
            LintError::InvalidSeverityScale { reason } => {
                write!(f, "invalid severity scale: {}", reason)
            }
            LintError::SeverityScaleInstalled => {
                write!(f, "severity scale is already installed for this process")
            }
            LintError::OperationIdsMissing { path_methods } => {
                write!(f, "no_opid: [{}]", path_methods.join(", "))
            }
            LintError::InvalidDocsUrl {
                operation_id,
                url,
                reason,
            } => {
                write!(
                    f,
                    "operation [{}] has invalid docs url [{}]: {}",
                    operation_id, url, reason
                )
            }
            LintError::UnsupportedMethod { method } => {
                write!(f, "method [{}] cannot hold an operation", method)
            }
        }
    }
}

impl std::error::Error for LintError {}
