//! Rule scopes: the granularity a rule runs at.

use crate::error::LintError;
use std::fmt;
use std::str::FromStr;

/// Granularity a rule applies at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Evaluated once against the whole document
    Specification,
    /// Evaluated once per operation
    Operation,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Specification => "specification",
            Scope::Operation => "operation",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scope {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scope(s)
    }
}

/// Parse a free-text scope label.
///
/// Accepts `specification` and `operation`, trimmed and case-insensitive.
///
/// # Errors
///
/// [`LintError::UnknownScope`] for any other label.
pub fn parse_scope(label: &str) -> Result<Scope, LintError> {
    match label.trim().to_lowercase().as_str() {
        "specification" => Ok(Scope::Specification),
        "operation" => Ok(Scope::Operation),
        _ => Err(LintError::UnknownScope {
            rules: Vec::new(),
            scopes: vec![label.to_string()],
        }),
    }
}

/// Exact match between a pass's scope and a rule's declared label.
///
/// There is no hierarchy: an operation-scoped rule never matches the
/// specification pass. A label that does not parse matches nothing.
pub fn scope_match(candidate: Scope, rule_declared: &str) -> bool {
    parse_scope(rule_declared).map_or(false, |s| s == candidate)
}
