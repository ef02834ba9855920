//! Rule registry: stable rule names mapped to constructors.
//!
//! The standard registry is populated once, from [`crate::rules::catalog`],
//! the first time it is needed. There is no discovery mechanism: a rule is
//! available by name only if a constructor was registered for it.

use crate::error::LintError;
use crate::policy::validate_rule_name;
use crate::rule::Rule;
use crate::rules;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Builds a rule reporting at the given severity label
pub type RuleConstructor = fn(severity: &str) -> Box<dyn Rule>;

static STANDARD: Lazy<RuleRegistry> = Lazy::new(RuleRegistry::standard);

/// Process-wide registry of standard rules
pub fn standard_registry() -> &'static RuleRegistry {
    &STANDARD
}

/// Lookup table from rule name to constructor
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    constructors: BTreeMap<String, RuleConstructor>,
}

impl RuleRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every standard rule
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (name, ctor) in rules::catalog() {
            registry.constructors.insert(name.to_string(), ctor);
        }
        registry
    }

    /// Register a constructor under `name`.
    ///
    /// # Errors
    ///
    /// [`LintError::InvalidRuleName`] for a bad name and
    /// [`LintError::RuleNameCollision`] if the name is taken.
    pub fn register(&mut self, name: &str, ctor: RuleConstructor) -> Result<(), LintError> {
        validate_rule_name(name)?;
        if self.constructors.contains_key(name) {
            return Err(LintError::RuleNameCollision {
                name: name.to_string(),
            });
        }
        self.constructors.insert(name.to_string(), ctor);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Construct the rule registered as `name` with `severity`.
    ///
    /// The severity label is not checked here; unknown labels surface when
    /// the policy is validated.
    ///
    /// # Errors
    ///
    /// [`LintError::UnknownRule`] if nothing is registered under `name`.
    pub fn build(&self, name: &str, severity: &str) -> Result<Box<dyn Rule>, LintError> {
        let ctor = self
            .constructors
            .get(name)
            .ok_or_else(|| LintError::UnknownRule {
                name: name.to_string(),
            })?;
        Ok(ctor(severity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::parse_scope;

    #[test]
    fn test_empty_registry() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.build("anything", "error").is_err());
    }

    #[test]
    fn test_standard_registry_builds_every_rule() {
        let registry = standard_registry();
        assert_eq!(registry.len(), rules::catalog().len());
        for name in registry.names() {
            let rule = registry.build(name, "warning").unwrap();
            assert_eq!(rule.name(), name);
            assert_eq!(rule.severity(), "warning");
            assert!(parse_scope(rule.scope()).is_ok(), "bad scope for {name}");
            assert!(validate_rule_name(name).is_ok(), "bad name {name}");
        }
    }

    #[test]
    fn test_unknown_rule() {
        let err = standard_registry().build("no-such-rule", "error").err().unwrap();
        assert_eq!(
            err,
            LintError::UnknownRule {
                name: "no-such-rule".to_string()
            }
        );
    }

    fn summary_alias(severity: &str) -> Box<dyn Rule> {
        Box::new(rules::OperationSummaryExist::new(severity))
    }

    #[test]
    fn test_register_rejects_bad_names_and_collisions() {
        let mut registry = RuleRegistry::standard();
        let ctor: RuleConstructor = summary_alias;
        assert!(matches!(
            registry.register("Bad_Name", ctor),
            Err(LintError::InvalidRuleName { .. })
        ));
        assert!(matches!(
            registry.register("operation-summary-exist", ctor),
            Err(LintError::RuleNameCollision { .. })
        ));
        assert!(registry.register("summary-alias", ctor).is_ok());
        assert!(registry.contains("summary-alias"));
    }
}
