//! # Standard Rules
//!
//! The catalog of rules a policy configuration can name without supplying
//! code. Each rule is a small stateless struct carrying only the severity it
//! was configured with.
//!
//! | Rule | Scope |
//! |------|-------|
//! | `operation-operationid-exist` | operation |
//! | `operation-operationid-style-camelcase` | operation |
//! | `operation-operationid-style-snakecase` | operation |
//! | `operation-summary-exist` | operation |
//! | `operation-summary-case-first-capitalized` | operation |
//! | `operation-tags-exist` | operation |
//! | `operation-parameter-name-style-camelcase` | operation |
//! | `servers-url-https` | specification |
//! | `schema-reference-has-schema` | specification |
//! | `tag-description-exist` | specification |

use crate::registry::RuleConstructor;
use crate::rule::Rule;
use crate::scope::Scope;

/// Name and scope of a catalog rule, plus its severity-only constructor
pub trait StandardRule: Rule + 'static {
    const NAME: &'static str;
    const SCOPE: Scope;

    fn with_severity(severity: &str) -> Self;
}

macro_rules! standard_rule {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $scope:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $ty {
            severity: String,
        }

        impl $ty {
            pub fn new(severity: &str) -> Self {
                Self {
                    severity: severity.to_string(),
                }
            }
        }

        impl $crate::rules::StandardRule for $ty {
            const NAME: &'static str = $name;
            const SCOPE: $crate::scope::Scope = $scope;

            fn with_severity(severity: &str) -> Self {
                Self::new(severity)
            }
        }
    };
}

macro_rules! rule_identity {
    () => {
        fn name(&self) -> &str {
            <Self as $crate::rules::StandardRule>::NAME
        }

        fn scope(&self) -> &str {
            <Self as $crate::rules::StandardRule>::SCOPE.as_str()
        }

        fn severity(&self) -> &str {
            &self.severity
        }
    };
}

mod document;
mod operation;


pub use document::{SchemaReferenceHasSchema, ServersUrlHttps, TagDescriptionExist};
pub use operation::{
    OperationOperationIdExist, OperationOperationIdStyleCamelCase,
    OperationOperationIdStyleSnakeCase, OperationParameterNameStyleCamelCase,
    OperationSummaryCaseFirstCapitalized, OperationSummaryExist, OperationTagsExist,
};

fn construct<R: StandardRule>(severity: &str) -> Box<dyn Rule> {
    Box::new(R::with_severity(severity))
}

fn entry<R: StandardRule>() -> (&'static str, RuleConstructor) {
    (R::NAME, construct::<R> as RuleConstructor)
}

/// Every standard rule with its constructor
pub fn catalog() -> Vec<(&'static str, RuleConstructor)> {
    vec![
        entry::<OperationOperationIdExist>(),
        entry::<OperationOperationIdStyleCamelCase>(),
        entry::<OperationOperationIdStyleSnakeCase>(),
        entry::<OperationParameterNameStyleCamelCase>(),
        entry::<OperationSummaryCaseFirstCapitalized>(),
        entry::<OperationSummaryExist>(),
        entry::<OperationTagsExist>(),
        entry::<SchemaReferenceHasSchema>(),
        entry::<ServersUrlHttps>(),
        entry::<TagDescriptionExist>(),
    ]
}
