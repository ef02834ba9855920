//! Operation-scoped rules.

use crate::casing::{is_camel_case, is_snake_case, to_camel_case, to_snake_case};
use crate::rule::{Rule, Violation};
use crate::scope::Scope;
use crate::spec::{append_segment, Document, Operation};
use oas3::spec::{ObjectOrReference, ParameterIn};

/// Non-blank operationId, if present
fn operation_id(op: &Operation) -> Option<&str> {
    op.operation_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn summary(op: &Operation) -> Option<&str> {
    op.summary.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

standard_rule!(
    /// Every operation must declare a non-blank `operationId`.
    OperationOperationIdExist,
    "operation-operationid-exist",
    Scope::Operation
);

impl Rule for OperationOperationIdExist {
    rule_identity!();

    fn process_spec(&self, _doc: &Document, _pointer_base: &str) -> Vec<Violation> {
        Vec::new()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        op: &Operation,
        pointer: &str,
        path: &str,
        method: &str,
    ) -> Vec<Violation> {
        if operation_id(op).is_some() {
            return Vec::new();
        }
        vec![Violation::for_rule(
            self,
            pointer,
            format!("operation [{} {}] is missing operationId", method, path),
        )]
    }
}

standard_rule!(
    /// `operationId` must be lowerCamelCase. Missing ids are left to
    /// `operation-operationid-exist`.
    OperationOperationIdStyleCamelCase,
    "operation-operationid-style-camelcase",
    Scope::Operation
);

impl Rule for OperationOperationIdStyleCamelCase {
    rule_identity!();

    fn process_spec(&self, _doc: &Document, _pointer_base: &str) -> Vec<Violation> {
        Vec::new()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        op: &Operation,
        pointer: &str,
        _path: &str,
        _method: &str,
    ) -> Vec<Violation> {
        match operation_id(op) {
            Some(id) if !is_camel_case(id) => vec![Violation::for_rule(
                self,
                append_segment(pointer, "operationId"),
                format!(
                    "operationId [{}] should be camelCase (e.g. [{}])",
                    id,
                    to_camel_case(id)
                ),
            )],
            _ => Vec::new(),
        }
    }
}

standard_rule!(
    /// `operationId` must be snake_case.
    OperationOperationIdStyleSnakeCase,
    "operation-operationid-style-snakecase",
    Scope::Operation
);

impl Rule for OperationOperationIdStyleSnakeCase {
    rule_identity!();

    fn process_spec(&self, _doc: &Document, _pointer_base: &str) -> Vec<Violation> {
        Vec::new()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        op: &Operation,
        pointer: &str,
        _path: &str,
        _method: &str,
    ) -> Vec<Violation> {
        match operation_id(op) {
            Some(id) if !is_snake_case(id) => vec![Violation::for_rule(
                self,
                append_segment(pointer, "operationId"),
                format!(
                    "operationId [{}] should be snake_case (e.g. [{}])",
                    id,
                    to_snake_case(id)
                ),
            )],
            _ => Vec::new(),
        }
    }
}

standard_rule!(
    /// Every operation must have a non-blank summary.
    OperationSummaryExist,
    "operation-summary-exist",
    Scope::Operation
);

impl Rule for OperationSummaryExist {
    rule_identity!();

    fn process_spec(&self, _doc: &Document, _pointer_base: &str) -> Vec<Violation> {
        Vec::new()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        op: &Operation,
        pointer: &str,
        path: &str,
        method: &str,
    ) -> Vec<Violation> {
        if summary(op).is_some() {
            return Vec::new();
        }
        vec![Violation::for_rule(
            self,
            pointer,
            format!("operation [{} {}] is missing a summary", method, path),
        )]
    }
}

standard_rule!(
    /// Summaries start with an upper-case letter.
    OperationSummaryCaseFirstCapitalized,
    "operation-summary-case-first-capitalized",
    Scope::Operation
);

impl Rule for OperationSummaryCaseFirstCapitalized {
    rule_identity!();

    fn process_spec(&self, _doc: &Document, _pointer_base: &str) -> Vec<Violation> {
        Vec::new()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        op: &Operation,
        pointer: &str,
        _path: &str,
        _method: &str,
    ) -> Vec<Violation> {
        let Some(summary) = summary(op) else {
            return Vec::new();
        };
        let first = summary.chars().next();
        if first.map(char::is_uppercase).unwrap_or(false) {
            return Vec::new();
        }
        vec![Violation::for_rule(
            self,
            append_segment(pointer, "summary"),
            format!("summary [{}] should start with a capital letter", summary),
        )]
    }
}

standard_rule!(
    /// Every operation carries at least one tag.
    OperationTagsExist,
    "operation-tags-exist",
    Scope::Operation
);

impl Rule for OperationTagsExist {
    rule_identity!();

    fn process_spec(&self, _doc: &Document, _pointer_base: &str) -> Vec<Violation> {
        Vec::new()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        op: &Operation,
        pointer: &str,
        path: &str,
        method: &str,
    ) -> Vec<Violation> {
        if op.tags.iter().any(|t| !t.trim().is_empty()) {
            return Vec::new();
        }
        vec![Violation::for_rule(
            self,
            pointer,
            format!("operation [{} {}] has no tags", method, path),
        )]
    }
}

standard_rule!(
    /// Inline path and query parameter names must be lowerCamelCase.
    ///
    /// Referenced parameters are checked where they are defined, not at each
    /// use site.
    OperationParameterNameStyleCamelCase,
    "operation-parameter-name-style-camelcase",
    Scope::Operation
);

impl Rule for OperationParameterNameStyleCamelCase {
    rule_identity!();

    fn process_spec(&self, _doc: &Document, _pointer_base: &str) -> Vec<Violation> {
        Vec::new()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        op: &Operation,
        pointer: &str,
        _path: &str,
        _method: &str,
    ) -> Vec<Violation> {
        let mut out = Vec::new();
        for (idx, param) in op.parameters.iter().enumerate() {
            let ObjectOrReference::Object(param) = param else {
                continue;
            };
            if !matches!(param.location, ParameterIn::Path | ParameterIn::Query) {
                continue;
            }
            if is_camel_case(&param.name) {
                continue;
            }
            let param_pointer = append_segment(&append_segment(pointer, "parameters"), &idx.to_string());
            out.push(Violation::for_rule(
                self,
                append_segment(&param_pointer, "name"),
                format!(
                    "parameter name [{}] should be camelCase (e.g. [{}])",
                    param.name,
                    to_camel_case(&param.name)
                ),
            ));
        }
        out
    }
}
