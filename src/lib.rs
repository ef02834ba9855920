//! # speclint
//!
//! **speclint** is a policy-driven linter for
//! [OpenAPI 3](https://spec.openapis.org/oas/v3.1.0) documents.
//!
//! ## Overview
//!
//! A [`Policy`] is a set of uniquely-named [`Rule`]s. Each rule declares a
//! *scope* (`specification` or `operation`) and a *severity* label. Validating
//! a document runs every specification-scoped rule once and every
//! operation-scoped rule once per operation, keeps only rules at or above a
//! filter severity, and gathers the findings into a [`ViolationsReport`].
//! Every finding carries a JSON-Pointer-style location such as
//! `#/paths/~1users~1{id}/get`.
//!
//! ## Architecture
//!
//! - **[`severity`]** - process-wide ordered severity scale
//! - **[`scope`]** - the two rule scopes and label parsing
//! - **[`spec`]** - document loading, operation traversal and pointers
//! - **[`rule`]** - the [`Rule`] trait and [`Violation`]
//! - **[`policy`]** - rule set, orchestration, and policy configuration files
//! - **[`report`]** - violation aggregation and merging
//! - **[`registry`]** / **[`rules`]** - the standard rule catalog by name
//! - **[`edit`]** - bulk document edits (deprecation, operationIds, extensions, metas, security)
//! - **[`cli`]**, **[`logging`]**, **[`runtime_config`]** - the `speclint` binary
//!
//! ### Validation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Policy
//!     participant Rule
//!     participant Report as ViolationsReport
//!
//!     Caller->>Policy: validate_spec(doc, pointer_base, filter)
//!     Policy->>Policy: every rule scope parses?
//!     Policy->>Rule: process_spec (specification rules)
//!     Rule-->>Report: violations
//!     loop each (path, method, operation)
//!         Policy->>Rule: process_operation (operation rules)
//!         Rule-->>Report: violations
//!     end
//!     Policy-->>Caller: report, or UnknownSeverity naming every bad rule
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use speclint::policy::PolicyConfig;
//! use speclint::spec::load_document;
//!
//! # fn main() -> anyhow::Result<()> {
//! let doc = load_document("openapi.yaml".as_ref())?;
//! let policy = PolicyConfig::from_file("policy.json".as_ref())?.standard_policy()?;
//! let report = policy.validate_spec(Some(&doc), "", "warning")?;
//! for v in report.sorted() {
//!     println!("[{}] {} {}", v.severity, v.pointer, v.message);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Rules
//!
//! Implement [`Rule`] and add it to a policy. Rules must be stateless: a
//! built policy may be shared between threads.
//!
//! ```rust
//! use speclint::rule::{Rule, Violation};
//! use speclint::spec::{Document, Operation};
//!
//! struct NoTrace;
//!
//! impl Rule for NoTrace {
//!     fn name(&self) -> &str { "operation-no-trace" }
//!     fn scope(&self) -> &str { "operation" }
//!     fn severity(&self) -> &str { "error" }
//!     fn process_spec(&self, _: &Document, _: &str) -> Vec<Violation> { Vec::new() }
//!     fn process_operation(
//!         &self,
//!         _doc: &Document,
//!         _op: &Operation,
//!         pointer: &str,
//!         _path: &str,
//!         method: &str,
//!     ) -> Vec<Violation> {
//!         if method == "TRACE" {
//!             vec![Violation::for_rule(self, pointer, "TRACE is not allowed")]
//!         } else {
//!             Vec::new()
//!         }
//!     }
//! }
//!
//! let mut policy = speclint::Policy::new();
//! policy.add_rule(Box::new(NoTrace), true).unwrap();
//! ```

pub mod casing;
pub mod cli;
pub mod edit;
pub mod error;
pub mod logging;
pub mod policy;
pub mod registry;
pub mod report;
pub mod rule;
pub mod rules;
pub mod runtime_config;
pub mod scope;
pub mod severity;
pub mod spec;

pub use error::LintError;
pub use policy::{Policy, PolicyConfig};
pub use registry::{standard_registry, RuleRegistry};
pub use report::{ReportSummary, ViolationsReport};
pub use rule::{Rule, Violation};
pub use scope::Scope;
pub use severity::{severity_include, SeverityScale};
pub use spec::{load_document, visit_operations, Document, HttpMethod, Operation};
