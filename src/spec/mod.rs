//! # Spec Module
//!
//! The in-memory OpenAPI document and the primitives every other module
//! shares to walk and address it.
//!
//! - [`load`] reads a JSON or YAML file into a [`Document`]
//! - [`visit`] walks every (path, method, operation) triple in a fixed order
//! - [`pointer`] builds JSON-Pointer-style location references
//!
//! The document model is the [`oas3`] crate's spec type. The engine only ever
//! borrows it immutably; editing collaborators in [`crate::edit`] use the
//! mutable traversal.

pub mod load;
pub mod pointer;
pub mod visit;

pub use load::*;
pub use pointer::*;
pub use visit::*;

/// Parsed OpenAPI 3 document
pub type Document = oas3::OpenApiV3Spec;

/// A single operation under a path item
pub type Operation = oas3::spec::Operation;
