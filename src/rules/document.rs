//! Specification-scoped rules.

use crate::rule::{Rule, Violation};
use crate::scope::Scope;
use crate::spec::{append_segment, document_pointer, Document, Operation};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

standard_rule!(
    /// Absolute server URLs must use `https`. Relative URLs are allowed.
    ServersUrlHttps,
    "servers-url-https",
    Scope::Specification
);

impl Rule for ServersUrlHttps {
    rule_identity!();

    fn process_spec(&self, doc: &Document, pointer_base: &str) -> Vec<Violation> {
        let mut out = Vec::new();
        for (idx, server) in doc.servers.iter().enumerate() {
            let url = server.url.trim();
            let Some((scheme, _)) = url.split_once("://") else {
                continue;
            };
            if scheme.eq_ignore_ascii_case("https") {
                continue;
            }
            out.push(Violation::for_rule(
                self,
                document_pointer(pointer_base, ["servers", idx.to_string().as_str(), "url"]),
                format!("server url [{}] does not use https", url),
            ));
        }
        out
    }

    fn process_operation(
        &self,
        _doc: &Document,
        _op: &Operation,
        _pointer: &str,
        _path: &str,
        _method: &str,
    ) -> Vec<Violation> {
        Vec::new()
    }
}

standard_rule!(
    /// Top-level tags must carry a description.
    TagDescriptionExist,
    "tag-description-exist",
    Scope::Specification
);

impl Rule for TagDescriptionExist {
    rule_identity!();

    fn process_spec(&self, doc: &Document, pointer_base: &str) -> Vec<Violation> {
        doc.tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| {
                tag.description
                    .as_deref()
                    .map(|d| d.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|(idx, tag)| {
                Violation::for_rule(
                    self,
                    document_pointer(pointer_base, ["tags", idx.to_string().as_str()]),
                    format!("tag [{}] is missing a description", tag.name),
                )
            })
            .collect()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        _op: &Operation,
        _pointer: &str,
        _path: &str,
        _method: &str,
    ) -> Vec<Violation> {
        Vec::new()
    }
}

standard_rule!(
    /// Every `#/components/schemas/<name>` reference must point at a defined
    /// schema.
    ///
    /// The whole document is searched: operations, path-level parameters and
    /// every components section. Each violation points at the object holding
    /// the dangling `$ref`.
    SchemaReferenceHasSchema,
    "schema-reference-has-schema",
    Scope::Specification
);

impl Rule for SchemaReferenceHasSchema {
    rule_identity!();

    fn process_spec(&self, doc: &Document, pointer_base: &str) -> Vec<Violation> {
        let defined: HashSet<&str> = doc
            .components
            .as_ref()
            .map(|c| c.schemas.keys().map(String::as_str).collect())
            .unwrap_or_default();

        // Walk the serialized form so nested schemas are covered without
        // matching every shape the document model allows.
        let tree = match serde_json::to_value(doc) {
            Ok(v) => v,
            Err(err) => {
                warn!(rule = %self.name(), error = %err, "document could not be serialized");
                return Vec::new();
            }
        };

        let mut refs = Vec::new();
        collect_schema_refs(&tree, &format!("{}#", pointer_base), &mut refs);

        refs.into_iter()
            .filter(|r| !defined.contains(r.name.as_str()))
            .map(|r| {
                Violation::for_rule(
                    self,
                    r.pointer,
                    format!("schema reference [{}] has no schema", r.reference),
                )
            })
            .collect()
    }

    fn process_operation(
        &self,
        _doc: &Document,
        _op: &Operation,
        _pointer: &str,
        _path: &str,
        _method: &str,
    ) -> Vec<Violation> {
        Vec::new()
    }
}

/// A component schema `$ref` found in the document
struct SchemaRef {
    /// Pointer to the object holding the `$ref`
    pointer: String,
    /// The reference as written
    reference: String,
    /// Decoded schema name
    name: String,
}

/// Schema name addressed by a `#/components/schemas/...` reference.
///
/// Only the first segment after the prefix names the schema; deeper
/// segments address into it. The segment is percent-decoded, then
/// JSON-Pointer-unescaped (`~1` before `~0`).
fn schema_ref_name(reference: &str) -> Option<String> {
    let rest = reference.strip_prefix(SCHEMA_REF_PREFIX)?;
    let segment = rest.split('/').next().unwrap_or_default();
    if segment.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(segment)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded.replace("~1", "/").replace("~0", "~"))
}

/// Collect every component schema `$ref` at or below `node`.
fn collect_schema_refs(node: &Value, pointer: &str, out: &mut Vec<SchemaRef>) {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                if let Some(name) = schema_ref_name(reference) {
                    out.push(SchemaRef {
                        pointer: pointer.to_string(),
                        reference: reference.to_string(),
                        name,
                    });
                }
            }
            for (key, child) in map {
                collect_schema_refs(child, &append_segment(pointer, key), out);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                collect_schema_refs(child, &append_segment(pointer, &idx.to_string()), out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_ref_name_decoding() {
        assert_eq!(schema_ref_name("#/components/schemas/Pet").as_deref(), Some("Pet"));
        assert_eq!(schema_ref_name("#/components/schemas/a~1b").as_deref(), Some("a/b"));
        assert_eq!(schema_ref_name("#/components/schemas/a~01").as_deref(), Some("a~1"));
        assert_eq!(
            schema_ref_name("#/components/schemas/Pet%20Store").as_deref(),
            Some("Pet Store")
        );
        assert_eq!(
            schema_ref_name("#/components/schemas/Pet/properties/id").as_deref(),
            Some("Pet")
        );
        assert_eq!(schema_ref_name("#/components/schemas/"), None);
        assert_eq!(schema_ref_name("#/components/parameters/limit"), None);
    }
}
