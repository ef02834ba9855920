//! # Document Editing
//!
//! Bulk edits applied to the operations and component schemas of a
//! document, built on [`visit_operations_mut`]. These are the companions to
//! linting: derive missing operationIds, mark things deprecated, stamp
//! vendor extensions or operation metadata, and rewrite security before a
//! document is validated or published.
//!
//! Operations are addressed by their *path-method* key, `"METHOD path"`
//! (see [`path_method`]).

use crate::error::LintError;
use crate::spec::{
    path_item_slot_mut, visit_operations, visit_operations_mut, Document, HttpMethod, Operation,
};
use oas3::spec::{ExternalDoc, ObjectOrReference, ObjectSchema, PathItem, SecurityRequirement};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};
use url::Url;

#[allow(clippy::expect_used)]
static DEPRECATED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bdeprecated\b").expect("valid deprecated regex"));

/// `"METHOD path"` key for an operation, method upper-cased
///
/// ```rust
/// use speclint::edit::path_method;
///
/// assert_eq!(path_method("/pets", "get"), "GET /pets");
/// ```
pub fn path_method(path: &str, method: &str) -> String {
    format!("{} {}", method.trim().to_uppercase(), path.trim())
}

/// An operation located by path and method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRef {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
}

impl OperationRef {
    fn new(path: &str, method: HttpMethod, op: &Operation) -> Self {
        OperationRef {
            path: path.to_string(),
            method,
            operation_id: op.operation_id.clone(),
            summary: op.summary.clone(),
        }
    }

    pub fn path_method(&self) -> String {
        path_method(&self.path, self.method.as_str())
    }
}

/// Set `deprecated` on every operation
pub fn set_operations_deprecated(doc: &mut Document, deprecated: bool) {
    let mut n = 0usize;
    visit_operations_mut(doc, |_, _, op| {
        op.deprecated = Some(deprecated);
        n += 1;
    });
    debug!(operations = n, deprecated, "set deprecated on operations");
}

/// Set `deprecated` on every inline component schema. Referenced entries
/// are left alone. Returns how many schemas were set.
pub fn set_schemas_deprecated(doc: &mut Document, deprecated: bool) -> usize {
    let mut n = 0usize;
    for (_, schema) in component_schemas_mut(doc) {
        schema.deprecated = Some(deprecated);
        n += 1;
    }
    debug!(schemas = n, deprecated, "set deprecated on schemas");
    n
}

fn mentions_deprecated(description: Option<&str>) -> bool {
    description.map(|d| DEPRECATED_WORD.is_match(d)).unwrap_or(false)
}

/// Mark operations, component schemas and their inline properties
/// deprecated when their description mentions the word "deprecated".
/// Returns how many were newly marked.
pub fn set_deprecated_implicit(doc: &mut Document) -> usize {
    let mut marked = 0usize;
    visit_operations_mut(doc, |path, method, op| {
        if mentions_deprecated(op.description.as_deref()) && op.deprecated != Some(true) {
            debug!(path = %path, method = %method, "marking operation deprecated");
            op.deprecated = Some(true);
            marked += 1;
        }
    });
    for (name, schema) in component_schemas_mut(doc) {
        if mentions_deprecated(schema.description.as_deref()) && schema.deprecated != Some(true) {
            debug!(schema = %name, "marking schema deprecated");
            schema.deprecated = Some(true);
            marked += 1;
        }
        for (prop_name, prop) in schema.properties.iter_mut() {
            let ObjectOrReference::Object(prop) = prop else {
                continue;
            };
            if mentions_deprecated(prop.description.as_deref()) && prop.deprecated != Some(true) {
                debug!(schema = %name, property = %prop_name, "marking property deprecated");
                prop.deprecated = Some(true);
                marked += 1;
            }
        }
    }
    marked
}

/// Inline schemas under `components.schemas`, with their names
fn component_schemas_mut<'a>(
    doc: &'a mut Document,
) -> impl Iterator<Item = (&'a str, &'a mut ObjectSchema)> + 'a {
    doc.components
        .iter_mut()
        .flat_map(|c| c.schemas.iter_mut())
        .filter_map(|(name, schema)| match schema {
            ObjectOrReference::Object(schema) => Some((name.as_str(), schema)),
            _ => None,
        })
}

/// Extension name as stored in the document model, without the `x-` prefix
fn extension_name(key: &str) -> &str {
    let key = key.trim();
    key.strip_prefix("x-").unwrap_or(key)
}

fn lookup_extension<'a>(extensions: &'a BTreeMap<String, Value>, key: &str) -> Option<&'a Value> {
    let name = extension_name(key);
    extensions
        .get(name)
        .or_else(|| extensions.get(&format!("x-{}", name)))
}

/// Look up an operation extension by name, with or without the `x-` prefix
pub fn operation_extension<'a>(op: &'a Operation, key: &str) -> Option<&'a Value> {
    lookup_extension(&op.extensions, key)
}

/// Look up a schema extension by name, with or without the `x-` prefix
pub fn schema_extension<'a>(schema: &'a ObjectSchema, key: &str) -> Option<&'a Value> {
    lookup_extension(&schema.extensions, key)
}

/// Which objects [`add_custom_properties`] stamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionTarget {
    Operations,
    /// Inline component schemas
    Schemas,
    Both,
}

impl ExtensionTarget {
    fn operations(self) -> bool {
        matches!(self, ExtensionTarget::Operations | ExtensionTarget::Both)
    }

    fn schemas(self) -> bool {
        matches!(self, ExtensionTarget::Schemas | ExtensionTarget::Both)
    }
}

fn insert_extensions(
    extensions: &mut BTreeMap<String, Value>,
    props: &BTreeMap<String, Value>,
    overwrite: bool,
) {
    for (key, value) in props {
        let name = extension_name(key);
        if name.is_empty() {
            continue;
        }
        if !overwrite && lookup_extension(extensions, name).is_some() {
            continue;
        }
        extensions.insert(name.to_string(), value.clone());
    }
}

/// Add vendor extensions to operations, component schemas, or both.
///
/// Keys may be given with or without the `x-` prefix. With `overwrite`, an
/// existing value under the same name is replaced; otherwise it is kept.
pub fn add_custom_properties(
    doc: &mut Document,
    props: &BTreeMap<String, Value>,
    target: ExtensionTarget,
    overwrite: bool,
) {
    if props.is_empty() {
        return;
    }
    if target.operations() {
        visit_operations_mut(doc, |_, _, op| {
            insert_extensions(&mut op.extensions, props, overwrite);
        });
    }
    if target.schemas() {
        for (_, schema) in component_schemas_mut(doc) {
            insert_extensions(&mut schema.extensions, props, overwrite);
        }
    }
}

/// Set each operationId to the operation's summary with whitespace runs
/// collapsed to single spaces. The summary is normalized the same way.
///
/// # Errors
///
/// With `error_on_empty`, [`LintError::OperationIdsMissing`] lists every
/// operation left without an operationId. Edits are applied either way.
pub fn operation_ids_from_summaries(
    doc: &mut Document,
    error_on_empty: bool,
) -> Result<(), LintError> {
    let mut empty = Vec::new();
    visit_operations_mut(doc, |path, method, op| {
        let summary = op
            .summary
            .as_deref()
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        if summary.is_empty() {
            op.operation_id = None;
            empty.push(path_method(path, method.as_str()));
        } else {
            op.summary = Some(summary.clone());
            op.operation_id = Some(summary);
        }
    });
    if error_on_empty && !empty.is_empty() {
        return Err(LintError::OperationIdsMissing { path_methods: empty });
    }
    Ok(())
}

/// Apply summaries keyed by path-method and derive operationIds from them.
///
/// For each operation whose key is in `summaries`, the operationId becomes
/// `op_id_fn(summary)` (the summary itself when no function is given). An
/// existing operationId or summary is only replaced when the matching
/// `force_*` flag is set. Existing values are trimmed either way. Returns the
/// number of operations matched.
pub fn replace_operation_ids_and_summaries(
    doc: &mut Document,
    summaries: &BTreeMap<String, String>,
    op_id_fn: Option<&dyn Fn(&str) -> String>,
    force_op_id: bool,
    force_summary: bool,
) -> usize {
    let mut matched = 0usize;
    visit_operations_mut(doc, |path, method, op| {
        op.operation_id = trimmed(op.operation_id.take());
        op.summary = trimmed(op.summary.take());

        let Some(summary) = summaries.get(&path_method(path, method.as_str())) else {
            return;
        };
        matched += 1;
        let op_id = match op_id_fn {
            Some(f) => f(summary),
            None => summary.clone(),
        };
        if op.operation_id.is_none() || force_op_id {
            op.operation_id = Some(op_id);
        }
        if op.summary.is_none() || force_summary {
            op.summary = Some(summary.clone());
        }
    });
    info!(matched, requested = summaries.len(), "replaced operationIds and summaries");
    matched
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Operations carrying at least one of `tags`, in traversal order
pub fn query_operations_by_tags<S: AsRef<str>>(doc: &Document, tags: &[S]) -> Vec<OperationRef> {
    let wanted: HashSet<&str> = tags.iter().map(|t| t.as_ref()).collect();
    let mut out = Vec::new();
    visit_operations(doc, |path, method, op| {
        if op.tags.iter().any(|t| wanted.contains(t.as_str())) {
            out.push(OperationRef::new(path, method, op));
        }
    });
    out
}

/// Summaries keyed by path-method, for feeding back into
/// [`replace_operation_ids_and_summaries`]
pub fn summaries_map(ops: &[OperationRef]) -> BTreeMap<String, String> {
    ops.iter()
        .map(|o| (o.path_method(), o.summary.clone().unwrap_or_default()))
        .collect()
}

/// Extension holding an operation's throttling group, stored without `x-`
pub const THROTTLING_GROUP_EXTENSION: &str = "throttling-group";

/// Security scheme the scopes of an [`OperationMeta`] are granted under
pub const META_SECURITY_SCHEME: &str = "oauth";

/// Descriptive metadata applied to one operation by
/// [`add_operation_metas`]. Empty fields carry nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationMeta {
    pub docs_url: String,
    pub docs_description: String,
    pub security_scopes: Vec<String>,
    pub throttling_group: String,
}

/// Apply metas keyed by operationId.
///
/// Each meta may set external docs, security scopes under
/// [`META_SECURITY_SCHEME`], and the [`THROTTLING_GROUP_EXTENSION`]. With
/// `overwrite`, the meta replaces what the operation has: empty scopes
/// clear security and an empty throttling group removes the extension.
/// Without it, only fields the operation lacks are filled. Docs are merged
/// field by field in both modes, and a description alone cannot create
/// docs on an operation that has none. Returns the number of operations
/// matched.
///
/// # Errors
///
/// [`LintError::InvalidDocsUrl`] when a non-empty docs URL does not parse.
/// URLs are checked before any operation is touched.
pub fn add_operation_metas(
    doc: &mut Document,
    metas: &BTreeMap<String, OperationMeta>,
    overwrite: bool,
) -> Result<usize, LintError> {
    let mut urls: BTreeMap<&str, Url> = BTreeMap::new();
    for (op_id, meta) in metas {
        let raw = meta.docs_url.trim();
        if raw.is_empty() {
            continue;
        }
        let url = Url::parse(raw).map_err(|e| LintError::InvalidDocsUrl {
            operation_id: op_id.clone(),
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        urls.insert(op_id.trim(), url);
    }
    let metas: BTreeMap<&str, &OperationMeta> =
        metas.iter().map(|(k, v)| (k.trim(), v)).collect();

    let mut matched = 0usize;
    visit_operations_mut(doc, |path, method, op| {
        let Some(op_id) = op.operation_id.as_deref().map(str::trim) else {
            return;
        };
        let Some(meta) = metas.get(op_id).copied() else {
            return;
        };
        let url = urls.get(op_id).cloned();
        debug!(path = %path, method = %method, operation_id = %op_id, "applying operation meta");
        matched += 1;

        merge_external_docs(op, url, meta.docs_description.trim(), overwrite);

        if overwrite || op.security.is_empty() {
            op.security = if meta.security_scopes.is_empty() {
                Vec::new()
            } else {
                vec![SecurityRequirement(BTreeMap::from([(
                    META_SECURITY_SCHEME.to_string(),
                    meta.security_scopes.clone(),
                )]))]
            };
        }

        let group = meta.throttling_group.trim();
        let present = operation_extension(op, THROTTLING_GROUP_EXTENSION).is_some();
        if group.is_empty() {
            if overwrite {
                op.extensions.remove(THROTTLING_GROUP_EXTENSION);
            }
        } else if overwrite || !present {
            op.extensions.insert(
                THROTTLING_GROUP_EXTENSION.to_string(),
                Value::String(group.to_string()),
            );
        }
    });
    info!(matched, requested = metas.len(), "applied operation metas");
    Ok(matched)
}

fn merge_external_docs(op: &mut Operation, url: Option<Url>, description: &str, overwrite: bool) {
    let description = (!description.is_empty()).then(|| description.to_string());
    match op.external_docs.as_mut() {
        Some(docs) => {
            if let Some(url) = url.filter(|_| overwrite) {
                docs.url = url;
            }
            if description.is_some() && (overwrite || docs.description.is_none()) {
                docs.description = description;
            }
        }
        None => {
            if let Some(url) = url {
                op.external_docs = Some(ExternalDoc {
                    url,
                    description,
                    extensions: BTreeMap::new(),
                });
            }
        }
    }
}

/// Replace the security of matching operations with the single
/// `requirement`.
///
/// `include` and `exclude` hold path-method keys. Excluded operations are
/// never edited. A non-empty `include` restricts the edit to the listed
/// operations; an empty one admits every operation. Returns the number of
/// operations edited.
pub fn replace_operations_security<S: AsRef<str>>(
    doc: &mut Document,
    include: &[S],
    exclude: &[S],
    requirement: &BTreeMap<String, Vec<String>>,
) -> usize {
    let normalize = |keys: &[S]| -> HashSet<String> {
        keys.iter()
            .filter_map(|k| {
                let (method, path) = k.as_ref().trim().split_once(char::is_whitespace)?;
                Some(path_method(path, method))
            })
            .collect()
    };
    let include = normalize(include);
    let exclude = normalize(exclude);

    let mut edited = 0usize;
    visit_operations_mut(doc, |path, method, op| {
        let key = path_method(path, method.as_str());
        if exclude.contains(&key) || (!include.is_empty() && !include.contains(&key)) {
            return;
        }
        op.security = vec![SecurityRequirement(requirement.clone())];
        edited += 1;
    });
    info!(edited, "replaced operation security");
    edited
}

/// Put `op` under `path` and `method`, creating the path item as needed.
///
/// The path is trimmed and given a leading `/`. Returns the operation it
/// replaced, if any.
///
/// # Errors
///
/// [`LintError::UnsupportedMethod`] for CONNECT, which a path item cannot
/// hold.
pub fn set_operation(
    doc: &mut Document,
    path: &str,
    method: HttpMethod,
    op: Operation,
) -> Result<Option<Operation>, LintError> {
    let unsupported = || LintError::UnsupportedMethod {
        method: method.as_str().to_string(),
    };
    if method == HttpMethod::Connect {
        return Err(unsupported());
    }
    let path = path.trim();
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    let item = doc
        .paths
        .get_or_insert_with(BTreeMap::new)
        .entry(path.clone())
        .or_insert_with(PathItem::default);
    let slot = path_item_slot_mut(item, method).ok_or_else(unsupported)?;
    let previous = slot.replace(op);
    debug!(path = %path, method = %method, replaced = previous.is_some(), "set operation");
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casing::to_camel_case;
    use crate::spec::{parse_document, path_item_operation, DocumentFormat};
    use serde_json::json;

    const PETS: &str = r#"
openapi: 3.1.0
info:
  title: Pets
  version: "1.0"
paths:
  /pets:
    get:
      summary: "  List   all\tpets "
      description: Returns pets. Deprecated in favour of /animals.
      tags: [pets]
      x-team: core
      responses:
        "200": { description: ok }
    post:
      operationId: " createPet "
      summary: Create a pet
      description: Not undeprecated at all
      tags: [admin, pets]
      responses:
        "201": { description: created }
  /health:
    get:
      tags: [ops]
      responses:
        "200": { description: ok }
"#;

    fn doc() -> Document {
        parse_document(PETS, DocumentFormat::Yaml).unwrap()
    }

    fn op<'a>(doc: &'a Document, path: &str, method: HttpMethod) -> &'a Operation {
        let item = doc.paths.as_ref().and_then(|p| p.get(path)).unwrap();
        path_item_operation(item, method).unwrap()
    }

    #[test]
    fn test_path_method() {
        assert_eq!(path_method("/pets", "get"), "GET /pets");
        assert_eq!(path_method(" /a ", "Delete"), "DELETE /a");
    }

    #[test]
    fn test_set_operations_deprecated() {
        let mut doc = doc();
        set_operations_deprecated(&mut doc, true);
        let mut all = true;
        visit_operations(&doc, |_, _, op| all &= op.deprecated == Some(true));
        assert!(all);

        set_operations_deprecated(&mut doc, false);
        assert_eq!(op(&doc, "/pets", HttpMethod::Get).deprecated, Some(false));
    }

    #[test]
    fn test_set_deprecated_implicit_matches_whole_word() {
        let mut doc = doc();
        assert_eq!(set_deprecated_implicit(&mut doc), 1);
        assert_eq!(op(&doc, "/pets", HttpMethod::Get).deprecated, Some(true));
        assert_ne!(op(&doc, "/pets", HttpMethod::Post).deprecated, Some(true));
        // already marked, nothing new
        assert_eq!(set_deprecated_implicit(&mut doc), 0);
    }

    #[test]
    fn test_add_custom_properties_overwrite() {
        let props = BTreeMap::from([
            ("x-team".to_string(), json!("platform")),
            ("owner".to_string(), json!({ "id": 7 })),
        ]);

        let mut keep = doc();
        add_custom_properties(&mut keep, &props, ExtensionTarget::Operations, false);
        let get = op(&keep, "/pets", HttpMethod::Get);
        assert_eq!(operation_extension(get, "x-team"), Some(&json!("core")));
        assert_eq!(operation_extension(get, "owner"), Some(&json!({ "id": 7 })));
        let health = op(&keep, "/health", HttpMethod::Get);
        assert_eq!(operation_extension(health, "team"), Some(&json!("platform")));

        let mut replace = doc();
        add_custom_properties(&mut replace, &props, ExtensionTarget::Operations, true);
        let get = op(&replace, "/pets", HttpMethod::Get);
        assert_eq!(operation_extension(get, "x-team"), Some(&json!("platform")));
    }

    #[test]
    fn test_operation_ids_from_summaries() {
        let mut doc = doc();
        let err = operation_ids_from_summaries(&mut doc, true).unwrap_err();
        assert_eq!(
            err,
            LintError::OperationIdsMissing {
                path_methods: vec!["GET /health".to_string()]
            }
        );
        assert_eq!(err.to_string(), "no_opid: [GET /health]");

        let get = op(&doc, "/pets", HttpMethod::Get);
        assert_eq!(get.operation_id.as_deref(), Some("List all pets"));
        assert_eq!(get.summary.as_deref(), Some("List all pets"));

        let mut doc = self::doc();
        assert!(operation_ids_from_summaries(&mut doc, false).is_ok());
    }

    #[test]
    fn test_replace_operation_ids_and_summaries() {
        let summaries = BTreeMap::from([
            ("GET /health".to_string(), "Check health".to_string()),
            ("POST /pets".to_string(), "Add a pet".to_string()),
        ]);
        let camel = |s: &str| to_camel_case(s);

        let mut doc = doc();
        let matched =
            replace_operation_ids_and_summaries(&mut doc, &summaries, Some(&camel), false, false);
        assert_eq!(matched, 2);
        let health = op(&doc, "/health", HttpMethod::Get);
        assert_eq!(health.operation_id.as_deref(), Some("checkHealth"));
        assert_eq!(health.summary.as_deref(), Some("Check health"));
        let post = op(&doc, "/pets", HttpMethod::Post);
        assert_eq!(post.operation_id.as_deref(), Some("createPet"));
        assert_eq!(post.summary.as_deref(), Some("Create a pet"));

        let mut doc = self::doc();
        replace_operation_ids_and_summaries(&mut doc, &summaries, None, true, true);
        let post = op(&doc, "/pets", HttpMethod::Post);
        assert_eq!(post.operation_id.as_deref(), Some("Add a pet"));
        assert_eq!(post.summary.as_deref(), Some("Add a pet"));
    }

    #[test]
    fn test_query_operations_by_tags() {
        let doc = doc();
        let found = query_operations_by_tags(&doc, &["pets"]);
        let keys: Vec<String> = found.iter().map(OperationRef::path_method).collect();
        assert_eq!(keys, vec!["GET /pets", "POST /pets"]);
        assert_eq!(found[1].operation_id.as_deref(), Some(" createPet "));

        let map = summaries_map(&found);
        assert_eq!(map.get("POST /pets").map(String::as_str), Some("Create a pet"));

        assert!(query_operations_by_tags::<&str>(&doc, &[]).is_empty());
    }

    #[test]
    fn test_security_keys_are_normalized() {
        let mut doc = doc();
        let requirement = BTreeMap::from([("apiKey".to_string(), Vec::new())]);
        let edited = replace_operations_security(&mut doc, &["get  /pets "], &[], &requirement);
        assert_eq!(edited, 1);
        assert_eq!(op(&doc, "/pets", HttpMethod::Get).security.len(), 1);
        assert!(op(&doc, "/pets", HttpMethod::Post).security.is_empty());
    }

    #[test]
    fn test_set_operation_normalizes_path() {
        let mut doc = doc();
        let created = Operation {
            operation_id: Some("listToys".to_string()),
            ..Default::default()
        };
        assert_eq!(set_operation(&mut doc, " toys ", HttpMethod::Get, created).unwrap(), None);
        assert_eq!(
            op(&doc, "/toys", HttpMethod::Get).operation_id.as_deref(),
            Some("listToys")
        );

        let err = set_operation(&mut doc, "/tunnel", HttpMethod::Connect, Operation::default())
            .unwrap_err();
        assert_eq!(
            err,
            LintError::UnsupportedMethod {
                method: "CONNECT".to_string()
            }
        );
        assert!(!doc.paths.as_ref().unwrap().contains_key("/tunnel"));
    }
}
