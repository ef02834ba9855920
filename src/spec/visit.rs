//! Deterministic traversal over every operation of a document.

use super::{Document, Operation};
use oas3::spec::PathItem;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The nine standard HTTP verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl HttpMethod {
    /// Every verb, in the order operations of one path are visited
    pub const ALL: [HttpMethod; 9] = [
        HttpMethod::Connect,
        HttpMethod::Delete,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Patch,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Trace,
    ];

    /// Upper-case wire form, e.g. `GET`
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case form used as the path item key and in pointers
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Connect => "connect",
            HttpMethod::Delete => "delete",
            HttpMethod::Get => "get",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Patch => "patch",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| anyhow::anyhow!("unknown HTTP method [{}]", s))
    }
}

/// The operation stored under `method`, if any.
///
/// OpenAPI 3 path items have no CONNECT slot, so CONNECT always yields
/// `None` for documents in this model.
pub fn path_item_operation(item: &PathItem, method: HttpMethod) -> Option<&Operation> {
    match method {
        HttpMethod::Connect => None,
        HttpMethod::Delete => item.delete.as_ref(),
        HttpMethod::Get => item.get.as_ref(),
        HttpMethod::Head => item.head.as_ref(),
        HttpMethod::Options => item.options.as_ref(),
        HttpMethod::Patch => item.patch.as_ref(),
        HttpMethod::Post => item.post.as_ref(),
        HttpMethod::Put => item.put.as_ref(),
        HttpMethod::Trace => item.trace.as_ref(),
    }
}

fn path_item_operation_mut(item: &mut PathItem, method: HttpMethod) -> Option<&mut Operation> {
    path_item_slot_mut(item, method).and_then(Option::as_mut)
}

/// The slot holding the operation for `method`, filled or not.
///
/// `None` for CONNECT, which has no slot.
pub fn path_item_slot_mut(
    item: &mut PathItem,
    method: HttpMethod,
) -> Option<&mut Option<Operation>> {
    match method {
        HttpMethod::Connect => None,
        HttpMethod::Delete => Some(&mut item.delete),
        HttpMethod::Get => Some(&mut item.get),
        HttpMethod::Head => Some(&mut item.head),
        HttpMethod::Options => Some(&mut item.options),
        HttpMethod::Patch => Some(&mut item.patch),
        HttpMethod::Post => Some(&mut item.post),
        HttpMethod::Put => Some(&mut item.put),
        HttpMethod::Trace => Some(&mut item.trace),
    }
}

/// Invoke `visit` once per (path, method, operation) present in `doc`.
///
/// Paths come in document iteration order; within a path, methods follow
/// [`HttpMethod::ALL`]. Callers must not rely on the order across paths.
pub fn visit_operations<F>(doc: &Document, mut visit: F)
where
    F: FnMut(&str, HttpMethod, &Operation),
{
    let Some(paths) = doc.paths.as_ref() else {
        return;
    };
    for (path, item) in paths {
        for method in HttpMethod::ALL {
            if let Some(op) = path_item_operation(item, method) {
                visit(path.as_str(), method, op);
            }
        }
    }
}

/// Mutable counterpart of [`visit_operations`], same ordering.
pub fn visit_operations_mut<F>(doc: &mut Document, mut visit: F)
where
    F: FnMut(&str, HttpMethod, &mut Operation),
{
    let Some(paths) = doc.paths.as_mut() else {
        return;
    };
    for (path, item) in paths.iter_mut() {
        for method in HttpMethod::ALL {
            if let Some(op) = path_item_operation_mut(item, method) {
                visit(path.as_str(), method, op);
            }
        }
    }
}

/// Number of operations in `doc`
pub fn operation_count(doc: &Document) -> usize {
    let mut n = 0;
    visit_operations(doc, |_, _, _| n += 1);
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{parse_document, DocumentFormat};

    fn doc() -> Document {
        parse_document(
            r#"
openapi: 3.1.0
info:
  title: T
  version: 1.0.0
paths:
  /a:
    trace:
      responses: {}
    post:
      responses: {}
    get:
      responses: {}
    delete:
      responses: {}
  /b:
    put:
      responses: {}
"#,
            DocumentFormat::Yaml,
        )
        .unwrap()
    }

    #[test]
    fn test_method_order_is_fixed_per_path() {
        let doc = doc();
        let mut seen = Vec::new();
        visit_operations(&doc, |path, method, _| {
            if path == "/a" {
                seen.push(method);
            }
        });
        assert_eq!(
            seen,
            vec![
                HttpMethod::Delete,
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Trace
            ]
        );
    }

    #[test]
    fn test_every_operation_visited_once() {
        let doc = doc();
        assert_eq!(operation_count(&doc), 5);
    }

    #[test]
    fn test_visit_mut_edits_in_place() {
        let mut doc = doc();
        visit_operations_mut(&mut doc, |_, method, op| {
            op.summary = Some(format!("{} op", method));
        });
        let mut summaries = Vec::new();
        visit_operations(&doc, |_, _, op| summaries.push(op.summary.clone().unwrap_or_default()));
        assert_eq!(summaries.len(), 5);
        assert!(summaries.contains(&"PUT op".to_string()));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!(" Connect".parse::<HttpMethod>().unwrap(), HttpMethod::Connect);
        assert!("fetch".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::ALL.len(), 9);
    }
}
