//! JSON-Pointer-style location references into a document.
//!
//! Pointers have the shape `<base>#/<segment>/<segment>...` where each segment
//! is escaped per RFC 6901 (`~` → `~0`, `/` → `~1`). The base is usually
//! empty; callers linting an embedded sub-document pass a prefix to
//! namespace their violations.

use super::HttpMethod;

/// Escape one pointer segment
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Pointer to the operation `method` under `path`
///
/// ```rust
/// use speclint::spec::{operation_pointer, HttpMethod};
///
/// assert_eq!(
///     operation_pointer("", "/users/{id}", HttpMethod::Get),
///     "#/paths/~1users~1{id}/get"
/// );
/// ```
pub fn operation_pointer(base: &str, path: &str, method: HttpMethod) -> String {
    format!(
        "{}#/paths/{}/{}",
        base,
        escape_segment(path),
        method.as_lower()
    )
}

/// Pointer rooted at the document from raw (unescaped) segments
pub fn document_pointer<I, S>(base: &str, segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: Vec<String> = segments
        .into_iter()
        .map(|s| escape_segment(s.as_ref()))
        .collect();
    format!("{}#/{}", base, joined.join("/"))
}

/// Extend an existing pointer by one raw segment
pub fn append_segment(pointer: &str, segment: &str) -> String {
    format!("{}/{}", pointer, escape_segment(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_segment("/a/b"), "~1a~1b");
        assert_eq!(escape_segment("a~b"), "a~0b");
        // `~` must be escaped before `/` or `~1` would be double escaped
        assert_eq!(escape_segment("~/"), "~0~1");
    }

    #[test]
    fn test_operation_pointer() {
        assert_eq!(
            operation_pointer("", "/users/{id}", HttpMethod::Get),
            "#/paths/~1users~1{id}/get"
        );
        assert_eq!(
            operation_pointer("api.yaml", "/ping", HttpMethod::Post),
            "api.yaml#/paths/~1ping/post"
        );
    }

    #[test]
    fn test_document_pointer() {
        assert_eq!(document_pointer("", ["servers", "0", "url"]), "#/servers/0/url");
        assert_eq!(
            document_pointer("base", ["components", "schemas", "a/b"]),
            "base#/components/schemas/a~1b"
        );
    }

    #[test]
    fn test_append_segment() {
        let op = operation_pointer("", "/x", HttpMethod::Get);
        assert_eq!(append_segment(&op, "summary"), "#/paths/~1x/get/summary");
    }
}
