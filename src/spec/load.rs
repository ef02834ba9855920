use super::Document;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, warn};

/// Serialization format of a document on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file extension; anything but `.yaml`/`.yml`
    /// is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Path item keys the document model understands. Anything else under a
/// path (other than `x-` extensions) is dropped before deserialization.
const PATH_ITEM_KEYS: [&str; 13] = [
    "summary",
    "description",
    "servers",
    "parameters",
    "$ref",
    "get",
    "post",
    "put",
    "delete",
    "patch",
    "options",
    "head",
    "trace",
];

fn strip_unknown_verbs(val: &mut serde_json::Value) {
    let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") else {
        return;
    };
    for (path, item) in paths_map.iter_mut() {
        if let serde_json::Value::Object(obj) = item {
            let keys: Vec<String> = obj.keys().cloned().collect();
            for k in keys {
                let lk = k.to_ascii_lowercase();
                let keep = PATH_ITEM_KEYS.contains(&lk.as_str()) || k.starts_with("x-");
                if !keep {
                    warn!(path = %path, key = %k, "dropping unsupported path item key");
                    obj.remove(&k);
                }
            }
        }
    }
}

/// Parse document text in the given format.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON/YAML or does not describe
/// an OpenAPI 3 document.
pub fn parse_document(content: &str, format: DocumentFormat) -> anyhow::Result<Document> {
    let mut value: serde_json::Value = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML document")?,
        DocumentFormat::Json => serde_json::from_str(content).context("invalid JSON document")?,
    };
    strip_unknown_verbs(&mut value);
    let doc: Document =
        serde_json::from_value(value).context("document is not a valid OpenAPI 3 spec")?;
    Ok(doc)
}

/// Load a document from a `.json`, `.yaml` or `.yml` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let format = DocumentFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading document");
    parse_document(&content, format).with_context(|| format!("failed to parse {}", path.display()))
}
