//! Identifier casing checks shared by rule-name validation and the standard
//! rules.

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static KEBAB_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid kebab-case regex"));

#[allow(clippy::expect_used)]
static LOWER_CAMEL_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").expect("valid camelCase regex"));

/// `lowercase-words-joined-by-single-hyphens`
pub fn is_kebab_case(s: &str) -> bool {
    KEBAB_CASE.is_match(s)
}

/// `lowerCamelCase`: starts lowercase, letters and digits only
pub fn is_camel_case(s: &str) -> bool {
    LOWER_CAMEL_CASE.is_match(s)
}

/// Check if a string is snake_case
pub fn is_snake_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    // Must start with lowercase letter or underscore
    if !s
        .chars()
        .next()
        .map(|c| c.is_lowercase() || c == '_')
        .unwrap_or(false)
    {
        return false;
    }
    s.chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();

    for ch in s.chars() {
        if ch.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' || ch == '_' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Convert a string to lowerCamelCase, splitting on `-`, `_`, spaces and
/// existing case boundaries.
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in to_snake_case(s).split('_').filter(|w| !w.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
