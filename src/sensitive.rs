//! Sensitive content detection.
//! Flags forms that look like they collect passwords or other secrets, so the
//! user can be warned before filling them in.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

#[allow(clippy::expect_used)]
static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)"type":"password"|<input[^>]*type="password"|type="password"|password|\bpin\b|secret|ssn|secure|credentials"#,
    )
    .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static KEYWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:password|passcode|passwd|pwd)\b").expect("constant regex pattern is valid")
});

/// Returns the first sensitive term found in the schema or the template.
///
/// The schema is scanned as compact JSON text, then key by key and string by
/// string, so a term split across JSON syntax is still found.
pub fn find_sensitive_term(schema: &Value, template: &str) -> Option<String> {
    let json = schema.to_string();
    for text in [json.as_str(), template] {
        if let Some(found) = FIELD_PATTERN.find(text) {
            return Some(found.as_str().to_lowercase());
        }
    }
    for text in [json.as_str(), template] {
        if let Some(found) = KEYWORD_PATTERN.find(text) {
            return Some(found.as_str().to_lowercase());
        }
    }
    scan_keys(schema)
}

/// Whether a form looks like it collects secrets.
pub fn detect_sensitive_information(schema: &Value, template: &str) -> bool {
    find_sensitive_term(schema, template).is_some()
}

fn scan_keys(value: &Value) -> Option<String> {
    let keyword = |text: &str| KEYWORD_PATTERN.find(text).map(|found| found.as_str().to_lowercase());
    match value {
        Value::String(text) => keyword(text),
        Value::Array(items) => items.iter().find_map(scan_keys),
        Value::Object(object) => object
            .iter()
            .find_map(|(key, value)| keyword(key).or_else(|| scan_keys(value))),
        _ => None,
    }
}
