//! Markup stripping for attribute values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Remove markup tags from a string, keeping the text between them.
pub fn strip_tags(input: &str) -> String {
    TAG_PATTERN.replace_all(input, "").into_owned()
}

/// Recursively sanitize a value: strings are tag-stripped, containers are
/// sanitized element-wise, everything else passes through unchanged.
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(strip_tags(text)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), sanitize_value(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}
