//! Coercion of loosely typed request bodies
//!
//! Bodies are read as arbitrary JSON and every field is coerced here before any
//! business logic sees it. Nothing in this module fails.

use serde_json::{Map, Value};

/// Parse a request body; anything that is not a JSON object becomes `{}`
pub fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}

/// Trimmed string value truncated to `max` characters; non-strings become ""
pub fn safe_str(value: &Value, max: usize) -> String {
    let trimmed = value.as_str().map(str::trim).unwrap_or_default();
    trimmed.chars().take(max).collect()
}

/// Like [`safe_str`] but falls back to `default` when the result is empty
pub fn safe_str_or(value: &Value, max: usize, default: &str) -> String {
    let s = safe_str(value, max);
    if s.is_empty() { default.to_string() } else { s }
}

/// Optional variant of [`safe_str`]; empty results become `None`
pub fn safe_opt(value: &Value, max: usize) -> Option<String> {
    Some(safe_str(value, max)).filter(|s| !s.is_empty())
}

/// Attachment base name: lowercase, runs outside `[a-z0-9-]` collapsed to `-`
pub fn safe_file_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_run = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    if out.is_empty() {
        "hoa-notice".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_tolerates_garbage() {
        assert_eq!(parse_body(b"not json"), json!({}));
        assert_eq!(parse_body(b"[1,2]"), json!({}));
        assert_eq!(parse_body(b""), json!({}));
        assert_eq!(parse_body(br#"{"to":"a@b.co"}"#)["to"], "a@b.co");
    }

    #[test]
    fn test_safe_str() {
        assert_eq!(safe_str(&json!("  hello  "), 80), "hello");
        assert_eq!(safe_str(&json!(42), 80), "");
        assert_eq!(safe_str(&Value::Null, 80), "");
        assert_eq!(safe_str(&json!("abcdef"), 3), "abc");
        assert_eq!(safe_str(&json!("ééé"), 2), "éé");
        assert_eq!(safe_str_or(&json!(" "), 64, "Other"), "Other");
        assert_eq!(safe_opt(&json!(""), 10), None);
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("Parking Violation!"), "parking-violation-");
        assert_eq!(safe_file_name("hedge__notice 2"), "hedge-notice-2");
        assert_eq!(safe_file_name(""), "hoa-notice");
        assert_eq!(safe_file_name("already-safe-1"), "already-safe-1");
    }
}
