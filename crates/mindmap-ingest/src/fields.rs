//! Helpers for reading loosely typed record fields.

use log::warn;
use serde_json::Value;

use mindmap_core::{
    color::Color,
    document::StyleRecord,
    style::{NodeStyle, StyleDefaults},
};

/// Returns the value of the first field in `names` that holds a non-empty
/// string or a number.
pub(crate) fn first_text(record: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match record.get(name)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Returns a string value as-is and anything else as compact JSON.
pub(crate) fn string_or_json(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Short name of the JSON type of `value`, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Converts an imported style, dropping colors that do not parse and filling
/// every unset field from `defaults`.
pub(crate) fn sanitize_style(node: &str, record: &StyleRecord, defaults: &StyleDefaults) -> NodeStyle {
    let mut record = record.clone();
    for (field, color) in [
        ("backgroundColor", &mut record.background_color),
        ("textColor", &mut record.text_color),
    ] {
        let Some(value) = color.as_deref() else {
            continue;
        };
        if let Err(err) = Color::new(value) {
            warn!(node = node, field = field, err:% = err; "Ignoring invalid color");
            *color = None;
        }
    }
    record.to_style().filled(defaults)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_first_text_skips_empty_and_non_text() {
        let record = json!({ "title": "", "question": { "nested": true }, "content": 42 });

        assert_eq!(first_text(&record, &["title", "question"]), None);
        assert_eq!(
            first_text(&record, &["title", "content"]),
            Some("42".to_string())
        );
        assert_eq!(first_text(&json!("plain"), &["title"]), None);
    }

    #[test]
    fn test_string_or_json() {
        assert_eq!(string_or_json(&json!("raw")), "raw");
        assert_eq!(string_or_json(&json!({ "a": 1 })), r#"{"a":1}"#);
        assert_eq!(string_or_json(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_sanitize_style_drops_invalid_colors() {
        let record = StyleRecord {
            background_color: Some("not-a-color".to_string()),
            text_color: Some("#123456".to_string()),
            font_size: None,
        };

        let style = sanitize_style("n", &record, &StyleDefaults::default());

        assert_eq!(style.background_color(), Some("#ffffff"));
        assert_eq!(style.text_color(), Some("#123456"));
        assert_eq!(style.font_size(), Some(14.0));
    }
}
