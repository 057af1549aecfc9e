//! Decoding of the free-text `*_recommendations` columns.
//!
//! Curated rows store recommendations in one of several shapes: a JSON array
//! of strings, comma-separated text, newline-separated text, or a single bare
//! sentence. [`parse_recommendations`] applies a fixed fallback chain so all
//! of them decode to a list of strings.

use serde_json::Value;

/// Decode a recommendations column into discrete suggestions.
///
/// The fallback chain is JSON, then comma split, then newline split, then a
/// single item. Comma-split pieces are trimmed but kept even when empty;
/// newline-split pieces drop blanks.
///
/// # Example
///
/// ```
/// use citymetrics_lib::parse_recommendations;
///
/// assert_eq!(parse_recommendations(Some(r#"["a","b"]"#)), vec!["a", "b"]);
/// assert_eq!(parse_recommendations(Some("a, b, c")), vec!["a", "b", "c"]);
/// assert_eq!(parse_recommendations(Some("a\nb")), vec!["a", "b"]);
/// assert!(parse_recommendations(None).is_empty());
/// ```
pub fn parse_recommendations(value: Option<&str>) -> Vec<String> {
    let text = match value {
        Some(text) if !text.is_empty() => text,
        _ => return Vec::new(),
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items.into_iter().map(value_to_string).collect(),
        Ok(other) => vec![scalar_to_string(other)],
        Err(_) => split_plain_text(text),
    }
}

fn split_plain_text(text: &str) -> Vec<String> {
    if text.contains(',') {
        text.split(',').map(|piece| piece.trim().to_string()).collect()
    } else if text.contains('\n') {
        text.split('\n')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![text.to_string()]
    }
}

/// Text for a standalone non-list JSON value. Booleans and null use the
/// `True`/`False`/`None` spelling curated rows were written against.
fn scalar_to_string(value: Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => value_to_string(other),
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
