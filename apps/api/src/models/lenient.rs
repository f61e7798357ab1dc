//! Field-level deserializers for model-produced JSON.
//!
//! Model output is untrusted: a field the schema calls a string may arrive as a
//! number, `null`, or an object. These helpers coerce each field to its declared
//! type instead of rejecting the whole document. The top-level object check lives
//! in `llm_client::parse_json_object`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strings pass through, numbers are rendered as text, everything else is `""`.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_text).unwrap_or_default())
}

/// Only a JSON `true` counts as set.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// Arrays keep their string/number items; a bare string becomes a one-item list.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_text).collect(),
        Some(Value::String(s)) => vec![s],
        _ => Vec::new(),
    })
}

/// Arrays keep the items that are objects of the expected record shape.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// A nested object; anything else (including `null`) yields the default record.
pub fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(Value::is_object)
        .and_then(|item| serde_json::from_value(item).ok())
        .unwrap_or_default())
}

/// Percentages: numbers or numeric strings (`"85%"`), rounded and clamped to 0–100.
pub fn percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "string")]
        text: String,
        #[serde(default, deserialize_with = "flag")]
        current: bool,
        #[serde(default, deserialize_with = "string_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "percentage")]
        score: u8,
    }

    #[test]
    fn test_numbers_become_text() {
        let sample: Sample = serde_json::from_str(r#"{"text": 3.8}"#).unwrap();
        assert_eq!(sample.text, "3.8");
    }

    #[test]
    fn test_null_and_objects_become_empty() {
        let sample: Sample = serde_json::from_str(r#"{"text": null, "items": {"a": 1}}"#).unwrap();
        assert_eq!(sample.text, "");
        assert!(sample.items.is_empty());

        let sample: Sample = serde_json::from_str(r#"{"text": {"nested": "x"}}"#).unwrap();
        assert_eq!(sample.text, "");
    }

    #[test]
    fn test_flag_only_true_for_json_true() {
        let yes: Sample = serde_json::from_str(r#"{"current": true}"#).unwrap();
        let string: Sample = serde_json::from_str(r#"{"current": "true"}"#).unwrap();
        let missing: Sample = serde_json::from_str("{}").unwrap();
        assert!(yes.current);
        assert!(!string.current);
        assert!(!missing.current);
    }

    #[test]
    fn test_string_list_filters_non_text_items() {
        let sample: Sample =
            serde_json::from_str(r#"{"items": ["Rust", 42, null, {"x": 1}, "Go"]}"#).unwrap();
        assert_eq!(sample.items, vec!["Rust", "42", "Go"]);
    }

    #[test]
    fn test_bare_string_becomes_single_item_list() {
        let sample: Sample = serde_json::from_str(r#"{"items": "English"}"#).unwrap();
        assert_eq!(sample.items, vec!["English"]);
    }

    #[test]
    fn test_percentage_clamps_and_parses_strings() {
        let over: Sample = serde_json::from_str(r#"{"score": 140}"#).unwrap();
        let text: Sample = serde_json::from_str(r#"{"score": "72.6%"}"#).unwrap();
        let negative: Sample = serde_json::from_str(r#"{"score": -5}"#).unwrap();
        let junk: Sample = serde_json::from_str(r#"{"score": "high"}"#).unwrap();
        assert_eq!(over.score, 100);
        assert_eq!(text.score, 73);
        assert_eq!(negative.score, 0);
        assert_eq!(junk.score, 0);
    }
}
