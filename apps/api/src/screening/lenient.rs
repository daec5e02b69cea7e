//! Tolerant deserializers for model-produced JSON.
//!
//! The model is asked for an exact schema but does not always honour it. A
//! field with the wrong shape falls back to an empty value instead of failing
//! the whole document.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `T`, or `T::default()` when the value has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Scalars render as text, arrays of scalars are joined with ", ",
/// anything else is the empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_text(other).unwrap_or_default(),
    })
}

/// A list of strings. Scalar items are rendered as text and other items are
/// dropped; a bare non-blank string becomes a one-item list.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

/// Like `text_list`, but keeps `None` for an absent or null field.
pub fn optional_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(text_list(value).unwrap_or_default()))
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::text")]
        name: String,
        #[serde(default, deserialize_with = "super::text_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "super::or_default")]
        count: u32,
        #[serde(default, deserialize_with = "super::optional_text_list")]
        extra: Option<Vec<String>>,
    }

    #[test]
    fn test_numbers_render_as_text() {
        let probe: Probe = serde_json::from_value(json!({"name": 28})).unwrap();
        assert_eq!(probe.name, "28");
    }

    #[test]
    fn test_array_text_is_joined() {
        let probe: Probe = serde_json::from_value(json!({"name": ["3+ years", "Python"]})).unwrap();
        assert_eq!(probe.name, "3+ years, Python");
    }

    #[test]
    fn test_object_text_is_empty() {
        let probe: Probe = serde_json::from_value(json!({"name": {"a": 1}})).unwrap();
        assert_eq!(probe.name, "");
    }

    #[test]
    fn test_bare_string_becomes_single_item_list() {
        let probe: Probe = serde_json::from_value(json!({"tags": "BSc Computer Science"})).unwrap();
        assert_eq!(probe.tags, vec!["BSc Computer Science"]);
    }

    #[test]
    fn test_list_drops_non_scalar_items() {
        let probe: Probe =
            serde_json::from_value(json!({"tags": ["Rust", {"x": 1}, null, 3]})).unwrap();
        assert_eq!(probe.tags, vec!["Rust", "3"]);
    }

    #[test]
    fn test_wrong_shape_falls_back_to_default() {
        let probe: Probe = serde_json::from_value(json!({"count": "many"})).unwrap();
        assert_eq!(probe.count, 0);
    }

    #[test]
    fn test_optional_list_absent_and_null_are_none() {
        let absent: Probe = serde_json::from_value(json!({})).unwrap();
        let null: Probe = serde_json::from_value(json!({"extra": null})).unwrap();
        assert!(absent.extra.is_none());
        assert!(null.extra.is_none());
    }
}
