use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for a field the source did not provide.
pub const NOT_AVAILABLE: &str = "N/A";
/// Pay sentinel used by sources that label missing salaries explicitly.
pub const NOT_LISTED: &str = "Not listed";

/// A posting as lifted from one matched container, before normalization.
///
/// Every field already carries a value or a sentinel; only `apply_link` is
/// guaranteed non-empty by construction (adapters discard containers without one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_link: String,
    pub tags: Vec<String>,
    pub pay: String,
    pub experience: String,
}

/// Ordered tag sequence, stored as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList(Vec<String>);

impl TagList {
    pub fn new(tags: Vec<String>) -> Self {
        Self(tags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.0
                .iter()
                .cloned()
                .map(serde_json::Value::String)
                .collect(),
        )
    }

    /// Storage text form; always a well-formed array, `[]` when empty.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl From<Vec<String>> for TagList {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

/// The unit of ingestion and storage; identity is `apply_link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_link: String,
    pub tags: TagList,
    pub pay: String,
    pub experience: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::TagList;

    #[test]
    fn empty_tags_serialize_as_empty_array() {
        assert_eq!(TagList::default().to_json_string(), "[]");
    }

    #[test]
    fn tags_keep_order_in_storage_form() {
        let tags = TagList::new(vec!["Rust".into(), "SQL".into(), "AWS".into()]);
        let raw = tags.to_json_string();
        assert_eq!(raw, r#"["Rust","SQL","AWS"]"#);
        assert_eq!(TagList::from_json_str(&raw).unwrap(), tags);
    }

    #[test]
    fn malformed_storage_form_is_rejected() {
        assert!(TagList::from_json_str("Rust, SQL").is_err());
        assert!(TagList::from_json_str(r#"{"a":1}"#).is_err());
    }
}
