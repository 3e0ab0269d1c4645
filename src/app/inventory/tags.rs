use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Default field names of a tag entry in provider responses
pub const TAG_KEY_FIELD: &str = "Key";
pub const TAG_VALUE_FIELD: &str = "Value";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Outcome of looking up a single tag by key.
///
/// The report renders lookups through `Display`, so a missing or duplicated key shows up
/// as diagnostic text in place of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLookup {
    Found(String),
    NotFound(String),
    Ambiguous(String),
}

impl TagLookup {
    /// The tag value, if exactly one tag matched
    pub fn value(&self) -> Option<&str> {
        match self {
            TagLookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, TagLookup::Found(_))
    }
}

impl fmt::Display for TagLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagLookup::Found(value) => f.write_str(value),
            TagLookup::NotFound(key) => write!(f, "Key not found. Key Name: {}", key),
            TagLookup::Ambiguous(key) => write!(f, "Multiple Keys With Key Name: {}", key),
        }
    }
}

impl Serialize for TagLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolve the value of `key` in an unordered tag list
pub fn resolve_tag(tags: &[Tag], key: &str) -> TagLookup {
    let mut matches = tags.iter().filter(|tag| tag.key == key);
    match (matches.next(), matches.next()) {
        (None, _) => TagLookup::NotFound(key.to_string()),
        (Some(tag), None) => TagLookup::Found(tag.value.clone()),
        (Some(_), Some(_)) => TagLookup::Ambiguous(key.to_string()),
    }
}

/// Read the `Tags` list of a raw record, `None` when the record has no tag list at all
pub fn extract_tags(raw: &serde_json::Value) -> Option<Vec<Tag>> {
    extract_tags_with(raw, TAG_KEY_FIELD, TAG_VALUE_FIELD)
}

/// Like [`extract_tags`], for responses that name the key/value fields differently.
/// Entries lacking either field are skipped.
pub fn extract_tags_with(
    raw: &serde_json::Value,
    key_field: &str,
    value_field: &str,
) -> Option<Vec<Tag>> {
    let tag_array = raw.get("Tags")?.as_array()?;

    let tags = tag_array
        .iter()
        .filter_map(|tag| {
            match (
                tag.get(key_field).and_then(|k| k.as_str()),
                tag.get(value_field).and_then(|v| v.as_str()),
            ) {
                (Some(key), Some(value)) => Some(Tag::new(key, value)),
                _ => None,
            }
        })
        .collect();

    Some(tags)
}
