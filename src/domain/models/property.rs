//! Notion page property values.
//!
//! A [`PropertySet`] is built fresh for every sync call and serializes to the
//! `properties` object expected by the Notion pages endpoints.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Maximum length of a single rich-text or title content run.
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Maximum length of a select / multi-select option name.
pub const MAX_OPTION_NAME_LENGTH: usize = 100;

/// Strict timestamp format accepted for date properties.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A typed property value descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    Status(String),
    Select(String),
    Url(Option<String>),
    Number(Option<i64>),
    /// `None` is the explicit "no date" marker.
    Date(Option<String>),
    MultiSelect(Vec<String>),
}

impl PropertyValue {
    pub fn title(content: &str) -> Self {
        Self::Title(truncate_chars(content, MAX_TEXT_LENGTH))
    }

    pub fn rich_text(content: &str) -> Self {
        Self::RichText(truncate_chars(content, MAX_TEXT_LENGTH))
    }

    pub fn status(name: &str) -> Self {
        Self::Status(truncate_chars(name, MAX_OPTION_NAME_LENGTH))
    }

    pub fn select(name: &str) -> Self {
        Self::Select(truncate_chars(name, MAX_OPTION_NAME_LENGTH))
    }

    pub fn url(url: Option<&str>) -> Self {
        Self::Url(url.map(str::to_string))
    }

    pub const fn number(value: Option<i64>) -> Self {
        Self::Number(value)
    }

    /// Build a date property, degrading to "no date" when the timestamp is
    /// absent or does not match [`TIMESTAMP_FORMAT`].
    pub fn date(timestamp: Option<&str>) -> Self {
        Self::Date(
            timestamp
                .filter(|ts| is_valid_timestamp(ts))
                .map(str::to_string),
        )
    }

    pub fn multi_select<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::MultiSelect(
            items
                .into_iter()
                .map(|item| truncate_chars(&item.to_string(), MAX_OPTION_NAME_LENGTH))
                .collect(),
        )
    }

    /// Render this value in the Notion wire format.
    pub fn to_notion_json(&self) -> Value {
        match self {
            Self::Title(content) => json!({ "title": text_runs(content) }),
            Self::RichText(content) => json!({ "rich_text": text_runs(content) }),
            Self::Status(name) => json!({ "status": { "name": name } }),
            Self::Select(name) => json!({ "select": { "name": name } }),
            Self::Url(url) => json!({ "url": url }),
            Self::Number(number) => json!({ "number": number }),
            Self::Date(Some(start)) => json!({ "date": { "start": start } }),
            Self::Date(None) => json!({ "date": null }),
            Self::MultiSelect(names) => json!({
                "multi_select": names
                    .iter()
                    .map(|name| json!({ "name": name }))
                    .collect::<Vec<_>>()
            }),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_notion_json().serialize(serializer)
    }
}

/// Property name to value mapping, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertySet(BTreeMap<String, PropertyValue>);

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used while constructing a set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.0.iter()
    }

    pub fn to_notion_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, value)| (name.clone(), value.to_notion_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, PropertyValue)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Child block appended to a newly created page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
}

impl Block {
    pub fn paragraph(content: &str) -> Self {
        Self::Paragraph(truncate_chars(content, MAX_TEXT_LENGTH))
    }

    pub fn to_notion_json(&self) -> Value {
        match self {
            Self::Paragraph(content) => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": text_runs(content) }
            }),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_notion_json().serialize(serializer)
    }
}

fn text_runs(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((byte_index, _)) => content[..byte_index].to_string(),
        None => content.to_string(),
    }
}

pub fn is_valid_timestamp(timestamp: &str) -> bool {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok()
}
