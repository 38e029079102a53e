//! Generic JSON records synchronized in batch mode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record from a records file: an arbitrary JSON object.
///
/// Only `slug` and `title` are structurally required, and only by the page
/// payload builder; everything else is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord(Map<String, Value>);

impl SourceRecord {
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|value| !value.is_null())
    }

    /// Non-empty string value of `field`.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn slug(&self) -> Option<&str> {
        self.str_field("slug")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Explicit target page, bypassing store and database lookups.
    pub fn notion_page_id(&self) -> Option<&str> {
        self.str_field("notion_page_id")
    }

    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for SourceRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
