//! Request and response bodies exchanged with the Notion pages and
//! databases endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::property::{Block, PropertySet};

/// Parent of a page created inside a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseParent {
    pub database_id: String,
}

/// Body of `POST /v1/pages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePageRequest {
    pub parent: DatabaseParent,
    pub properties: PropertySet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl CreatePageRequest {
    pub fn in_database(database_id: &str, properties: PropertySet) -> Self {
        Self {
            parent: DatabaseParent {
                database_id: database_id.to_string(),
            },
            properties,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }
}

/// Body of `PATCH /v1/pages/{page_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePageRequest {
    pub properties: PropertySet,
}

impl UpdatePageRequest {
    pub const fn new(properties: PropertySet) -> Self {
        Self { properties }
    }
}

/// A page object as returned by the API. `id` is optional so that a missing
/// identifier surfaces as a protocol error rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub id: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub properties: Value,
}

/// Body of `POST /v1/databases/{database_id}/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl DatabaseQuery {
    /// Match pages whose rich-text `property` equals `value`.
    pub fn rich_text_equals(property: &str, value: &str) -> Self {
        Self {
            filter: Some(json!({
                "property": property,
                "rich_text": { "equals": value }
            })),
            page_size: Some(1),
            start_cursor: None,
        }
    }
}

/// Response of a database query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<PageResponse>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Properties plus children for a page built from a generic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePayload {
    pub properties: PropertySet,
    pub children: Vec<Block>,
}
