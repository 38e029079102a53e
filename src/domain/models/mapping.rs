//! Mapping keys and records linking source entities to Notion pages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of synchronizable entity; the prefix of every mapping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Issue,
    PullRequest,
    ProjectItem,
    Record,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
            Self::ProjectItem => "project_item",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic key identifying one entity across runs, e.g. `issue:42`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingKey(String);

impl MappingKey {
    pub fn new(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self(format!("{kind}:{id}"))
    }

    /// Key for a generic record, scoped to its target database, e.g.
    /// `record:db-1:database-agent`. The same slug synced into two databases
    /// maps to two pages.
    pub fn record(database_id: &str, slug: &str) -> Self {
        Self(format!("{}:{database_id}:{slug}", EntityKind::Record))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MappingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MappingKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Free-form string metadata stored beside a mapping.
pub type MappingMetadata = BTreeMap<String, String>;

/// Value persisted per key in the mappings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMapping {
    pub notion_page_id: String,
    #[serde(default)]
    pub metadata: MappingMetadata,
}

/// A mapping as returned by [`set`](crate::adapters::MappingStore::set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
    pub key: MappingKey,
    pub notion_page_id: String,
    pub metadata: MappingMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::github::SourceId;

    #[test]
    fn test_mapping_key_format() {
        assert_eq!(MappingKey::new(EntityKind::Issue, 42).as_str(), "issue:42");
        assert_eq!(
            MappingKey::new(EntityKind::ProjectItem, SourceId::Text("PVTI_1".into())).as_str(),
            "project_item:PVTI_1"
        );
        assert_eq!(
            MappingKey::record("db-1", "database-agent").to_string(),
            "record:db-1:database-agent"
        );
    }

    #[test]
    fn test_stored_mapping_metadata_defaults_to_empty() {
        let stored: StoredMapping =
            serde_json::from_str(r#"{ "notion_page_id": "page-1" }"#).unwrap();
        assert!(stored.metadata.is_empty());
    }
}
