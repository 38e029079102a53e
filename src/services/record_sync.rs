//! Batch record synchronization
//!
//! Records are processed strictly in input order. A failing record is
//! counted and logged, and the batch moves on to the next one.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::adapters::MappingStore;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{MappingKey, MappingMetadata, SourceRecord, SyncOutcome, SyncSummary};
use crate::services::mappers::build_page_payload;
use crate::services::page_client::NotionPageClient;

/// Rich-text property used to find an existing page for a record.
pub const SLUG_PROPERTY: &str = "Slug";

/// Read a records file: a JSON array or an object with a `records` array.
pub fn load_records(path: &Path) -> DomainResult<Vec<SourceRecord>> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        DomainError::ValidationFailed(format!(
            "failed to read records file {}: {err}",
            path.display()
        ))
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|err| {
        DomainError::ValidationFailed(format!(
            "records file {} is not valid JSON: {err}",
            path.display()
        ))
    })?;
    parse_records(value)
}

/// Accept `[...]` or `{"records": [...]}`; every element must be an object.
pub fn parse_records(value: Value) -> DomainResult<Vec<SourceRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("records") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DomainError::ValidationFailed(
                    "records file must contain a JSON array or an object with a 'records' array"
                        .to_string(),
                ))
            }
        },
        _ => {
            return Err(DomainError::ValidationFailed(
                "records file must contain a JSON array or an object with a 'records' array"
                    .to_string(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(SourceRecord::new(fields)),
            _ => Err(DomainError::ValidationFailed(format!(
                "record at index {index} is not a JSON object"
            ))),
        })
        .collect()
}

/// Synchronizes generic records into one database.
#[derive(Debug, Clone)]
pub struct RecordSyncer {
    client: Option<NotionPageClient>,
    database_id: String,
    dry_run: bool,
}

impl RecordSyncer {
    /// `client` may only be `None` in dry-run mode; lookups then fall back to
    /// explicit ids and the mapping store.
    pub fn new(client: Option<NotionPageClient>, database_id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            client,
            database_id: database_id.into(),
            dry_run,
        }
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Synchronize a single record.
    ///
    /// Existing page lookup order: the record's `notion_page_id`, then the
    /// mapping store, then a database query on the `Slug` property.
    #[instrument(skip_all, fields(slug = record.slug().unwrap_or_default()))]
    pub async fn sync_record(
        &self,
        record: &SourceRecord,
        store: &mut MappingStore,
    ) -> DomainResult<SyncOutcome> {
        let payload = build_page_payload(record)?;
        let slug = record.slug().unwrap_or_default();
        let key = MappingKey::record(&self.database_id, slug);

        let existing = self.find_existing(record, &key, store).await?;
        let outcome = SyncOutcome::for_existing(existing.is_some());

        if self.dry_run {
            info!(slug, would = %outcome, existing_page_id = ?existing, "Dry run, skipping Notion write");
            return Ok(outcome);
        }

        let client = self.client.as_ref().ok_or_else(|| {
            DomainError::Configuration("a Notion client is required outside dry-run mode".to_string())
        })?;

        let page_id = client
            .upsert_page(
                &self.database_id,
                &payload.properties,
                &payload.children,
                existing.as_deref(),
            )
            .await?;

        let metadata = MappingMetadata::from([
            ("slug".to_string(), slug.to_string()),
            ("database_id".to_string(), self.database_id.clone()),
        ]);
        store.set(&key, &page_id, metadata)?;

        info!(slug, %page_id, %outcome, "Record synced to Notion page");
        Ok(outcome)
    }

    /// Synchronize records in order, isolating failures.
    pub async fn sync_records(&self, records: &[SourceRecord], store: &mut MappingStore) -> SyncSummary {
        let mut summary = SyncSummary::default();

        for (index, record) in records.iter().enumerate() {
            let outcome = match self.sync_record(record, store).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(
                        index,
                        slug = record.slug().unwrap_or_default(),
                        error = %err,
                        "Failed to sync record"
                    );
                    SyncOutcome::Failed
                }
            };
            summary.record(outcome);
        }

        info!(
            created = summary.created,
            updated = summary.updated,
            failed = summary.failed,
            dry_run = self.dry_run,
            "Record sync finished"
        );
        summary
    }

    async fn find_existing(
        &self,
        record: &SourceRecord,
        key: &MappingKey,
        store: &mut MappingStore,
    ) -> DomainResult<Option<String>> {
        if let Some(page_id) = record.notion_page_id() {
            debug!(page_id, "Using explicit notion_page_id");
            return Ok(Some(page_id.to_string()));
        }

        if let Some(page_id) = store.get(key)? {
            debug!(%page_id, %key, "Found page in mapping store");
            return Ok(Some(page_id));
        }

        match &self.client {
            Some(client) => {
                let slug = record.slug().unwrap_or_default();
                Ok(client
                    .find_page_id(&self.database_id, SLUG_PROPERTY, slug)
                    .await?)
            }
            None => Ok(None),
        }
    }
}
