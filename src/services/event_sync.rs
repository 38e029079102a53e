//! Webhook event synchronization
//!
//! One handler per event kind. Each resolves its target database, checks the
//! framing object, derives the mapping key, upserts through the page client
//! and records the resulting page id in the mapping store.

use tracing::{error, info, instrument, warn};

use crate::adapters::MappingStore;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    EntityKind, GitHubEvent, HandlerResult, IssuesPayload, MappingKey, MappingMetadata,
    ProjectPayload, PropertySet, PullRequestPayload, Repository,
};
use crate::services::mappers::{
    map_issue_payload, map_project_item_payload, map_pull_request_payload,
};
use crate::services::page_client::NotionPageClient;

/// Target database per event kind, as read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDatabases {
    pub issues: Option<String>,
    pub pull_requests: Option<String>,
    pub projects: Option<String>,
}

/// Routes resolved webhook events to their handlers.
#[derive(Debug, Clone)]
pub struct EventSyncer {
    client: NotionPageClient,
    databases: EventDatabases,
}

impl EventSyncer {
    pub fn new(client: NotionPageClient, databases: EventDatabases) -> Self {
        Self { client, databases }
    }

    /// Synchronize one event. Never returns an error: every failure is folded
    /// into the [`HandlerResult`].
    pub async fn handle(&self, event: &GitHubEvent, store: &mut MappingStore) -> HandlerResult {
        let result = match event {
            GitHubEvent::Issue(payload) => self.handle_issue(payload, store).await,
            GitHubEvent::PullRequest(payload) => self.handle_pull_request(payload, store).await,
            GitHubEvent::ProjectItem(payload) => self.handle_project_item(payload, store).await,
        };

        if result.success {
            info!(event_type = %event.event_type(), "{}", result.message);
        } else if result.critical {
            error!(event_type = %event.event_type(), "{}", result.message);
        } else {
            warn!(event_type = %event.event_type(), "{}", result.message);
        }
        result
    }

    #[instrument(skip_all)]
    async fn handle_issue(&self, payload: &IssuesPayload, store: &mut MappingStore) -> HandlerResult {
        let Some(database_id) = self.databases.issues.as_deref() else {
            return HandlerResult::critical("NOTION_ISSUE_DATABASE_ID environment variable is missing");
        };
        let Some(issue) = payload.issue.as_ref() else {
            return HandlerResult::critical("Payload does not contain issue information");
        };
        let Some(issue_id) = issue.id.as_ref() else {
            return HandlerResult::critical("Issue payload does not contain an id");
        };

        let key = MappingKey::new(EntityKind::Issue, issue_id);
        let metadata = MappingMetadata::from([
            ("repository".to_string(), repository_name(payload.repository.as_ref())),
            ("number".to_string(), optional_number(issue.number)),
        ]);

        match self
            .sync_entity(database_id, &key, &map_issue_payload(payload), metadata, store)
            .await
        {
            Ok(page_id) => {
                info!(number = ?issue.number, %page_id, "Issue synced to Notion page");
                HandlerResult::ok("Issue synchronised successfully")
            }
            Err(err) => {
                error!(issue_id = %issue_id, error = %err, "Failed to sync issue with Notion");
                HandlerResult::critical(format!("Failed to sync issue: {err}"))
            }
        }
    }

    #[instrument(skip_all)]
    async fn handle_pull_request(
        &self,
        payload: &PullRequestPayload,
        store: &mut MappingStore,
    ) -> HandlerResult {
        let Some(database_id) = self.databases.pull_requests.as_deref() else {
            return HandlerResult::critical("NOTION_PR_DATABASE_ID environment variable is missing");
        };
        let Some(pull_request) = payload.pull_request.as_ref() else {
            return HandlerResult::critical("Payload does not contain pull_request information");
        };
        let Some(pull_request_id) = pull_request.id.as_ref() else {
            return HandlerResult::critical("Pull request payload does not contain an id");
        };

        let key = MappingKey::new(EntityKind::PullRequest, pull_request_id);
        let metadata = MappingMetadata::from([
            ("repository".to_string(), repository_name(payload.repository.as_ref())),
            ("number".to_string(), optional_number(pull_request.number)),
        ]);

        match self
            .sync_entity(database_id, &key, &map_pull_request_payload(payload), metadata, store)
            .await
        {
            Ok(page_id) => {
                info!(number = ?pull_request.number, %page_id, "Pull request synced to Notion page");
                HandlerResult::ok("Pull request synchronised successfully")
            }
            Err(err) => {
                error!(pull_request_id = %pull_request_id, error = %err, "Failed to sync pull request with Notion");
                HandlerResult::critical(format!("Failed to sync pull request: {err}"))
            }
        }
    }

    #[instrument(skip_all)]
    async fn handle_project_item(
        &self,
        payload: &ProjectPayload,
        store: &mut MappingStore,
    ) -> HandlerResult {
        let Some(database_id) = self.databases.projects.as_deref() else {
            return HandlerResult::skipped(
                "NOTION_PROJECT_DATABASE_ID is not configured; skipping project sync",
            );
        };
        let Some(item) = payload.item() else {
            return HandlerResult::critical("Payload does not contain project item information");
        };
        let Some(item_id) = payload.item_id() else {
            return HandlerResult::critical("Project item payload does not contain an id");
        };

        let key = MappingKey::new(EntityKind::ProjectItem, item_id);
        let metadata = MappingMetadata::from([
            (
                "project_id".to_string(),
                payload.project_id().map(ToString::to_string).unwrap_or_default(),
            ),
            (
                "content_type".to_string(),
                item.content_type.clone().unwrap_or_default(),
            ),
        ]);

        match self
            .sync_entity(database_id, &key, &map_project_item_payload(payload), metadata, store)
            .await
        {
            Ok(page_id) => {
                info!(item_id = %item_id, %page_id, "Project item synced to Notion page");
                HandlerResult::ok("Project item synchronised successfully")
            }
            Err(err) => {
                error!(item_id = %item_id, error = %err, "Failed to sync project item with Notion");
                HandlerResult::critical(format!("Failed to sync project item: {err}"))
            }
        }
    }

    /// Look up, upsert and persist one entity.
    async fn sync_entity(
        &self,
        database_id: &str,
        key: &MappingKey,
        properties: &PropertySet,
        metadata: MappingMetadata,
        store: &mut MappingStore,
    ) -> DomainResult<String> {
        let existing = store.get(key)?;
        let page_id = self
            .client
            .upsert_page(database_id, properties, &[], existing.as_deref())
            .await?;
        store.set(key, &page_id, metadata)?;
        Ok(page_id)
    }
}

fn repository_name(repository: Option<&Repository>) -> String {
    repository
        .and_then(|repo| repo.full_name.clone())
        .unwrap_or_default()
}

fn optional_number(number: Option<i64>) -> String {
    number.map(|n| n.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::NotionApiError;
    use crate::domain::models::EventType;
    use crate::infrastructure::notion::{MockNotionApi, RetryPolicy};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn databases() -> EventDatabases {
        EventDatabases {
            issues: Some("issue-db".into()),
            pull_requests: Some("pr-db".into()),
            projects: Some("project-db".into()),
        }
    }

    fn syncer(api: &Arc<MockNotionApi>, databases: EventDatabases) -> EventSyncer {
        let client = NotionPageClient::new(api.clone(), RetryPolicy::new(2, 1, 2));
        EventSyncer::new(client, databases)
    }

    fn store(dir: &TempDir) -> MappingStore {
        MappingStore::new(dir.path().join("mappings.json")).unwrap()
    }

    fn event(event_type: EventType, payload: serde_json::Value) -> GitHubEvent {
        GitHubEvent::from_value(event_type, payload).unwrap()
    }

    #[tokio::test]
    async fn test_issue_created_then_updated() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let api = Arc::new(MockNotionApi::new());
        let syncer = syncer(&api, databases());
        let issue = event(
            EventType::Issues,
            json!({"issue": {"id": 42, "number": 7}, "repository": {"full_name": "acme/app"}}),
        );

        let first = syncer.handle(&issue, &mut store).await;
        let second = syncer.handle(&issue, &mut store).await;

        assert!(first.success, "{}", first.message);
        assert!(second.success, "{}", second.message);
        assert_eq!(api.created().len(), 1);
        assert_eq!(api.created()[0].parent.database_id, "issue-db");
        let updated = api.updated();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0, "page-1");

        let mappings = store.as_map().unwrap();
        let stored = &mappings["issue:42"];
        assert_eq!(stored.notion_page_id, "page-1");
        assert_eq!(stored.metadata["repository"], "acme/app");
        assert_eq!(stored.metadata["number"], "7");
    }

    #[tokio::test]
    async fn test_missing_issue_database_is_critical() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let api = Arc::new(MockNotionApi::new());
        let syncer = syncer(&api, EventDatabases::default());

        let result = syncer
            .handle(&event(EventType::Issues, json!({"issue": {"id": 1}})), &mut store)
            .await;

        assert!(result.is_fatal());
        assert!(result.message.contains("NOTION_ISSUE_DATABASE_ID"));
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn test_missing_framing_object_is_critical() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let api = Arc::new(MockNotionApi::new());
        let syncer = syncer(&api, databases());

        let result = syncer
            .handle(&event(EventType::PullRequest, json!({"action": "opened"})), &mut store)
            .await;

        assert!(result.is_fatal());
        assert_eq!(result.message, "Payload does not contain pull_request information");
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn test_missing_project_database_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let api = Arc::new(MockNotionApi::new());
        let syncer = syncer(
            &api,
            EventDatabases {
                projects: None,
                ..databases()
            },
        );

        let result = syncer
            .handle(
                &event(EventType::Project, json!({"project_item": {"id": 5}})),
                &mut store,
            )
            .await;

        assert!(!result.success);
        assert!(!result.critical);
        assert!(!result.is_fatal());
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn test_project_item_metadata() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let api = Arc::new(MockNotionApi::new());
        let syncer = syncer(&api, databases());

        let result = syncer
            .handle(
                &event(
                    EventType::Project,
                    json!({
                        "project_id": 77,
                        "project_item": {"id": "PVTI_9", "type": "PullRequest"}
                    }),
                ),
                &mut store,
            )
            .await;

        assert!(result.success, "{}", result.message);
        let mappings = store.as_map().unwrap();
        let stored = &mappings["project_item:PVTI_9"];
        assert_eq!(stored.metadata["project_id"], "77");
        assert_eq!(stored.metadata["content_type"], "PullRequest");
    }

    #[tokio::test]
    async fn test_remote_failure_is_critical_and_not_persisted() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let api = Arc::new(MockNotionApi::new());
        api.fail_next_create(NotionApiError::Unauthorized);
        let syncer = syncer(&api, databases());

        let result = syncer
            .handle(&event(EventType::Issues, json!({"issue": {"id": 3}})), &mut store)
            .await;

        assert!(result.is_fatal());
        assert!(result.message.starts_with("Failed to sync issue:"));
        assert!(store.as_map().unwrap().is_empty());
    }
}
