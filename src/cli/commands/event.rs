//! Webhook event sync command.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::adapters::MappingStore;
use crate::cli::commands::{build_page_client, non_empty};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, EventType, GitHubEvent, HandlerResult};
use crate::services::{EventDatabases, EventSyncer};

#[derive(Args, Debug)]
pub struct EventArgs {
    /// GitHub event type (issues, pull_request, project)
    #[arg(long)]
    pub event_type: String,

    /// Path to the event payload JSON file
    #[arg(long)]
    pub payload_path: PathBuf,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub notion_token: Option<String>,

    /// Target database for issues
    #[arg(long, env = "NOTION_ISSUE_DATABASE_ID")]
    pub issue_database_id: Option<String>,

    /// Target database for pull requests
    #[arg(long, env = "NOTION_PR_DATABASE_ID")]
    pub pr_database_id: Option<String>,

    /// Target database for project items (optional; skipped when unset)
    #[arg(long, env = "NOTION_PROJECT_DATABASE_ID")]
    pub project_database_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventOutput {
    pub event_type: String,
    pub success: bool,
    pub critical: bool,
    pub message: String,
}

impl EventOutput {
    fn new(event_type: EventType, result: &HandlerResult) -> Self {
        Self {
            event_type: event_type.to_string(),
            success: result.success,
            critical: result.critical,
            message: result.message.clone(),
        }
    }
}

impl CommandOutput for EventOutput {
    fn to_human(&self) -> String {
        let status = if self.success {
            "ok"
        } else if self.critical {
            "failed"
        } else {
            "skipped"
        };
        format!("[{}] {}: {}", status, self.event_type, self.message)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: EventArgs, config: &Config, json_mode: bool) -> Result<ExitCode> {
    let event_type = EventType::from_str(&args.event_type)?;
    let payload = load_payload(&args.payload_path)?;

    let token = non_empty(args.notion_token)
        .context("NOTION_TOKEN environment variable must be set")?;

    let event = GitHubEvent::from_value(event_type, payload)
        .with_context(|| format!("Invalid {event_type} payload"))?;

    let mut store = MappingStore::new(&config.storage.mappings_path)?;
    let databases = EventDatabases {
        issues: non_empty(args.issue_database_id),
        pull_requests: non_empty(args.pr_database_id),
        projects: non_empty(args.project_database_id),
    };
    let syncer = EventSyncer::new(build_page_client(token, config)?, databases);

    info!(%event_type, payload = %args.payload_path.display(), "Syncing GitHub event");
    let result = syncer.handle(&event, &mut store).await;

    output(&EventOutput::new(event_type, &result), json_mode);

    Ok(if result.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn load_payload(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to load payload from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse payload from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(dir: &TempDir, event_type: &str, payload: &str, token: Option<&str>) -> EventArgs {
        let payload_path = dir.path().join("payload.json");
        std::fs::write(&payload_path, payload).unwrap();
        EventArgs {
            event_type: event_type.to_string(),
            payload_path,
            notion_token: token.map(str::to_string),
            issue_database_id: Some("issue-db".to_string()),
            pr_database_id: None,
            project_database_id: None,
        }
    }

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.mappings_path = dir.path().join("mappings.json");
        config
    }

    #[tokio::test]
    async fn test_unsupported_event_type_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = execute(args(&dir, "push", "{}", Some("tok")), &config(&dir), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported event type: push"));
    }

    #[tokio::test]
    async fn test_unreadable_payload_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = execute(args(&dir, "issues", "{not json", Some("tok")), &config(&dir), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse payload"));
    }

    #[tokio::test]
    async fn test_missing_token_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = execute(args(&dir, "issues", r#"{"issue": {"id": 1}}"#, Some("  ")), &config(&dir), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("NOTION_TOKEN"));
    }
}
