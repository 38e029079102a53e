//! GitHub webhook payload models.
//!
//! Only the fields the mappers read are modelled. Every field is optional so
//! that partial payloads degrade to sentinel values instead of failing to
//! parse; timestamps are read leniently and anything that is not a string is
//! treated as absent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};

/// Numeric or string identifier as sent by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A GitHub user reference (author, assignee, merger, sender).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actor {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issue {
    pub id: Option<SourceId>,
    pub number: Option<i64>,
    pub title: Option<String>,
    pub html_url: Option<String>,
    pub state: Option<String>,
    pub user: Option<Actor>,
    pub assignee: Option<Actor>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
}

/// Payload of an `issues` webhook event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuesPayload {
    pub action: Option<String>,
    pub issue: Option<Issue>,
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: Option<SourceId>,
    pub number: Option<i64>,
    pub title: Option<String>,
    pub html_url: Option<String>,
    pub state: Option<String>,
    pub merged: Option<bool>,
    pub user: Option<Actor>,
    pub merged_by: Option<Actor>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub merged_at: Option<String>,
}

/// Payload of a `pull_request` webhook event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequestPayload {
    pub action: Option<String>,
    pub pull_request: Option<PullRequest>,
    pub repository: Option<Repository>,
}

/// The issue, pull request or draft an item points at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectContent {
    pub title: Option<String>,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectItem {
    pub id: Option<SourceId>,
    pub project_id: Option<SourceId>,
    pub content: Option<ProjectContent>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
}

/// Payload of a `project` webhook event (project item or classic card).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub action: Option<String>,
    pub project_item: Option<ProjectItem>,
    pub project_card: Option<ProjectItem>,
    pub repository: Option<Repository>,
    pub sender: Option<Actor>,
    pub project_id: Option<SourceId>,
    pub id: Option<SourceId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

impl ProjectPayload {
    /// The framing object: `project_item`, falling back to `project_card`.
    pub fn item(&self) -> Option<&ProjectItem> {
        self.project_item.as_ref().or(self.project_card.as_ref())
    }

    /// Item identifier, falling back to the payload-level `id`.
    pub fn item_id(&self) -> Option<&SourceId> {
        self.item()
            .and_then(|item| item.id.as_ref())
            .or(self.id.as_ref())
    }

    /// Project identifier, preferring the payload-level `project_id`.
    pub fn project_id(&self) -> Option<&SourceId> {
        self.project_id
            .as_ref()
            .or_else(|| self.item().and_then(|item| item.project_id.as_ref()))
    }
}

/// GitHub event types accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Issues,
    PullRequest,
    Project,
}

impl EventType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::PullRequest => "pull_request",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issues" => Ok(Self::Issues),
            "pull_request" => Ok(Self::PullRequest),
            "project" => Ok(Self::Project),
            other => Err(DomainError::UnsupportedEventType(other.to_string())),
        }
    }
}

/// A webhook payload resolved to its event variant at the entry point.
#[derive(Debug, Clone)]
pub enum GitHubEvent {
    Issue(IssuesPayload),
    PullRequest(PullRequestPayload),
    ProjectItem(ProjectPayload),
}

impl GitHubEvent {
    /// Resolve a raw JSON payload into the variant named by `event_type`.
    pub fn from_value(event_type: EventType, payload: Value) -> DomainResult<Self> {
        if !payload.is_object() {
            return Err(DomainError::ValidationFailed(format!(
                "{event_type} payload must be a JSON object"
            )));
        }
        Ok(match event_type {
            EventType::Issues => Self::Issue(serde_json::from_value(payload)?),
            EventType::PullRequest => Self::PullRequest(serde_json::from_value(payload)?),
            EventType::Project => Self::ProjectItem(serde_json::from_value(payload)?),
        })
    }

    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Issue(_) => EventType::Issues,
            Self::PullRequest(_) => EventType::PullRequest,
            Self::ProjectItem(_) => EventType::Project,
        }
    }
}

/// Accept any JSON value, keeping it only when it is a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
