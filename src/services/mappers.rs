//! Payload mappers
//!
//! Pure translations from GitHub payloads and generic records into Notion
//! property sets. Entity mappers never fail: absent fields fall back to
//! sentinel values. Presence of the framing object (`issue`,
//! `pull_request`, `project_item`) is checked by the caller.

use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Actor, Block, IssuesPayload, PagePayload, ProjectPayload, PropertySet, PropertyValue,
    PullRequestPayload, Repository, SourceRecord,
};

/// Properties for an `issues` event.
pub fn map_issue_payload(payload: &IssuesPayload) -> PropertySet {
    let issue = payload.issue.clone().unwrap_or_default();
    let state = issue.state.as_deref().map_or_else(|| "Open".to_string(), title_case);

    PropertySet::new()
        .with(
            "Title",
            PropertyValue::title(issue.title.as_deref().unwrap_or("GitHub Issue")),
        )
        .with("URL", PropertyValue::url(issue.html_url.as_deref()))
        .with("Repository", repository_name(payload.repository.as_ref()))
        .with("Number", PropertyValue::number(issue.number))
        .with("State", PropertyValue::status(&state))
        .with("Author", login_or(issue.user.as_ref(), "unknown"))
        .with("Assignee", login_or(issue.assignee.as_ref(), "Unassigned"))
        .with("Created", PropertyValue::date(issue.created_at.as_deref()))
        .with("Updated", PropertyValue::date(issue.updated_at.as_deref()))
}

/// Properties for a `pull_request` event.
///
/// State precedence: `merged` wins over `state == "closed"`, which wins over
/// everything else.
pub fn map_pull_request_payload(payload: &PullRequestPayload) -> PropertySet {
    let pull_request = payload.pull_request.clone().unwrap_or_default();
    let state = if pull_request.merged.unwrap_or(false) {
        "Merged"
    } else if pull_request.state.as_deref() == Some("closed") {
        "Closed"
    } else {
        "Open"
    };

    PropertySet::new()
        .with(
            "Title",
            PropertyValue::title(pull_request.title.as_deref().unwrap_or("Pull Request")),
        )
        .with("URL", PropertyValue::url(pull_request.html_url.as_deref()))
        .with("Repository", repository_name(payload.repository.as_ref()))
        .with("Number", PropertyValue::number(pull_request.number))
        .with("State", PropertyValue::status(state))
        .with("Author", login_or(pull_request.user.as_ref(), "unknown"))
        .with("Merged By", login_or(pull_request.merged_by.as_ref(), ""))
        .with("Created", PropertyValue::date(pull_request.created_at.as_deref()))
        .with("Updated", PropertyValue::date(pull_request.updated_at.as_deref()))
        .with("Merged", PropertyValue::date(pull_request.merged_at.as_deref()))
}

/// Properties for a `project` event.
pub fn map_project_item_payload(payload: &ProjectPayload) -> PropertySet {
    let item = payload.item().cloned().unwrap_or_default();
    let content = item.content.clone().unwrap_or_default();

    let title = non_empty(content.title.as_deref())
        .or_else(|| non_empty(content.name.as_deref()))
        .unwrap_or("Project Item");
    let url = non_empty(content.html_url.as_deref()).or_else(|| non_empty(content.url.as_deref()));
    let project_id = payload
        .project_id()
        .map(ToString::to_string)
        .unwrap_or_default();
    let item_id = payload.item_id().map(ToString::to_string).unwrap_or_default();
    let updated = non_empty(item.updated_at.as_deref()).or(payload.created_at.as_deref());

    PropertySet::new()
        .with("Title", PropertyValue::title(title))
        .with("URL", PropertyValue::url(url))
        .with("Repository", repository_name(payload.repository.as_ref()))
        .with("Project ID", PropertyValue::rich_text(&project_id))
        .with("Item ID", PropertyValue::rich_text(&item_id))
        .with("Owner", login_or(payload.sender.as_ref(), ""))
        .with("Updated", PropertyValue::date(updated))
}

/// Build the page payload for a generic record.
///
/// `slug` and `title` must be non-empty strings. The output depends only on
/// the record, so repeated calls yield identical payloads.
pub fn build_page_payload(record: &SourceRecord) -> DomainResult<PagePayload> {
    let slug = record.slug().ok_or_else(|| {
        DomainError::ValidationFailed("record is missing a non-empty 'slug'".to_string())
    })?;
    let title = record.title().ok_or_else(|| {
        DomainError::ValidationFailed(format!("record '{slug}' is missing a non-empty 'title'"))
    })?;

    let mut properties = PropertySet::new()
        .with("Name", PropertyValue::title(title))
        .with("Slug", PropertyValue::rich_text(slug));

    if let Some(status) = record.get("status").and_then(scalar_text) {
        properties = properties.with("Status", PropertyValue::select(&status));
    }

    if let Some(url) = record.str_field("url") {
        properties = properties.with("URL", PropertyValue::url(Some(url)));
    }

    if let Some(tags) = record.get("tags") {
        let tags: Vec<String> = match tags {
            Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
            scalar => scalar_text(scalar).into_iter().collect(),
        };
        properties = properties.with("Tags", PropertyValue::multi_select(tags));
    }

    let children = record
        .str_field("description")
        .map(Block::paragraph)
        .into_iter()
        .collect();

    Ok(PagePayload {
        properties,
        children,
    })
}

/// Uppercase the first letter of every run of letters and lowercase the rest,
/// so word boundaries include `_`, `-` and digits: `"in_progress"` ->
/// `"In_Progress"`.
pub fn title_case(value: &str) -> String {
    let mut previous_is_letter = false;
    let mut result = String::with_capacity(value.len());
    for ch in value.chars() {
        if previous_is_letter {
            result.extend(ch.to_lowercase());
        } else {
            result.extend(ch.to_uppercase());
        }
        previous_is_letter = ch.is_alphabetic();
    }
    result
}

fn repository_name(repository: Option<&Repository>) -> PropertyValue {
    PropertyValue::rich_text(
        repository
            .and_then(|repo| repo.full_name.as_deref())
            .unwrap_or(""),
    )
}

fn login_or(actor: Option<&Actor>, default: &str) -> PropertyValue {
    PropertyValue::rich_text(
        actor
            .and_then(|actor| actor.login.as_deref())
            .unwrap_or(default),
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Stringify a scalar JSON value; objects, arrays and null yield `None`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn issue_payload(value: Value) -> IssuesPayload {
        serde_json::from_value(value).unwrap()
    }

    fn pr_payload(value: Value) -> PullRequestPayload {
        serde_json::from_value(value).unwrap()
    }

    fn sample_record() -> SourceRecord {
        serde_json::from_value(json!({
            "slug": "database-agent",
            "title": "Database Agent",
            "status": "Active",
            "url": "https://example.com/agents/database",
            "tags": ["python", "automation"],
            "description": "Synchronizes metadata with Notion."
        }))
        .unwrap()
    }

    #[test]
    fn test_issue_mapping_full_payload() {
        let payload = issue_payload(json!({
            "action": "opened",
            "issue": {
                "id": 1001,
                "number": 42,
                "title": "Crash on start",
                "html_url": "https://github.com/acme/app/issues/42",
                "state": "open",
                "user": {"login": "octocat"},
                "assignee": {"login": "hubot"},
                "labels": [{"name": "bug"}, {"name": "p1"}],
                "created_at": "2024-01-02T03:04:05Z",
                "updated_at": "2024-01-03T03:04:05Z"
            },
            "repository": {"full_name": "acme/app"}
        }));

        let json = map_issue_payload(&payload).to_notion_json();
        assert_eq!(json["Title"]["title"][0]["text"]["content"], "Crash on start");
        assert_eq!(json["URL"]["url"], "https://github.com/acme/app/issues/42");
        assert_eq!(json["Repository"]["rich_text"][0]["text"]["content"], "acme/app");
        assert_eq!(json["Number"]["number"], 42);
        assert_eq!(json["State"]["status"]["name"], "Open");
        assert_eq!(json["Author"]["rich_text"][0]["text"]["content"], "octocat");
        assert_eq!(json["Assignee"]["rich_text"][0]["text"]["content"], "hubot");
        assert_eq!(json["Created"]["date"]["start"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_entity_mappers_emit_only_known_properties() {
        let issue = map_issue_payload(&issue_payload(json!({
            "issue": {"id": 1, "labels": [{"name": "bug"}]}
        })))
        .to_notion_json();
        let mut keys: Vec<&str> = issue.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["Assignee", "Author", "Created", "Number", "Repository", "State", "Title", "URL", "Updated"]
        );

        let pr = map_pull_request_payload(&pr_payload(json!({
            "pull_request": {"id": 2, "labels": [{"name": "bug"}]}
        })))
        .to_notion_json();
        let mut keys: Vec<&str> = pr.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["Author", "Created", "Merged", "Merged By", "Number", "Repository", "State", "Title", "URL", "Updated"]
        );
    }

    #[test]
    fn test_issue_mapping_defaults() {
        let payload = issue_payload(json!({"issue": {"id": 1, "created_at": "yesterday"}}));

        let json = map_issue_payload(&payload).to_notion_json();
        assert_eq!(json["Title"]["title"][0]["text"]["content"], "GitHub Issue");
        assert_eq!(json["URL"]["url"], Value::Null);
        assert_eq!(json["Repository"]["rich_text"][0]["text"]["content"], "");
        assert_eq!(json["Number"]["number"], Value::Null);
        assert_eq!(json["State"]["status"]["name"], "Open");
        assert_eq!(json["Author"]["rich_text"][0]["text"]["content"], "unknown");
        assert_eq!(json["Assignee"]["rich_text"][0]["text"]["content"], "Unassigned");
        assert_eq!(json["Created"]["date"], Value::Null);
        assert_eq!(json["Updated"]["date"], Value::Null);
    }

    #[test]
    fn test_issue_state_is_title_cased() {
        let payload = issue_payload(json!({"issue": {"state": "closed"}}));
        let properties = map_issue_payload(&payload);
        assert_eq!(
            properties.get("State"),
            Some(&PropertyValue::Status("Closed".to_string()))
        );
    }

    #[test]
    fn test_pull_request_state_precedence() {
        let merged = pr_payload(json!({"pull_request": {"state": "closed", "merged": true}}));
        let merged_open = pr_payload(json!({"pull_request": {"state": "open", "merged": true}}));
        let closed = pr_payload(json!({"pull_request": {"state": "closed", "merged": false}}));
        let open = pr_payload(json!({"pull_request": {"state": "open"}}));

        let state = |payload: &PullRequestPayload| map_pull_request_payload(payload).get("State").cloned();
        assert_eq!(state(&merged), Some(PropertyValue::Status("Merged".into())));
        assert_eq!(state(&merged_open), Some(PropertyValue::Status("Merged".into())));
        assert_eq!(state(&closed), Some(PropertyValue::Status("Closed".into())));
        assert_eq!(state(&open), Some(PropertyValue::Status("Open".into())));
    }

    #[test]
    fn test_pull_request_mapping_fields() {
        let payload = pr_payload(json!({
            "pull_request": {
                "id": 7,
                "number": 12,
                "merged": true,
                "merged_by": {"login": "maintainer"},
                "merged_at": "2024-05-01T10:00:00Z"
            }
        }));

        let json = map_pull_request_payload(&payload).to_notion_json();
        assert_eq!(json["Title"]["title"][0]["text"]["content"], "Pull Request");
        assert_eq!(json["Merged By"]["rich_text"][0]["text"]["content"], "maintainer");
        assert_eq!(json["Merged"]["date"]["start"], "2024-05-01T10:00:00Z");
        assert_eq!(json["Author"]["rich_text"][0]["text"]["content"], "unknown");
    }

    #[test]
    fn test_project_item_mapping_fallbacks() {
        let payload: ProjectPayload = serde_json::from_value(json!({
            "project_card": {
                "id": 55,
                "project_id": 9,
                "content": {"name": "Card name", "url": "https://api.github.com/cards/55"},
                "type": "Issue"
            },
            "sender": {"login": "octocat"},
            "created_at": "2024-02-02T00:00:00Z"
        }))
        .unwrap();

        let json = map_project_item_payload(&payload).to_notion_json();
        assert_eq!(json["Title"]["title"][0]["text"]["content"], "Card name");
        assert_eq!(json["URL"]["url"], "https://api.github.com/cards/55");
        assert_eq!(json["Project ID"]["rich_text"][0]["text"]["content"], "9");
        assert_eq!(json["Item ID"]["rich_text"][0]["text"]["content"], "55");
        assert_eq!(json["Owner"]["rich_text"][0]["text"]["content"], "octocat");
        assert_eq!(json["Updated"]["date"]["start"], "2024-02-02T00:00:00Z");
    }

    #[test]
    fn test_project_item_prefers_payload_project_id() {
        let payload: ProjectPayload = serde_json::from_value(json!({
            "project_id": "PVT_1",
            "project_item": {"id": "PVTI_2", "project_id": 3, "content": {"title": "Item"}}
        }))
        .unwrap();

        let json = map_project_item_payload(&payload).to_notion_json();
        assert_eq!(json["Title"]["title"][0]["text"]["content"], "Item");
        assert_eq!(json["Project ID"]["rich_text"][0]["text"]["content"], "PVT_1");
        assert_eq!(json["Item ID"]["rich_text"][0]["text"]["content"], "PVTI_2");
        assert_eq!(json["URL"]["url"], Value::Null);
    }

    #[test]
    fn test_build_page_payload_maps_core_fields() {
        let payload = build_page_payload(&sample_record()).unwrap();
        let properties = payload.properties.to_notion_json();

        assert_eq!(properties["Name"]["title"][0]["text"]["content"], "Database Agent");
        assert_eq!(properties["Slug"]["rich_text"][0]["text"]["content"], "database-agent");
        assert_eq!(properties["Status"]["select"]["name"], "Active");
        assert_eq!(properties["URL"]["url"], "https://example.com/agents/database");
        assert_eq!(
            properties["Tags"]["multi_select"],
            json!([{"name": "python"}, {"name": "automation"}])
        );

        assert_eq!(payload.children.len(), 1);
        assert_eq!(
            payload.children[0].to_notion_json()["paragraph"]["rich_text"][0]["text"]["content"],
            "Synchronizes metadata with Notion."
        );
    }

    #[test]
    fn test_build_page_payload_scalar_tag() {
        let record: SourceRecord =
            serde_json::from_value(json!({"slug": "a", "title": "A", "tags": "solo"})).unwrap();
        let payload = build_page_payload(&record).unwrap();

        assert_eq!(
            payload.properties.get("Tags"),
            Some(&PropertyValue::MultiSelect(vec!["solo".to_string()]))
        );
        assert!(!payload.properties.contains("Status"));
        assert!(!payload.properties.contains("URL"));
        assert!(payload.children.is_empty());
    }

    #[test]
    fn test_build_page_payload_requires_slug_and_title() {
        let missing_slug: SourceRecord = serde_json::from_value(json!({"title": "A"})).unwrap();
        let blank_title: SourceRecord =
            serde_json::from_value(json!({"slug": "a", "title": "  "})).unwrap();

        assert!(matches!(
            build_page_payload(&missing_slug),
            Err(DomainError::ValidationFailed(_))
        ));
        assert!(matches!(
            build_page_payload(&blank_title),
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("open"), "Open");
        assert_eq!(title_case("CLOSED"), "Closed");
        assert_eq!(title_case("in progress"), "In Progress");
        assert_eq!(title_case("in_progress"), "In_Progress");
        assert_eq!(title_case("re-opened"), "Re-Opened");
        assert_eq!(title_case("v2beta"), "V2Beta");
        assert_eq!(title_case(""), "");
    }

    proptest! {
        #[test]
        fn build_page_payload_is_idempotent(
            slug in "[a-z][a-z0-9-]{0,30}",
            title in "[A-Za-z][A-Za-z0-9 ]{0,60}",
            tags in proptest::collection::vec("[a-z]{1,12}", 0..5),
            description in proptest::option::of("[A-Za-z ]{1,80}"),
        ) {
            let mut fields = serde_json::Map::new();
            fields.insert("slug".into(), json!(slug));
            fields.insert("title".into(), json!(title));
            fields.insert("tags".into(), json!(tags));
            if let Some(description) = description {
                fields.insert("description".into(), json!(description));
            }
            let record = SourceRecord::new(fields);

            let first = build_page_payload(&record).unwrap();
            let second = build_page_payload(&record).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
