//! Domain models.

pub mod config;
pub mod github;
pub mod mapping;
pub mod page;
pub mod property;
pub mod record;
pub mod sync;

pub use config::{Config, LoggingConfig, NotionConfig, RetryConfig, StorageConfig};
pub use github::{
    Actor, EventType, GitHubEvent, Issue, IssuesPayload, ProjectContent, ProjectItem,
    ProjectPayload, PullRequest, PullRequestPayload, Repository, SourceId,
};
pub use mapping::{EntityKind, MappingKey, MappingMetadata, MappingRecord, StoredMapping};
pub use page::{
    CreatePageRequest, DatabaseParent, DatabaseQuery, PagePayload, PageResponse, QueryResponse,
    UpdatePageRequest,
};
pub use property::{Block, PropertySet, PropertyValue};
pub use record::SourceRecord;
pub use sync::{HandlerResult, SyncOutcome, SyncSummary};
