//! notion-sync - GitHub and JSON record synchronizer for Notion databases
//!
//! Takes GitHub webhook payloads (issues, pull requests, project items) or
//! batches of generic JSON records, maps them to Notion page properties and
//! creates or updates pages, remembering which page belongs to which source
//! entity in a local mapping file.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, error taxonomy and the `NotionApi` port
//! - **Adapters** (`adapters`): the file-backed mapping store
//! - **Infrastructure Layer** (`infrastructure`): Notion HTTP client, retry
//!   policy, configuration and logging
//! - **Service Layer** (`services`): payload mappers and sync workflows
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::MappingStore;
pub use domain::models::{
    Config, EventType, GitHubEvent, HandlerResult, MappingKey, PropertySet, PropertyValue,
    SourceRecord, SyncOutcome, SyncSummary,
};
pub use domain::ports::NotionApi;
pub use domain::{DomainError, DomainResult, NotionApiError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::notion::{NotionHttpClient, RetryPolicy};
pub use services::{EventSyncer, NotionPageClient, RecordSyncer};
