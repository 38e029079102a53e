//! Service layer: payload mapping and synchronization workflows.

pub mod event_sync;
pub mod mappers;
pub mod page_client;
pub mod record_sync;

pub use event_sync::{EventDatabases, EventSyncer};
pub use mappers::{
    build_page_payload, map_issue_payload, map_project_item_payload, map_pull_request_payload,
};
pub use page_client::NotionPageClient;
pub use record_sync::{load_records, parse_records, RecordSyncer};
