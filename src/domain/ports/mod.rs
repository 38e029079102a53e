//! Port trait definitions (Hexagonal Architecture)
//!
//! - NotionApi: remote page store operations (create, update, retrieve, query)

pub mod notion_api;

pub use notion_api::NotionApi;
