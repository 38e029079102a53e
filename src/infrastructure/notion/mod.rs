//! Notion API integration
//!
//! - `client`: reqwest implementation of the [`NotionApi`](crate::domain::ports::NotionApi) port
//! - `retry`: exponential backoff for transient failures
//! - `mock`: in-memory implementation for tests

pub mod client;
pub mod mock;
pub mod retry;

pub use client::{NotionClientConfig, NotionHttpClient};
pub use mock::MockNotionApi;
pub use retry::RetryPolicy;
