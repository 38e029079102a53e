//! Port for the remote Notion page store.

use async_trait::async_trait;

use crate::domain::errors::NotionApiError;
use crate::domain::models::{
    CreatePageRequest, DatabaseQuery, PageResponse, QueryResponse, UpdatePageRequest,
};

/// The four remote operations the synchronizer needs from Notion.
///
/// Implementations perform exactly one request per call; retries live in
/// [`NotionPageClient`](crate::services::NotionPageClient).
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Create a page under a database parent.
    async fn create_page(&self, request: &CreatePageRequest) -> Result<PageResponse, NotionApiError>;

    /// Update the properties of an existing page.
    async fn update_page(
        &self,
        page_id: &str,
        request: &UpdatePageRequest,
    ) -> Result<PageResponse, NotionApiError>;

    /// Fetch a single page.
    async fn retrieve_page(&self, page_id: &str) -> Result<PageResponse, NotionApiError>;

    /// Query a database with an optional filter.
    async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryResponse, NotionApiError>;
}
