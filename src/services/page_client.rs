//! Retrying page client
//!
//! Wraps a [`NotionApi`] implementation with the shared [`RetryPolicy`] and
//! implements create-or-update on top of it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::NotionApiError;
use crate::domain::models::{
    Block, CreatePageRequest, DatabaseQuery, PageResponse, PropertySet, QueryResponse,
    UpdatePageRequest,
};
use crate::domain::ports::NotionApi;
use crate::infrastructure::notion::RetryPolicy;

/// Retrying wrapper around the four remote page operations.
#[derive(Clone)]
pub struct NotionPageClient {
    api: Arc<dyn NotionApi>,
    retry: RetryPolicy,
}

impl NotionPageClient {
    pub fn new(api: Arc<dyn NotionApi>, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    /// Create or update a page and return its id.
    ///
    /// With `page_id` the page's properties are updated; `children` only
    /// apply to newly created pages. Without it a page is created under
    /// `database_id`. A response without an id is a protocol error.
    pub async fn upsert_page(
        &self,
        database_id: &str,
        properties: &PropertySet,
        children: &[Block],
        page_id: Option<&str>,
    ) -> Result<String, NotionApiError> {
        let response = match page_id {
            Some(page_id) => {
                info!(page_id, database_id, "Updating Notion page");
                let request = UpdatePageRequest::new(properties.clone());
                self.retry
                    .execute("pages.update", || self.api.update_page(page_id, &request))
                    .await?
            }
            None => {
                info!(database_id, "Creating Notion page");
                let request = CreatePageRequest::in_database(database_id, properties.clone())
                    .with_children(children.to_vec());
                self.retry
                    .execute("pages.create", || self.api.create_page(&request))
                    .await?
            }
        };

        response.id.ok_or(NotionApiError::MissingPageId)
    }

    pub async fn retrieve_page(&self, page_id: &str) -> Result<PageResponse, NotionApiError> {
        debug!(page_id, "Retrieving Notion page");
        self.retry
            .execute("pages.retrieve", || self.api.retrieve_page(page_id))
            .await
    }

    pub async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryResponse, NotionApiError> {
        debug!(database_id, "Querying Notion database");
        self.retry
            .execute("databases.query", || self.api.query_database(database_id, query))
            .await
    }

    /// Id of the first page whose rich-text `property` equals `value`.
    pub async fn find_page_id(
        &self,
        database_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Option<String>, NotionApiError> {
        let query = DatabaseQuery::rich_text_equals(property, value);
        let response = self.query_database(database_id, &query).await?;
        Ok(response.results.into_iter().find_map(|page| page.id))
    }
}

impl std::fmt::Debug for NotionPageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionPageClient")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
