//! Mock Notion API for testing
//!
//! Records every call, hands out sequential page ids and lets tests script
//! failures for the next create or update.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::errors::NotionApiError;
use crate::domain::models::{
    CreatePageRequest, DatabaseQuery, PageResponse, QueryResponse, UpdatePageRequest,
};
use crate::domain::ports::NotionApi;

#[derive(Debug, Default)]
struct MockState {
    created: Vec<CreatePageRequest>,
    updated: Vec<(String, UpdatePageRequest)>,
    queries: Vec<(String, DatabaseQuery)>,
    retrieved: Vec<String>,
    existing_page_ids: Vec<String>,
    create_failures: VecDeque<NotionApiError>,
    update_failures: VecDeque<NotionApiError>,
    query_failures: VecDeque<NotionApiError>,
    omit_page_ids: bool,
    next_page: u32,
}

/// In-memory [`NotionApi`] implementation.
#[derive(Debug, Default)]
pub struct MockNotionApi {
    state: Mutex<MockState>,
}

impl MockNotionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page ids returned, in order, by every database query.
    #[must_use]
    pub fn with_existing_pages<I, S>(self, page_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().existing_page_ids = page_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Respond to creates and updates without a page id.
    #[must_use]
    pub fn without_page_ids(self) -> Self {
        self.lock().omit_page_ids = true;
        self
    }

    pub fn fail_next_create(&self, err: NotionApiError) {
        self.lock().create_failures.push_back(err);
    }

    pub fn fail_next_update(&self, err: NotionApiError) {
        self.lock().update_failures.push_back(err);
    }

    pub fn fail_next_query(&self, err: NotionApiError) {
        self.lock().query_failures.push_back(err);
    }

    pub fn created(&self) -> Vec<CreatePageRequest> {
        self.lock().created.clone()
    }

    pub fn updated(&self) -> Vec<(String, UpdatePageRequest)> {
        self.lock().updated.clone()
    }

    pub fn queries(&self) -> Vec<(String, DatabaseQuery)> {
        self.lock().queries.clone()
    }

    pub fn retrieved(&self) -> Vec<String> {
        self.lock().retrieved.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MockState {
    fn page(&self, id: String) -> PageResponse {
        PageResponse {
            url: Some(format!("https://www.notion.so/{id}")),
            id: (!self.omit_page_ids).then_some(id),
            ..PageResponse::default()
        }
    }
}

#[async_trait]
impl NotionApi for MockNotionApi {
    async fn create_page(&self, request: &CreatePageRequest) -> Result<PageResponse, NotionApiError> {
        let mut state = self.lock();
        if let Some(err) = state.create_failures.pop_front() {
            return Err(err);
        }
        state.created.push(request.clone());
        state.next_page += 1;
        let id = format!("page-{}", state.next_page);
        Ok(state.page(id))
    }

    async fn update_page(
        &self,
        page_id: &str,
        request: &UpdatePageRequest,
    ) -> Result<PageResponse, NotionApiError> {
        let mut state = self.lock();
        if let Some(err) = state.update_failures.pop_front() {
            return Err(err);
        }
        state.updated.push((page_id.to_string(), request.clone()));
        Ok(state.page(page_id.to_string()))
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<PageResponse, NotionApiError> {
        let mut state = self.lock();
        state.retrieved.push(page_id.to_string());
        Ok(state.page(page_id.to_string()))
    }

    async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryResponse, NotionApiError> {
        let mut state = self.lock();
        if let Some(err) = state.query_failures.pop_front() {
            return Err(err);
        }
        state.queries.push((database_id.to_string(), query.clone()));
        let results = state
            .existing_page_ids
            .iter()
            .map(|id| PageResponse {
                id: Some(id.clone()),
                ..PageResponse::default()
            })
            .collect();
        Ok(QueryResponse {
            results,
            has_more: false,
            next_cursor: None,
        })
    }
}
