//! CLI command implementations.

pub mod event;
pub mod mappings;
pub mod records;

use std::sync::Arc;

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::notion::{NotionClientConfig, NotionHttpClient, RetryPolicy};
use crate::services::NotionPageClient;

/// Blank tokens and ids count as unset.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build the retrying page client shared by all commands of one run.
pub(crate) fn build_page_client(token: String, config: &Config) -> Result<NotionPageClient> {
    let http = NotionHttpClient::with_config(NotionClientConfig::from_config(token, &config.notion))?;
    Ok(NotionPageClient::new(
        Arc::new(http),
        RetryPolicy::from_config(&config.retry),
    ))
}
