//! Batch record sync command.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::MappingStore;
use crate::cli::commands::{build_page_client, non_empty};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, SyncSummary};
use crate::services::{load_records, RecordSyncer};

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Target Notion database id
    #[arg(long)]
    pub database_id: String,

    /// JSON file holding an array of records or {"records": [...]}
    #[arg(long)]
    pub records_file: PathBuf,

    /// Compute outcomes without creating or updating pages
    #[arg(long)]
    pub dry_run: bool,

    /// Notion integration token (optional with --dry-run)
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    pub notion_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordsOutput {
    pub database_id: String,
    pub dry_run: bool,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl RecordsOutput {
    fn new(database_id: &str, dry_run: bool, summary: SyncSummary) -> Self {
        Self {
            database_id: database_id.to_string(),
            dry_run,
            created: summary.created,
            updated: summary.updated,
            failed: summary.failed,
        }
    }
}

impl CommandOutput for RecordsOutput {
    fn to_human(&self) -> String {
        let prefix = if self.dry_run { "Dry run: " } else { "" };
        format!(
            "{}{} created, {} updated, {} failed (database {})",
            prefix, self.created, self.updated, self.failed, self.database_id
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: RecordsArgs, config: &Config, json_mode: bool) -> Result<ExitCode> {
    let database_id = args.database_id.trim();
    if database_id.is_empty() {
        bail!("--database-id must not be empty");
    }

    let records = load_records(&args.records_file)
        .with_context(|| format!("Failed to load records from {}", args.records_file.display()))?;

    let client = match non_empty(args.notion_token) {
        Some(token) => Some(build_page_client(token, config)?),
        None if args.dry_run => {
            warn!("NOTION_TOKEN not set; dry run will not query Notion for existing pages");
            None
        }
        None => bail!("NOTION_TOKEN environment variable must be set"),
    };

    let mut store = MappingStore::new(&config.storage.mappings_path)?;
    let syncer = RecordSyncer::new(client, database_id, args.dry_run);

    info!(
        count = records.len(),
        database_id,
        dry_run = args.dry_run,
        "Syncing records"
    );
    let summary = syncer.sync_records(&records, &mut store).await;

    output(&RecordsOutput::new(database_id, args.dry_run, summary), json_mode);

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
