//! Mapping table CLI commands.

use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::adapters::MappingStore;
use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{Config, MappingKey, MappingMetadata};

#[derive(Args, Debug)]
pub struct MappingsArgs {
    #[command(subcommand)]
    pub command: MappingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum MappingsCommands {
    /// List every stored mapping
    List,
    /// Delete the mapping for a key such as `issue:42`
    Delete {
        /// Mapping key
        key: String,
    },
}

#[derive(Debug, Serialize)]
pub struct MappingRow {
    pub key: String,
    pub notion_page_id: String,
    pub metadata: MappingMetadata,
}

#[derive(Debug, Serialize)]
pub struct MappingListOutput {
    pub mappings: Vec<MappingRow>,
    pub total: usize,
}

impl CommandOutput for MappingListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["key", "notion page", "metadata"]);
        for row in &self.mappings {
            let metadata = row
                .metadata
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            table.add_row(vec![
                row.key.clone(),
                row.notion_page_id.clone(),
                truncate(&metadata, 60),
            ]);
        }
        render_list("mapping", &table, self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct MappingActionOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for MappingActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: MappingsArgs, config: &Config, json_mode: bool) -> Result<ExitCode> {
    let mut store = MappingStore::new(&config.storage.mappings_path)?;

    match args.command {
        MappingsCommands::List => {
            let mappings: Vec<MappingRow> = store
                .as_map()?
                .into_iter()
                .map(|(key, stored)| MappingRow {
                    key,
                    notion_page_id: stored.notion_page_id,
                    metadata: stored.metadata,
                })
                .collect();

            let out = MappingListOutput {
                total: mappings.len(),
                mappings,
            };
            output(&out, json_mode);
        }

        MappingsCommands::Delete { key } => {
            let mapping_key = MappingKey::from(key.as_str());
            if !store.delete(&mapping_key)? {
                bail!("No mapping found for key '{key}'");
            }

            let out = MappingActionOutput {
                success: true,
                message: format!("Mapping deleted: {key}"),
            };
            output(&out, json_mode);
        }
    }

    Ok(ExitCode::SUCCESS)
}
