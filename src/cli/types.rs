//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::event::EventArgs;
use crate::cli::commands::mappings::MappingsArgs;
use crate::cli::commands::records::RecordsArgs;

#[derive(Parser, Debug)]
#[command(name = "notion-sync")]
#[command(about = "Sync GitHub events and JSON records to Notion databases", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format on stderr (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Path of the mappings file
    #[arg(long, global = true)]
    pub mappings_path: Option<PathBuf>,

    /// Configuration file (defaults to .notion-sync/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync a single GitHub webhook payload
    Event(EventArgs),

    /// Sync a batch of JSON records into one database
    Records(RecordsArgs),

    /// Inspect or edit the local mapping table
    Mappings(MappingsArgs),
}

impl Commands {
    /// Log format used when neither flag nor config chooses one.
    pub const fn default_log_format(&self) -> &'static str {
        match self {
            Self::Records(_) => "json",
            Self::Event(_) | Self::Mappings(_) => "text",
        }
    }
}
