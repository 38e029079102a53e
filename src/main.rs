//! notion-sync CLI entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use notion_sync::cli::{commands, Cli, Commands};
use notion_sync::infrastructure::config::loader::validate_log_level;
use notion_sync::infrastructure::config::ConfigLoader;
use notion_sync::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = cli.json;

    match run(cli).await {
        Ok(code) => code,
        Err(err) => notion_sync::cli::report_failure(&err, json_mode),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    if let Some(path) = cli.mappings_path {
        config.storage.mappings_path = path;
    }
    if let Some(level) = cli.log_level {
        validate_log_level(&level)?;
        config.logging.level = level;
    }

    let format = cli
        .log_format
        .or_else(|| config.logging.format.clone())
        .unwrap_or_else(|| cli.command.default_log_format().to_string());
    let log_config = LogConfig {
        level: config.logging.level.clone(),
        format: format.parse()?,
        log_dir: config.logging.log_dir.clone(),
    };
    let _logger = LoggerImpl::init(&log_config)?;

    match cli.command {
        Commands::Event(args) => commands::event::execute(args, &config, cli.json).await,
        Commands::Records(args) => commands::records::execute(args, &config, cli.json).await,
        Commands::Mappings(args) => commands::mappings::execute(args, &config, cli.json),
    }
}
