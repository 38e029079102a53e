//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use std::process::ExitCode;

use crate::infrastructure::logging::SecretScrubber;

/// Render a command error for the user with credentials scrubbed.
pub fn format_error(err: &anyhow::Error, json_mode: bool) -> String {
    let message = SecretScrubber::new().scrub_message(&format!("{err:#}"));
    if json_mode {
        serde_json::json!({ "success": false, "error": message }).to_string()
    } else {
        format!("Error: {message}")
    }
}

/// Print a command error to stderr.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) {
    eprintln!("{}", format_error(err, json_mode));
}

/// Report a failed command once on stderr and map it to the failure exit code.
pub fn report_failure(err: &anyhow::Error, json_mode: bool) -> ExitCode {
    handle_error(err, json_mode);
    ExitCode::FAILURE
}
