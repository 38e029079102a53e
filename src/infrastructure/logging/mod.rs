//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or text output on stderr
//! - Optional JSON log file
//! - Secret scrubbing for user-facing error output

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::{LogConfig, LogFormat};
pub use logger::LoggerImpl;
pub use secret_scrubbing::SecretScrubber;
