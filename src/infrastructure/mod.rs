//! Infrastructure layer module
//!
//! External integrations and process-wide concerns:
//! - Notion REST client, retry policy and in-memory test double
//! - Configuration management
//! - Logging infrastructure
//!
//! Implementations here satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod notion;
