//! Adapters for local persistence.

pub mod mapping_store;

pub use mapping_store::{MappingStore, DEFAULT_MAPPINGS_PATH};
