//! File-backed store of source entity to Notion page mappings.
//!
//! The whole table lives in one pretty-printed JSON object keyed by mapping
//! key. It is loaded lazily on first access and rewritten wholesale, sorted
//! by key, after every mutation. A file that cannot be decoded is moved to a
//! `.bak` sibling and the store starts over with an empty table.
//!
//! There is no locking: one writer per backing file is assumed.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{MappingKey, MappingMetadata, MappingRecord, StoredMapping};

/// Default location of the mappings file, relative to the working directory.
pub const DEFAULT_MAPPINGS_PATH: &str = "build/notion_mappings.json";

#[derive(Debug)]
pub struct MappingStore {
    path: PathBuf,
    cache: BTreeMap<String, StoredMapping>,
    loaded: bool,
}

impl MappingStore {
    /// Create a store backed by `path`, creating its parent directory.
    ///
    /// The file itself is not read until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::Storage(format!(
                    "Failed to create mapping directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        Ok(Self {
            path,
            cache: BTreeMap::new(),
            loaded: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path a corrupt mappings file is moved to.
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("bak")
    }

    fn load(&mut self) -> DomainResult<()> {
        if self.loaded {
            return Ok(());
        }

        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, StoredMapping>>(&bytes) {
                Ok(cache) => {
                    debug!(path = %self.path.display(), entries = cache.len(), "Loaded Notion mappings");
                    self.cache = cache;
                }
                Err(err) => {
                    warn!(
                        path = %self.path.display(),
                        error = %err,
                        "Failed to decode Notion mapping file"
                    );
                    let backup = self.backup_path();
                    match fs::rename(&self.path, &backup) {
                        Ok(()) => {
                            warn!(backup = %backup.display(), "Corrupt mapping file moved aside");
                        }
                        Err(e) => {
                            // The next save overwrites the corrupt file.
                            warn!(
                                backup = %backup.display(),
                                error = %e,
                                "Failed to move corrupt mapping file aside"
                            );
                        }
                    }
                    self.cache = BTreeMap::new();
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No mapping file yet, starting empty");
            }
            Err(err) => {
                return Err(DomainError::Storage(format!(
                    "Failed to read mapping file {}: {err}",
                    self.path.display()
                )));
            }
        }

        self.loaded = true;
        Ok(())
    }

    fn save(&self) -> DomainResult<()> {
        let contents = serde_json::to_string_pretty(&self.cache)?;
        fs::write(&self.path, contents).map_err(|e| {
            DomainError::Storage(format!(
                "Failed to write mapping file {}: {e}",
                self.path.display()
            ))
        })
    }

    /// Notion page currently mapped to `key`, if any.
    pub fn get(&mut self, key: &MappingKey) -> DomainResult<Option<String>> {
        self.load()?;
        Ok(self
            .cache
            .get(key.as_str())
            .map(|mapping| mapping.notion_page_id.clone()))
    }

    /// Insert or replace the mapping for `key` and persist the table.
    pub fn set(
        &mut self,
        key: &MappingKey,
        notion_page_id: &str,
        metadata: MappingMetadata,
    ) -> DomainResult<MappingRecord> {
        self.load()?;
        let previous = self.cache.insert(
            key.as_str().to_string(),
            StoredMapping {
                notion_page_id: notion_page_id.to_string(),
                metadata: metadata.clone(),
            },
        );
        if let Err(err) = self.save() {
            // Keep the cache in step with what is on disk.
            match previous {
                Some(previous) => {
                    self.cache.insert(key.as_str().to_string(), previous);
                }
                None => {
                    self.cache.remove(key.as_str());
                }
            }
            return Err(err);
        }
        Ok(MappingRecord {
            key: key.clone(),
            notion_page_id: notion_page_id.to_string(),
            metadata,
        })
    }

    /// Remove the mapping for `key`. Returns whether one existed.
    pub fn delete(&mut self, key: &MappingKey) -> DomainResult<bool> {
        self.load()?;
        let Some(removed) = self.cache.remove(key.as_str()) else {
            return Ok(false);
        };
        if let Err(err) = self.save() {
            self.cache.insert(key.as_str().to_string(), removed);
            return Err(err);
        }
        Ok(true)
    }

    /// Snapshot of every mapping, ordered by key.
    pub fn as_map(&mut self) -> DomainResult<BTreeMap<String, StoredMapping>> {
        self.load()?;
        Ok(self.cache.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn metadata(pairs: &[(&str, &str)]) -> MappingMetadata {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_get_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let mut store = MappingStore::new(dir.path().join("mappings.json")).unwrap();
        assert_eq!(store.get(&MappingKey::from("issue:1")).unwrap(), None);
        assert!(!store.path().exists(), "reads must not create the file");
    }

    #[test]
    fn test_new_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build").join("nested").join("mappings.json");
        let store = MappingStore::new(&path).unwrap();
        assert!(store.path().parent().unwrap().is_dir());
    }

    #[test]
    fn test_set_overwrites_previous_mapping() {
        let dir = TempDir::new().unwrap();
        let mut store = MappingStore::new(dir.path().join("mappings.json")).unwrap();
        let key = MappingKey::from("issue:7");

        store.set(&key, "page-a", MappingMetadata::new()).unwrap();
        let record = store
            .set(&key, "page-b", metadata(&[("number", "7")]))
            .unwrap();

        assert_eq!(record.notion_page_id, "page-b");
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("page-b"));
        assert_eq!(store.as_map().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_cache_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mappings.json");
        let mut store = MappingStore::new(&path).unwrap();
        let existing = MappingKey::from("issue:1");
        store.set(&existing, "page-1", MappingMetadata::new()).unwrap();

        // A directory in place of the file makes every write fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let fresh = MappingKey::from("issue:2");
        assert!(matches!(
            store.set(&fresh, "page-2", MappingMetadata::new()),
            Err(DomainError::Storage(_))
        ));
        assert!(store.set(&existing, "page-9", MappingMetadata::new()).is_err());
        assert!(store.delete(&existing).is_err());

        assert_eq!(store.get(&fresh).unwrap(), None);
        assert_eq!(store.get(&existing).unwrap().as_deref(), Some("page-1"));
    }

    #[test]
    fn test_file_is_sorted_and_pretty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mappings.json");
        let mut store = MappingStore::new(&path).unwrap();

        store.set(&MappingKey::from("pull_request:2"), "p2", MappingMetadata::new()).unwrap();
        store.set(&MappingKey::from("issue:9"), "p9", metadata(&[("repository", "org/repo")])).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let issue_pos = contents.find("issue:9").unwrap();
        let pr_pos = contents.find("pull_request:2").unwrap();
        assert!(issue_pos < pr_pos, "keys must be written in sorted order");
        assert!(contents.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["issue:9"]["notion_page_id"], "p9");
        assert_eq!(parsed["issue:9"]["metadata"]["repository"], "org/repo");
    }

    #[test]
    fn test_delete_only_persists_when_present() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mappings.json");
        let mut store = MappingStore::new(&path).unwrap();

        assert!(!store.delete(&MappingKey::from("issue:1")).unwrap());
        assert!(!path.exists());

        store.set(&MappingKey::from("issue:1"), "page-1", MappingMetadata::new()).unwrap();
        assert!(store.delete(&MappingKey::from("issue:1")).unwrap());
        assert_eq!(store.get(&MappingKey::from("issue:1")).unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }

    #[test]
    fn test_wrong_shape_is_treated_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mappings.json");
        fs::write(&path, r#"["not", "a", "table"]"#).unwrap();

        let mut store = MappingStore::new(&path).unwrap();
        assert!(store.as_map().unwrap().is_empty());
        assert!(store.backup_path().exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_backup_path_replaces_extension() {
        let dir = TempDir::new().unwrap();
        let store = MappingStore::new(dir.path().join("notion_mappings.json")).unwrap();
        assert_eq!(store.backup_path(), dir.path().join("notion_mappings.bak"));
    }
}
