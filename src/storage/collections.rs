//! Collection repository for JSON snapshots
//!
//! Each remote collection is mirrored as `collections/<name>.json`, a JSON
//! array of documents exactly as exported from the database.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::info;

use crate::error::BackofficeError;
use crate::models::ids::new_document_id;
use crate::models::{Collection, FieldValue, Record};

use super::file_io::{read_json, write_json_atomic};

/// How imported documents combine with the existing snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Discard the existing snapshot
    #[default]
    Replace,
    /// Keep existing documents; imported documents with the same id win
    Merge,
}

/// Result of importing documents into a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Documents written from the import file
    pub imported: usize,
    /// Imported documents that had no id and received a generated one
    pub assigned_ids: usize,
    /// Existing documents overwritten by an imported document with the same id
    pub replaced: usize,
    /// Documents in the collection after the import
    pub total: usize,
}

/// Repository for one collection snapshot
pub struct CollectionRepository {
    collection: Collection,
    path: PathBuf,
    data: RwLock<Vec<Record>>,
}

impl CollectionRepository {
    pub fn new(collection: Collection, path: PathBuf) -> Self {
        Self {
            collection,
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot from disk (missing file => empty collection)
    pub fn load(&self) -> Result<(), BackofficeError> {
        let documents: Vec<Record> = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            BackofficeError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = documents;
        Ok(())
    }

    /// Save the snapshot to disk
    pub fn save(&self) -> Result<(), BackofficeError> {
        let data = self.data.read().map_err(|e| {
            BackofficeError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        write_json_atomic(&self.path, &*data)
    }

    /// Copy of every document
    pub fn get_all(&self) -> Result<Vec<Record>, BackofficeError> {
        let data = self.data.read().map_err(|e| {
            BackofficeError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    pub fn count(&self) -> Result<usize, BackofficeError> {
        let data = self.data.read().map_err(|e| {
            BackofficeError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }

    /// Bring documents into the collection in memory; call `save` to persist
    pub fn import(
        &self,
        documents: Vec<Record>,
        mode: ImportMode,
    ) -> Result<ImportResult, BackofficeError> {
        let mut data = self.data.write().map_err(|e| {
            BackofficeError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut result = ImportResult::default();
        let mut incoming = Vec::with_capacity(documents.len());

        for mut document in documents {
            if document.id().is_none() {
                document.insert("id", FieldValue::Text(new_document_id()));
                result.assigned_ids += 1;
            }
            incoming.push(document);
        }
        result.imported = incoming.len();

        match mode {
            ImportMode::Replace => {
                *data = incoming;
            }
            ImportMode::Merge => {
                let incoming_ids: HashSet<String> = incoming
                    .iter()
                    .filter_map(|d| d.id().map(str::to_string))
                    .collect();

                let before = data.len();
                data.retain(|d| d.id().map_or(true, |id| !incoming_ids.contains(id)));
                result.replaced = before - data.len();
                data.extend(incoming);
            }
        }

        result.total = data.len();
        info!(
            "Imported {} {} documents ({} replaced, {} ids assigned)",
            result.imported, self.collection, result.replaced, result.assigned_ids
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CollectionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("payments.json");
        let repo = CollectionRepository::new(Collection::Payments, path);
        (temp_dir, repo)
    }

    fn doc(id: &str, amount: f64) -> Record {
        Record::new().with("id", id).with("totalAmount", amount)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_import_save_and_reload() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let result = repo
            .import(vec![doc("a", 1.0), doc("b", 2.0)], ImportMode::Replace)
            .unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(result.total, 2);
        repo.save().unwrap();

        let reloaded = CollectionRepository::new(Collection::Payments, repo.path().to_path_buf());
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 2);
    }

    #[test]
    fn test_merge_replaces_same_id() {
        let (_temp_dir, repo) = create_test_repo();
        repo.import(vec![doc("a", 1.0), doc("b", 2.0)], ImportMode::Replace)
            .unwrap();

        let result = repo
            .import(vec![doc("b", 5.0), doc("c", 3.0)], ImportMode::Merge)
            .unwrap();
        assert_eq!(result.replaced, 1);
        assert_eq!(result.total, 3);

        let all = repo.get_all().unwrap();
        let b = all.iter().find(|d| d.id() == Some("b")).unwrap();
        assert_eq!(b.number("totalAmount"), Some(5.0));
    }

    #[test]
    fn test_missing_ids_are_assigned() {
        let (_temp_dir, repo) = create_test_repo();
        let result = repo
            .import(vec![Record::new().with("totalAmount", 1.0)], ImportMode::Replace)
            .unwrap();
        assert_eq!(result.assigned_ids, 1);
        assert!(repo.get_all().unwrap()[0].id().is_some());
    }
}
