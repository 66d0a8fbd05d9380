//! Storage layer for Backoffice
//!
//! Local JSON snapshots of the remote collections, with atomic writes and
//! automatic directory creation. Storage hands raw documents to the ingestion
//! boundary; it never interprets their fields.

pub mod collections;
pub mod file_io;

pub use collections::{CollectionRepository, ImportMode, ImportResult};
pub use file_io::{read_documents, read_json, write_json_atomic};

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::paths::BackofficePaths;
use crate::error::BackofficeError;
use crate::models::{Collection, Dataset};
use crate::services::ingest::{ingest_dataset, IngestSummary, RawCollections};

/// Main storage coordinator that provides access to every collection
pub struct Storage {
    paths: BackofficePaths,
    repositories: BTreeMap<Collection, CollectionRepository>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BackofficePaths) -> Result<Self, BackofficeError> {
        paths.ensure_directories()?;

        let repositories = Collection::ALL
            .into_iter()
            .map(|c| (c, CollectionRepository::new(c, paths.collection_file(c.name()))))
            .collect();

        Ok(Self {
            paths,
            repositories,
        })
    }

    pub fn paths(&self) -> &BackofficePaths {
        &self.paths
    }

    /// Repository for one collection
    pub fn collection(&self, collection: Collection) -> &CollectionRepository {
        // Every collection gets a repository in `new`
        &self.repositories[&collection]
    }

    /// Load all snapshots from disk
    pub fn load_all(&mut self) -> Result<(), BackofficeError> {
        for repository in self.repositories.values() {
            repository.load()?;
        }
        Ok(())
    }

    /// Import a JSON export file into a collection and persist it
    pub fn import_file(
        &self,
        collection: Collection,
        file: &Path,
        mode: ImportMode,
    ) -> Result<ImportResult, BackofficeError> {
        let documents = read_documents(file)?;
        let repository = self.collection(collection);
        let result = repository.import(documents, mode)?;
        repository.save()?;
        Ok(result)
    }

    /// Raw documents for every collection
    pub fn raw_collections(&self) -> Result<RawCollections, BackofficeError> {
        self.repositories
            .iter()
            .map(|(collection, repository)| Ok((*collection, repository.get_all()?)))
            .collect()
    }

    /// Typed dataset for reporting, plus what the ingestion boundary found
    pub fn load_dataset(&self) -> Result<(Dataset, IngestSummary), BackofficeError> {
        Ok(ingest_dataset(&self.raw_collections()?))
    }

    /// Check if storage has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
