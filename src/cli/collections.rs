//! CLI command handlers for collection snapshots
//!
//! Importing exported documents, listing what is held locally and checking
//! how cleanly the documents convert to the typed schema.

use std::path::Path;

use crate::display::{format_collection_list, format_ingest_summary, CollectionStatus};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::Collection;
use crate::storage::{ImportMode, Storage};

/// Issues listed by `validate` unless `--all` is given
const ISSUE_LIMIT: usize = 20;

/// Parse a collection name given on the command line
pub fn parse_collection(name: &str) -> BackofficeResult<Collection> {
    name.parse()
        .map_err(|_| BackofficeError::collection_not_found(name))
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    collection: &str,
    file: &Path,
    merge: bool,
) -> BackofficeResult<()> {
    let collection = parse_collection(collection)?;

    if !file.exists() {
        return Err(BackofficeError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let mode = if merge {
        ImportMode::Merge
    } else {
        ImportMode::Replace
    };
    let result = storage.import_file(collection, file, mode)?;

    println!("Imported {} {} document(s)", result.imported, collection);
    if result.assigned_ids > 0 {
        println!("  {} document(s) had no id and were assigned one", result.assigned_ids);
    }
    if result.replaced > 0 {
        println!("  {} existing document(s) replaced", result.replaced);
    }
    println!("  {} now holds {} document(s)", collection, result.total);

    Ok(())
}

/// Handle the collections command
pub fn handle_collections_command(storage: &Storage) -> BackofficeResult<()> {
    let statuses = Collection::ALL
        .into_iter()
        .map(|collection| {
            let repository = storage.collection(collection);
            Ok(CollectionStatus {
                collection,
                documents: repository.count()?,
                snapshot_exists: repository.path().exists(),
            })
        })
        .collect::<BackofficeResult<Vec<_>>>()?;

    print!("{}", format_collection_list(&statuses));
    println!();
    println!("Snapshots: {}", storage.paths().collections_dir().display());
    Ok(())
}

/// Handle the validate command
pub fn handle_validate_command(storage: &Storage, all: bool) -> BackofficeResult<()> {
    let (_, summary) = storage.load_dataset()?;
    let limit = if all { usize::MAX } else { ISSUE_LIMIT };
    print!("{}", format_ingest_summary(&summary, limit));
    Ok(())
}
