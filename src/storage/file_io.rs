//! File I/O helpers for collection snapshots
//!
//! Snapshots are written atomically (temp file, fsync, rename) so a crash
//! mid-import never leaves a half-written collection behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::BackofficeError;
use crate::models::Record;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, BackofficeError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        BackofficeError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        BackofficeError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Read a file holding a JSON array of documents
///
/// Accepts either a bare array or an object with a `documents` array (the
/// shape some database export tools produce). Every element must be an object.
pub fn read_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, BackofficeError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| {
        BackofficeError::Import(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let value: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        BackofficeError::Import(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    documents_from_value(value)
        .map_err(|msg| BackofficeError::Import(format!("{}: {}", path.display(), msg)))
}

/// Turn a parsed JSON value into documents
pub fn documents_from_value(value: Value) -> Result<Vec<Record>, String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("documents") {
            Some(Value::Array(items)) => items,
            _ => return Err("expected a JSON array of documents".to_string()),
        },
        _ => return Err("expected a JSON array of documents".to_string()),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Record::from_json(item).ok_or_else(|| format!("element {} is not an object", index))
        })
        .collect()
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BackofficeError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BackofficeError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| BackofficeError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| BackofficeError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| BackofficeError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BackofficeError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BackofficeError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
