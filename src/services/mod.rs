//! Service layer for Backoffice
//!
//! Sits between storage and reporting: turns raw collection snapshots into
//! the typed dataset reports are computed from.

pub mod ingest;

pub use ingest::{
    ingest_dataset, CollectionSummary, FieldIssue, FieldReader, FromRecord, IngestSummary,
    Ingested, IssueKind, RawCollections,
};
