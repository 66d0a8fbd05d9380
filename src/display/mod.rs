//! Display formatting for terminal output
//!
//! Renders reports as tables and summarizes the state of the local
//! collection snapshots.

pub mod collections;
pub mod report;

pub use collections::{format_collection_list, format_ingest_summary, CollectionStatus};
pub use report::{format_report, format_table, format_totals, render_cell};
