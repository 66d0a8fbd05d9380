//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with storage and reporting.

pub mod collections;
pub mod report;

pub use collections::{
    handle_collections_command, handle_import_command, handle_validate_command, parse_collection,
};
pub use report::{handle_report_command, OutputFormat, ReportCommands};
