//! Export module for Backoffice
//!
//! Writes reports in machine-readable formats:
//! - CSV: the report table and its totals (spreadsheet-compatible)
//! - JSON: the full report in a versioned envelope
//! - YAML: the same envelope, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_report_csv;
pub use self::json::{export_report_json, ReportExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_report_yaml;
