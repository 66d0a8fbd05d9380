//! YAML Export functionality
//!
//! Same envelope as the JSON export, for reading by people.

use serde::Serialize;
use std::io::Write;

use crate::error::{BackofficeError, BackofficeResult};
use crate::export::json::ReportExport;
use crate::reports::ReportTable;

/// Export a report to YAML
pub fn export_report_yaml<W, R>(report: &R, writer: &mut W) -> BackofficeResult<()>
where
    W: Write,
    R: ReportTable + Serialize,
{
    let export = ReportExport::new(report);

    writeln!(writer, "# Backoffice {}", export.report)
        .map_err(|e| BackofficeError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| BackofficeError::Export(e.to_string()))?;
    if let Some(filter) = &export.filter {
        writeln!(writer, "# Period: {}", filter)
            .map_err(|e| BackofficeError::Export(e.to_string()))?;
    }
    writeln!(writer).map_err(|e| BackofficeError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BackofficeError::Export(e.to_string()))?;

    Ok(())
}
