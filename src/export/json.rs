//! JSON Export functionality
//!
//! Wraps a report in a versioned envelope so downstream tools can tell which
//! report and which filter produced the figures.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::{BackofficeError, BackofficeResult};
use crate::reports::{AggregateResult, ReportFilter, ReportTable};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Report export structure
#[derive(Debug, Serialize)]
pub struct ReportExport<'a, R: Serialize> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    /// Report title
    pub report: String,

    /// Filter the report was computed under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<ReportFilter>,

    /// Summary totals
    pub totals: AggregateResult,

    /// Caveats shown with the report
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,

    /// The full report
    pub data: &'a R,
}

impl<'a, R: ReportTable + Serialize> ReportExport<'a, R> {
    pub fn new(report: &'a R) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            report: report.title().to_string(),
            filter: report.filter().cloned(),
            totals: report.totals(),
            notes: report.notes(),
            data: report,
        }
    }
}

/// Export a report to JSON
pub fn export_report_json<W, R>(report: &R, writer: &mut W, pretty: bool) -> BackofficeResult<()>
where
    W: Write,
    R: ReportTable + Serialize,
{
    let export = ReportExport::new(report);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| BackofficeError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| BackofficeError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, Dataset, Liability, Money};
    use crate::reports::BalanceSheetReport;

    #[test]
    fn test_export_balance_sheet() {
        let mut data = Dataset::new();
        data.assets = vec![Asset::new("a1", "Cash", Money::from_cents(25000))];
        data.liabilities = vec![Liability::new("l1", "Loan", Money::from_cents(8000))];
        let report = BalanceSheetReport::generate(&data, &ReportFilter::all(), Money::zero());

        let mut output = Vec::new();
        export_report_json(&report, &mut output, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["report"], "Balance Sheet");
        assert_eq!(value["data"]["equity"], 17000);
        assert_eq!(value["totals"][2]["name"], "Equity");
        assert!(value["data"]["equity_discrepancy"].is_null());
        assert!(value.get("notes").is_none());
    }
}
