//! CSV Export functionality
//!
//! Writes a report's main table, followed by any extra sections and the
//! summary totals. Amounts are plain decimals without currency symbols so
//! the file loads cleanly into a spreadsheet.

use std::io::Write;

use crate::error::{BackofficeError, BackofficeResult};
use crate::reports::{Cell, ReportTable};

/// Export a report to CSV
pub fn export_report_csv<W, R>(report: &R, writer: W) -> BackofficeResult<()>
where
    W: Write,
    R: ReportTable + ?Sized,
{
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record(report.headers())?;
    write_rows(&mut csv, &report.rows())?;

    for section in report.sections() {
        csv.write_record([section.title.as_str()])?;
        csv.write_record(&section.headers)?;
        write_rows(&mut csv, &section.rows)?;
    }

    for total in report.totals().iter() {
        csv.write_record([total.name.clone(), Cell::Money(total.amount).plain()])?;
    }

    csv.flush()
        .map_err(|e| BackofficeError::Export(e.to_string()))?;
    Ok(())
}

fn write_rows<W: Write>(csv: &mut csv::Writer<W>, rows: &[Vec<Cell>]) -> BackofficeResult<()> {
    for row in rows {
        csv.write_record(row.iter().map(Cell::plain))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BucketSize, Dataset, Expense, Money, Payment, Sale};
    use crate::reports::{ExpenseReport, ReportFilter, SalesReport};
    use chrono::NaiveDate;

    #[test]
    fn test_export_expense_report() {
        let mut data = Dataset::new();
        data.expenses = vec![
            Expense::new("e1", None, Money::from_cents(30000)).with_category("Rent, office"),
            Expense::new("e2", None, Money::from_cents(10000)).with_category("Utilities"),
        ];
        let report = ExpenseReport::generate(&data, &ReportFilter::all());

        let mut output = Vec::new();
        export_report_csv(&report, &mut output).unwrap();
        let csv_string = String::from_utf8(output).unwrap();

        let lines: Vec<&str> = csv_string.lines().collect();
        assert_eq!(lines[0], "Category,Expenses,Total,Share");
        assert_eq!(lines[1], "\"Rent, office\",1,300.00,75.00");
        assert_eq!(lines[2], "Utilities,1,100.00,25.00");
        assert_eq!(lines[3], "Total expenses,400.00");
    }

    #[test]
    fn test_export_sections() {
        let mut data = Dataset::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 5);
        data.payments = vec![Payment::new("p1", date, Money::from_cents(1000))];
        data.sales = vec![Sale::new("s1", date, "Chalk", 2.0, Money::from_cents(500))];
        let report = SalesReport::generate(&data, &ReportFilter::all(), BucketSize::Month, 5);

        let mut output = Vec::new();
        export_report_csv(&report, &mut output).unwrap();
        let csv_string = String::from_utf8(output).unwrap();

        assert!(csv_string.contains("2025-01,1,10.00,2,10.00"));
        assert!(csv_string.contains("Top products"));
        assert!(csv_string.contains("Chalk,1,2,10.00"));
    }
}
