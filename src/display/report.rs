//! Report formatting for terminal output
//!
//! Renders any [`ReportTable`] as a titled table followed by its sections,
//! summary totals and notes.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::reports::{AggregateResult, Cell, ReportTable};

const WIDTH: usize = 70;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct.abs() < 0.1 && pct != 0.0 {
        format!("{:.2}%", pct)
    } else if pct.abs() < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Human-readable form of a cell
pub fn render_cell(cell: &Cell, currency_symbol: &str) -> String {
    match cell {
        Cell::Money(amount) => amount.format_with_symbol(currency_symbol),
        Cell::OptionalMoney(Some(amount)) => amount.format_with_symbol(currency_symbol),
        Cell::OptionalMoney(None) => "n/a".to_string(),
        Cell::Percent(Some(pct)) => format_percentage(*pct),
        Cell::Percent(None) => "-".to_string(),
        Cell::Text(text) => truncate(text, 40),
        other => other.plain(),
    }
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Build a table; columns whose first row holds numbers are right-aligned
pub fn format_table(headers: &[&str], rows: &[Vec<Cell>], currency_symbol: &str) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row.iter().map(|cell| render_cell(cell, currency_symbol)));
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    if let Some(first) = rows.first() {
        for (index, cell) in first.iter().enumerate() {
            if cell.is_numeric() {
                table.modify(Columns::single(index), Alignment::right());
            }
        }
    }

    table.to_string()
}

/// Format a totals block, one right-aligned amount per line
pub fn format_totals(totals: &AggregateResult, currency_symbol: &str) -> String {
    let label_width = totals
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(10);

    let mut output = String::new();
    for total in totals.iter() {
        output.push_str(&format!(
            "{:<label_width$}  {:>15}\n",
            format!("{}:", total.name),
            total.amount.format_with_symbol(currency_symbol),
            label_width = label_width + 1,
        ));
    }
    output
}

/// Format a whole report for terminal display
pub fn format_report<R: ReportTable + ?Sized>(report: &R, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(report.title());
    output.push('\n');
    output.push_str(&double_separator(WIDTH));
    output.push('\n');
    if let Some(filter) = report.filter() {
        output.push_str(&format!("Period: {}\n", filter));
    }
    output.push('\n');

    let rows = report.rows();
    if rows.is_empty() {
        output.push_str("No records matched.\n");
    } else {
        output.push_str(&format_table(&report.headers(), &rows, currency_symbol));
        output.push('\n');
    }

    for section in report.sections() {
        output.push('\n');
        output.push_str(&section.title);
        output.push('\n');
        output.push_str(&format_table(&section.headers, &section.rows, currency_symbol));
        output.push('\n');
    }

    let totals = report.totals();
    if !totals.is_empty() {
        output.push('\n');
        output.push_str(&separator(WIDTH / 2));
        output.push('\n');
        output.push_str(&format_totals(&totals, currency_symbol));
    }

    let notes = report.notes();
    if !notes.is_empty() {
        output.push('\n');
        for note in notes {
            output.push_str(&format!("Note: {}\n", note));
        }
    }

    output
}
