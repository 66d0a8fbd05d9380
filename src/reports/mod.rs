//! Reports module for Backoffice
//!
//! Filtering and summation primitives, and the financial views built on them:
//! profit & loss, balance sheet, sales, inventory and expenses. Every report
//! is computed from a caller-supplied [`Dataset`](crate::models::Dataset) and
//! exposes the same tabular shape through [`ReportTable`], which the terminal
//! renderer and the exporters consume.

pub mod aggregate;
pub mod balance_sheet;
pub mod expenses;
pub mod filter;
pub mod inventory;
pub mod profit_loss;
pub mod sales;

pub use aggregate::{
    equity, gross_profit, net_income, sum_field, sum_record_field, AggregateResult, IncomeTotals,
    ProductCatalog, Total,
};
pub use balance_sheet::{BalanceSheetReport, PositionRow};
pub use expenses::{ExpenseCategoryRow, ExpenseReport};
pub use filter::{filter_by_date_range, filter_by_keyword, filter_by_range, ReportFilter};
pub use inventory::{InventoryReport, InventoryRow};
pub use profit_loss::ProfitAndLossReport;
pub use sales::{ProductSalesRow, SalesBucketRow, SalesReport};

use chrono::NaiveDate;

use crate::models::Money;

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Money(Money),
    /// A money amount that may be undefined, e.g. unit cost
    OptionalMoney(Option<Money>),
    Count(usize),
    Quantity(f64),
    Percent(Option<f64>),
    Date(Option<NaiveDate>),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Machine-readable form for CSV: no symbols, empty when undefined
    pub fn plain(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Money(amount) => format_decimal(*amount),
            Self::OptionalMoney(amount) => amount.map(format_decimal).unwrap_or_default(),
            Self::Count(n) => n.to_string(),
            Self::Quantity(q) => format_quantity(*q),
            Self::Percent(pct) => pct.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            Self::Date(date) => date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }

    /// Whether the cell holds a number (right-aligned in tables)
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_) | Self::Date(_))
    }
}

fn format_decimal(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.dollars().abs(), amount.cents_part())
}

fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        format!("{:.2}", quantity)
    }
}

/// An extra titled table some reports carry below their main table
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// The tabular shape shared by every report
pub trait ReportTable {
    fn title(&self) -> &str;

    /// The filter the report was computed under, if it takes one
    fn filter(&self) -> Option<&ReportFilter> {
        None
    }

    fn headers(&self) -> Vec<&'static str>;

    fn rows(&self) -> Vec<Vec<Cell>>;

    /// Summary figures shown below the table
    fn totals(&self) -> AggregateResult;

    fn sections(&self) -> Vec<Section> {
        Vec::new()
    }

    /// Warnings and caveats worth showing with the report
    fn notes(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_forms() {
        let amount = Cell::Money(Money::from_cents(-123456));
        assert_eq!(amount.plain(), "-1234.56");

        let small = Cell::Money(Money::from_cents(-5));
        assert_eq!(small.plain(), "-0.05");

        assert_eq!(Cell::OptionalMoney(None).plain(), "");
        assert_eq!(Cell::Percent(Some(12.5)).plain(), "12.50");
        assert_eq!(Cell::Quantity(3.0).plain(), "3");
        assert_eq!(Cell::Quantity(2.5).plain(), "2.50");
        assert!(Cell::Count(1).is_numeric());
        assert!(!Cell::text("x").is_numeric());
    }
}
