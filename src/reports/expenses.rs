//! Expense Report
//!
//! Operating expenses by category for a filtered period. Voided expenses are
//! listed separately and never counted.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Dataset, Expense, Money};

use super::aggregate::{sum_field, AggregateResult};
use super::filter::ReportFilter;
use super::{Cell, ReportTable};

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseCategoryRow {
    pub category: String,
    pub total: Money,
    /// Number of active expenses
    pub count: usize,
    /// Share of all active expenses, `None` when that total is zero
    pub percentage: Option<f64>,
}

/// Group active expenses by category, largest total first
///
/// Category names are matched ignoring case; the first spelling seen is kept.
pub fn group_by_category<'a, I>(expenses: I) -> Vec<ExpenseCategoryRow>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut groups: BTreeMap<String, ExpenseCategoryRow> = BTreeMap::new();

    for expense in expenses.into_iter().filter(|e| e.is_active()) {
        let label = expense.category_label();
        let row = groups
            .entry(label.to_lowercase())
            .or_insert_with(|| ExpenseCategoryRow {
                category: label.to_string(),
                total: Money::zero(),
                count: 0,
                percentage: None,
            });
        row.total += expense.amount;
        row.count += 1;
    }

    let grand_total: Money = groups.values().map(|row| row.total).sum();
    let mut rows: Vec<_> = groups
        .into_values()
        .map(|mut row| {
            row.percentage = row.total.percent_of(grand_total);
            row
        })
        .collect();

    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    rows
}

/// Expense Report
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReport {
    pub filter: ReportFilter,
    pub categories: Vec<ExpenseCategoryRow>,
    /// Sum of active expenses
    pub total: Money,
    pub count: usize,
    /// Voided expenses that matched the filter
    pub voided: Vec<Expense>,
    pub voided_total: Money,
}

impl ExpenseReport {
    /// Generate an expense report
    pub fn generate(dataset: &Dataset, filter: &ReportFilter) -> Self {
        let expenses = filter.apply(&dataset.expenses);

        let categories = group_by_category(expenses.iter().copied());
        let total = sum_field(expenses.iter().copied(), |e| e.is_active().then_some(e.amount));
        let count = expenses.iter().filter(|e| e.is_active()).count();

        let voided: Vec<Expense> = expenses
            .iter()
            .filter(|e| e.voided)
            .map(|e| (*e).clone())
            .collect();
        let voided_total = sum_field(&voided, |e| Some(e.amount));

        Self {
            filter: filter.clone(),
            categories,
            total,
            count,
            voided,
            voided_total,
        }
    }
}

impl ReportTable for ExpenseReport {
    fn title(&self) -> &str {
        "Expense Report"
    }

    fn filter(&self) -> Option<&ReportFilter> {
        Some(&self.filter)
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["Category", "Expenses", "Total", "Share"]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.categories
            .iter()
            .map(|row| {
                vec![
                    Cell::text(&row.category),
                    Cell::Count(row.count),
                    Cell::Money(row.total),
                    Cell::Percent(row.percentage),
                ]
            })
            .collect()
    }

    fn totals(&self) -> AggregateResult {
        AggregateResult::new()
            .with("Total expenses", self.total)
            .with("Voided (excluded)", self.voided_total)
    }

    fn notes(&self) -> Vec<String> {
        match self.voided.len() {
            0 => Vec::new(),
            n => vec![format!("{} voided expense(s) excluded", n)],
        }
    }
}
