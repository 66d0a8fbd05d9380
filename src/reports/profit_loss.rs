//! Profit & Loss Report
//!
//! Revenue from payments, cost of goods sold from sales costed against the
//! product catalog, and operating expenses from the expense ledger.

use serde::Serialize;

use crate::models::{Dataset, Money};

use super::aggregate::{sum_field, AggregateResult, IncomeTotals, ProductCatalog};
use super::expenses::{group_by_category, ExpenseCategoryRow};
use super::filter::ReportFilter;
use super::{Cell, ReportTable};

/// Profit & Loss Report
#[derive(Debug, Clone, Serialize)]
pub struct ProfitAndLossReport {
    pub filter: ReportFilter,
    pub revenue: Money,
    pub cost_of_goods_sold: Money,
    pub gross_profit: Money,
    pub operating_expenses: Money,
    pub net_income: Money,
    /// Gross profit over revenue, `None` when there was no revenue
    pub gross_margin: Option<f64>,
    pub payment_count: usize,
    pub sale_count: usize,
    /// Sales whose product or unit cost could not be found; they add no cost
    pub sales_without_cost: usize,
    pub expenses_by_category: Vec<ExpenseCategoryRow>,
    pub voided_count: usize,
}

impl ProfitAndLossReport {
    /// Generate a profit & loss report
    pub fn generate(dataset: &Dataset, filter: &ReportFilter) -> Self {
        let payments = filter.apply(&dataset.payments);
        let sales = filter.apply(&dataset.sales);
        let expenses = filter.apply(&dataset.expenses);

        let catalog = ProductCatalog::new(&dataset.products);
        let sales_without_cost = sales
            .iter()
            .filter(|sale| catalog.cost_of_sale(sale).is_none())
            .count();

        let totals = IncomeTotals {
            revenue: sum_field(payments.iter().copied(), |p| Some(p.total_amount)),
            cost_of_goods_sold: sum_field(sales.iter().copied(), |s| catalog.cost_of_sale(s)),
            operating_expenses: sum_field(expenses.iter().copied(), |e| {
                e.is_active().then_some(e.amount)
            }),
        };

        Self::from_totals(filter, totals)
            .with_counts(payments.len(), sales.len(), sales_without_cost)
            .with_expense_breakdown(
                group_by_category(expenses.iter().copied()),
                expenses.iter().filter(|e| e.voided).count(),
            )
    }

    /// A report holding only the headline figures
    pub fn from_totals(filter: &ReportFilter, totals: IncomeTotals) -> Self {
        Self {
            filter: filter.clone(),
            revenue: totals.revenue,
            cost_of_goods_sold: totals.cost_of_goods_sold,
            gross_profit: totals.gross_profit(),
            operating_expenses: totals.operating_expenses,
            net_income: totals.net_income(),
            gross_margin: totals.gross_margin(),
            payment_count: 0,
            sale_count: 0,
            sales_without_cost: 0,
            expenses_by_category: Vec::new(),
            voided_count: 0,
        }
    }

    fn with_counts(mut self, payments: usize, sales: usize, without_cost: usize) -> Self {
        self.payment_count = payments;
        self.sale_count = sales;
        self.sales_without_cost = without_cost;
        self
    }

    fn with_expense_breakdown(mut self, rows: Vec<ExpenseCategoryRow>, voided: usize) -> Self {
        self.expenses_by_category = rows;
        self.voided_count = voided;
        self
    }

    pub fn income_totals(&self) -> IncomeTotals {
        IncomeTotals {
            revenue: self.revenue,
            cost_of_goods_sold: self.cost_of_goods_sold,
            operating_expenses: self.operating_expenses,
        }
    }
}

impl ReportTable for ProfitAndLossReport {
    fn title(&self) -> &str {
        "Profit & Loss"
    }

    fn filter(&self) -> Option<&ReportFilter> {
        Some(&self.filter)
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["Line", "Amount", "Share"]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        let share = |amount: Money| Cell::Percent(amount.percent_of(self.revenue));

        let mut rows = vec![
            vec![Cell::text("Revenue"), Cell::Money(self.revenue), share(self.revenue)],
            vec![
                Cell::text("Cost of goods sold"),
                Cell::Money(self.cost_of_goods_sold),
                share(self.cost_of_goods_sold),
            ],
            vec![
                Cell::text("Gross profit"),
                Cell::Money(self.gross_profit),
                Cell::Percent(self.gross_margin),
            ],
        ];

        for row in &self.expenses_by_category {
            rows.push(vec![
                Cell::text(format!("  {}", row.category)),
                Cell::Money(row.total),
                share(row.total),
            ]);
        }

        rows.push(vec![
            Cell::text("Operating expenses"),
            Cell::Money(self.operating_expenses),
            share(self.operating_expenses),
        ]);
        rows.push(vec![
            Cell::text("Net income"),
            Cell::Money(self.net_income),
            share(self.net_income),
        ]);
        rows
    }

    fn totals(&self) -> AggregateResult {
        AggregateResult::new()
            .with("Revenue", self.revenue)
            .with("Cost of goods sold", self.cost_of_goods_sold)
            .with("Gross profit", self.gross_profit)
            .with("Operating expenses", self.operating_expenses)
            .with("Net income", self.net_income)
    }

    fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.sales_without_cost > 0 {
            notes.push(format!(
                "{} of {} sale(s) had no product cost and add nothing to cost of goods sold",
                self.sales_without_cost, self.sale_count
            ));
        }
        if self.voided_count > 0 {
            notes.push(format!("{} voided expense(s) excluded", self.voided_count));
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, Expense, Payment, Product, Sale};
    use chrono::NaiveDate;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    fn d(month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, month, day)
    }

    fn dataset() -> Dataset {
        let mut data = Dataset::new();
        data.payments = vec![
            Payment::new("p1", d(1, 5), m(100000)),
            Payment::new("p2", d(1, 20), m(50000)),
            Payment::new("p3", d(2, 2), m(25000)),
        ];
        data.products = vec![
            Product::new("prod-1", "Exercise Book", m(20000), 100.0),
            Product::new("prod-2", "Pen", m(5000), 0.0),
        ];
        data.sales = vec![
            Sale::new("s1", d(1, 5), "Exercise Book", 10.0, m(500)).with_product_id("prod-1"),
            Sale::new("s2", d(1, 6), "exercise book", 5.0, m(500)),
            Sale::new("s3", d(1, 7), "Pen", 4.0, m(100)),
        ];
        data.expenses = vec![
            Expense::new("e1", d(1, 10), m(30000)).with_category("Rent"),
            Expense::new("e2", d(1, 11), m(7500)).with_category("Utilities"),
            Expense::new("e3", d(1, 12), m(90000)).with_category("Rent").voided(),
        ];
        data
    }

    #[test]
    fn test_derived_totals() {
        let report = ProfitAndLossReport::generate(&dataset(), &ReportFilter::all());

        assert_eq!(report.revenue, m(175000));
        // 15 books at 200.00 / 100 units
        assert_eq!(report.cost_of_goods_sold, m(3000));
        assert_eq!(report.gross_profit, report.revenue - report.cost_of_goods_sold);
        assert_eq!(report.operating_expenses, m(37500));
        assert_eq!(report.net_income, report.gross_profit - report.operating_expenses);
        assert_eq!(report.net_income, m(134500));
    }

    #[test]
    fn test_zero_quantity_supplied_contributes_no_cost() {
        let report = ProfitAndLossReport::generate(&dataset(), &ReportFilter::all());
        assert_eq!(report.sale_count, 3);
        assert_eq!(report.sales_without_cost, 1);
        assert_eq!(report.notes().len(), 2);
    }

    #[test]
    fn test_voided_expense_is_skipped() {
        let report = ProfitAndLossReport::generate(&dataset(), &ReportFilter::all());
        assert_eq!(report.voided_count, 1);
        let rent = report
            .expenses_by_category
            .iter()
            .find(|row| row.category == "Rent")
            .unwrap();
        assert_eq!(rent.total, m(30000));
    }

    #[test]
    fn test_date_range_restricts_every_collection() {
        let filter = ReportFilter::all().with_range(DateRange::new(d(2, 1), d(2, 28)));
        let report = ProfitAndLossReport::generate(&dataset(), &filter);
        assert_eq!(report.revenue, m(25000));
        assert_eq!(report.cost_of_goods_sold, Money::zero());
        assert_eq!(report.operating_expenses, Money::zero());
        assert_eq!(report.net_income, m(25000));
    }

    #[test]
    fn test_empty_dataset_has_no_margin() {
        let report = ProfitAndLossReport::generate(&Dataset::new(), &ReportFilter::all());
        assert_eq!(report.revenue, Money::zero());
        assert_eq!(report.net_income, Money::zero());
        assert_eq!(report.gross_margin, None);
        assert!(report.notes().is_empty());
    }

    #[test]
    fn test_totals_follow_rows() {
        let report = ProfitAndLossReport::generate(&dataset(), &ReportFilter::all());
        let totals = report.totals();
        assert_eq!(totals.get("Net income"), Some(report.net_income));
        assert_eq!(report.income_totals().net_income(), report.net_income);
        // Revenue, COGS, gross profit, two categories, opex, net income
        assert_eq!(report.rows().len(), 7);
    }
}
