//! Balance Sheet Report
//!
//! Assets and liabilities are positions held at a point in time, so only the
//! end of the date range applies to them and undated positions are always
//! included. Equity is derived as assets − liabilities and, when owner equity
//! entries exist, cross-checked against contributions − drawings + net income.
//! A keyword narrows the positions only, so the cross-check is skipped then.

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use crate::models::{Dataset, DateRange, Dated, Money};

use super::aggregate::{equity, sum_field, AggregateResult};
use super::filter::ReportFilter;
use super::profit_loss::ProfitAndLossReport;
use super::{Cell, ReportTable};

/// One asset or liability line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionRow {
    pub name: String,
    pub category: String,
    pub amount: Money,
}

/// Balance Sheet Report
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetReport {
    pub filter: ReportFilter,
    /// Positions dated after this are left out
    pub as_of: Option<NaiveDate>,
    pub assets: Vec<PositionRow>,
    pub liabilities: Vec<PositionRow>,
    pub total_assets: Money,
    pub total_liabilities: Money,
    /// total_assets − total_liabilities
    pub equity: Money,
    /// contributions − drawings + net income, when equity entries exist
    /// and no keyword narrows the positions
    pub direct_equity: Option<Money>,
    /// equity − direct_equity, set only when it exceeds the tolerance
    pub equity_discrepancy: Option<Money>,
}

/// Records held on `as_of`: dated no later than it, or undated
fn held_on<'a, T, I>(records: I, as_of: Option<NaiveDate>) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|record| match (as_of, record.date()) {
            (Some(limit), Some(date)) => date <= limit,
            _ => true,
        })
        .collect()
}

impl BalanceSheetReport {
    /// Generate a balance sheet
    ///
    /// A gap between derived and direct equity larger than `tolerance` is
    /// logged as a warning and recorded on the report; it never fails.
    pub fn generate(dataset: &Dataset, filter: &ReportFilter, tolerance: Money) -> Self {
        let as_of = filter.range.to;

        let assets = held_on(filter.apply_keyword(&dataset.assets), as_of);
        let liabilities = held_on(filter.apply_keyword(&dataset.liabilities), as_of);

        let total_assets = sum_field(assets.iter().copied(), |a| Some(a.value));
        let total_liabilities = sum_field(liabilities.iter().copied(), |l| Some(l.balance));
        let derived = equity(total_assets, total_liabilities);

        let partial = !filter.keyword().trim().is_empty();
        let direct_equity = if partial {
            None
        } else {
            Self::direct_equity(dataset, as_of)
        };
        let equity_discrepancy = direct_equity
            .map(|direct| derived - direct)
            .filter(|gap| gap.abs() > tolerance.abs());

        if let (Some(gap), Some(direct)) = (equity_discrepancy, direct_equity) {
            warn!(
                "Balance sheet does not balance: assets - liabilities = {} but contributions - drawings + net income = {} (off by {})",
                derived, direct, gap
            );
        }

        Self {
            filter: filter.clone(),
            as_of,
            assets: assets
                .iter()
                .map(|a| PositionRow {
                    name: a.name.clone(),
                    category: a.category.clone(),
                    amount: a.value,
                })
                .collect(),
            liabilities: liabilities
                .iter()
                .map(|l| PositionRow {
                    name: l.name.clone(),
                    category: String::new(),
                    amount: l.balance,
                })
                .collect(),
            total_assets,
            total_liabilities,
            equity: derived,
            direct_equity,
            equity_discrepancy,
        }
    }

    /// Owner equity built up from its sources, through `as_of`
    fn direct_equity(dataset: &Dataset, as_of: Option<NaiveDate>) -> Option<Money> {
        if dataset.equity.is_empty() {
            return None;
        }

        let entries = held_on(&dataset.equity, as_of);
        let owner_equity = sum_field(entries.iter().copied(), |e| Some(e.signed_amount()));

        let earnings_filter = ReportFilter::all().with_range(DateRange::new(None, as_of));
        let net_income = ProfitAndLossReport::generate(dataset, &earnings_filter).net_income;

        Some(owner_equity + net_income)
    }

    pub fn is_balanced(&self) -> bool {
        self.equity_discrepancy.is_none()
    }
}

impl ReportTable for BalanceSheetReport {
    fn title(&self) -> &str {
        "Balance Sheet"
    }

    fn filter(&self) -> Option<&ReportFilter> {
        Some(&self.filter)
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["Section", "Name", "Category", "Amount"]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        let section = |label: &'static str, rows: &[PositionRow]| {
            rows.iter()
                .map(move |row| {
                    vec![
                        Cell::text(label),
                        Cell::text(&row.name),
                        Cell::text(&row.category),
                        Cell::Money(row.amount),
                    ]
                })
                .collect::<Vec<_>>()
        };

        let mut rows = section("Asset", &self.assets);
        rows.extend(section("Liability", &self.liabilities));
        rows
    }

    fn totals(&self) -> AggregateResult {
        let mut totals = AggregateResult::new()
            .with("Total assets", self.total_assets)
            .with("Total liabilities", self.total_liabilities)
            .with("Equity", self.equity);
        if let Some(direct) = self.direct_equity {
            totals.push("Contributions - drawings + net income", direct);
        }
        totals
    }

    fn notes(&self) -> Vec<String> {
        if let Some(gap) = self.equity_discrepancy {
            return vec![format!("Equity does not reconcile: off by {}", gap)];
        }
        if !self.filter.keyword().trim().is_empty() {
            return vec!["Equity covers matching positions only; not reconciled".to_string()];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, Collection, EquityEntry, EquityKind, Liability, Payment, Record};
    use crate::services::ingest::{ingest_dataset, RawCollections};
    use serde_json::json;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    fn docs(values: Vec<serde_json::Value>) -> Vec<Record> {
        values.into_iter().filter_map(Record::from_json).collect()
    }

    #[test]
    fn test_equity_from_raw_documents() {
        let mut raw = RawCollections::new();
        raw.insert(
            Collection::Assets,
            docs(vec![json!({"marketValue": 200}), json!({"amount": 50})]),
        );
        raw.insert(Collection::Liabilities, docs(vec![json!({"loanBalance": 80})]));
        let (dataset, _) = ingest_dataset(&raw);

        let report = BalanceSheetReport::generate(&dataset, &ReportFilter::all(), Money::zero());
        assert_eq!(report.total_assets, m(25000));
        assert_eq!(report.total_liabilities, m(8000));
        assert_eq!(report.equity, m(17000));
        assert_eq!(report.direct_equity, None);
        assert!(report.is_balanced());
    }

    #[test]
    fn test_mismatch_is_reported_not_fatal() {
        let mut data = Dataset::new();
        data.assets = vec![Asset::new("a1", "Cash", m(100000))];
        data.liabilities = vec![Liability::new("l1", "Loan", m(20000))];
        data.equity = vec![EquityEntry::new("q1", EquityKind::Contribution, m(50000))];

        let report = BalanceSheetReport::generate(&data, &ReportFilter::all(), m(100));
        assert_eq!(report.equity, m(80000));
        assert_eq!(report.direct_equity, Some(m(50000)));
        assert_eq!(report.equity_discrepancy, Some(m(30000)));
        assert!(!report.is_balanced());
        assert_eq!(report.notes().len(), 1);
    }

    #[test]
    fn test_reconciles_with_net_income() {
        let mut data = Dataset::new();
        data.assets = vec![Asset::new("a1", "Cash", m(80000))];
        data.payments = vec![Payment::new("p1", None, m(30000))];
        data.equity = vec![
            EquityEntry::new("q1", EquityKind::Contribution, m(60000)),
            EquityEntry::new("q2", EquityKind::Drawing, m(10000)),
        ];

        let report = BalanceSheetReport::generate(&data, &ReportFilter::all(), Money::zero());
        assert_eq!(report.direct_equity, Some(m(80000)));
        assert!(report.is_balanced());
    }

    #[test]
    fn test_within_tolerance_is_balanced() {
        let mut data = Dataset::new();
        data.assets = vec![Asset::new("a1", "Cash", m(50050))];
        data.equity = vec![EquityEntry::new("q1", EquityKind::Contribution, m(50000))];

        let report = BalanceSheetReport::generate(&data, &ReportFilter::all(), m(100));
        assert!(report.is_balanced());
    }

    #[test]
    fn test_positions_after_as_of_are_left_out() {
        let mut data = Dataset::new();
        let mut later = Asset::new("a2", "Van", m(300000));
        later.date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let mut earlier = Asset::new("a1", "Desk", m(20000));
        earlier.date = NaiveDate::from_ymd_opt(2025, 1, 1);
        data.assets = vec![earlier, later, Asset::new("a3", "Land", m(1000))];

        let filter =
            ReportFilter::all().with_range(DateRange::new(None, NaiveDate::from_ymd_opt(2025, 3, 31)));
        let report = BalanceSheetReport::generate(&data, &filter, Money::zero());
        assert_eq!(report.assets.len(), 2);
        assert_eq!(report.total_assets, m(21000));
    }

    #[test]
    fn test_keyword_filters_positions() {
        let mut data = Dataset::new();
        data.assets = vec![
            Asset::new("a1", "School Bus", m(500000)),
            Asset::new("a2", "Printer", m(30000)),
        ];
        let report = BalanceSheetReport::generate(
            &data,
            &ReportFilter::all().with_keyword("bus"),
            Money::zero(),
        );
        assert_eq!(report.total_assets, m(500000));
    }

    #[test]
    fn test_keyword_skips_equity_cross_check() {
        let mut data = Dataset::new();
        data.assets = vec![
            Asset::new("a1", "Cash", m(50000)),
            Asset::new("a2", "School Bus", m(30000)),
        ];
        data.equity = vec![EquityEntry::new("q1", EquityKind::Contribution, m(80000))];

        let whole = BalanceSheetReport::generate(&data, &ReportFilter::all(), Money::zero());
        assert_eq!(whole.direct_equity, Some(m(80000)));
        assert!(whole.is_balanced());
        assert!(whole.notes().is_empty());

        let narrowed = BalanceSheetReport::generate(
            &data,
            &ReportFilter::all().with_keyword("bus"),
            Money::zero(),
        );
        assert_eq!(narrowed.equity, m(30000));
        assert_eq!(narrowed.direct_equity, None);
        assert_eq!(narrowed.equity_discrepancy, None);
        assert!(narrowed.is_balanced());
        assert!(narrowed.notes()[0].contains("not reconciled"));
    }
}
