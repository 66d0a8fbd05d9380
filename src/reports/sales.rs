//! Sales Report
//!
//! Revenue and units sold per day, ISO week or month, with empty periods
//! filled in, plus the best selling products.

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Bucket, BucketSize, Dataset, Dated, Money, Sale};

use super::aggregate::{sum_field, AggregateResult, ProductCatalog};
use super::filter::ReportFilter;
use super::{Cell, ReportTable, Section};

/// Longest span of periods that is filled in with empty rows
pub const MAX_FILLED_BUCKETS: usize = 5_000;

/// Figures for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesBucketRow {
    pub bucket: Bucket,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Payments received in the period
    pub revenue: Money,
    pub payment_count: usize,
    pub units_sold: f64,
    /// Sum of sale line totals in the period
    pub sales_total: Money,
}

impl SalesBucketRow {
    fn empty(bucket: Bucket) -> Self {
        Self {
            bucket,
            label: bucket.to_string(),
            start: bucket.start_date(),
            end: bucket.end_date(),
            revenue: Money::zero(),
            payment_count: 0,
            units_sold: 0.0,
            sales_total: Money::zero(),
        }
    }
}

/// Units and takings for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSalesRow {
    pub product: String,
    pub units_sold: f64,
    pub sales_total: Money,
    pub sale_count: usize,
}

/// Sales Report
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub filter: ReportFilter,
    pub bucket_size: BucketSize,
    pub buckets: Vec<SalesBucketRow>,
    pub total_revenue: Money,
    pub total_sales: Money,
    pub total_units: f64,
    pub payment_count: usize,
    pub sale_count: usize,
    /// Matching payments and sales with no usable date; counted in the
    /// totals but in no bucket
    pub undated_count: usize,
    /// Empty periods were left out because the span was too long to fill
    pub gaps_omitted: bool,
    /// Best sellers by takings, at most `top` of them
    pub top_products: Vec<ProductSalesRow>,
}

impl SalesReport {
    /// Generate a sales report
    pub fn generate(
        dataset: &Dataset,
        filter: &ReportFilter,
        bucket_size: BucketSize,
        top: usize,
    ) -> Self {
        let payments = filter.apply(&dataset.payments);
        let sales = filter.apply(&dataset.sales);

        let mut populated: BTreeMap<Bucket, SalesBucketRow> = BTreeMap::new();
        let mut undated_count = 0;

        for payment in &payments {
            match payment.date() {
                Some(date) => {
                    let bucket = Bucket::containing(bucket_size, date);
                    let row = populated
                        .entry(bucket)
                        .or_insert_with(|| SalesBucketRow::empty(bucket));
                    row.revenue += payment.total_amount;
                    row.payment_count += 1;
                }
                None => undated_count += 1,
            }
        }

        for sale in &sales {
            match sale.date() {
                Some(date) => {
                    let bucket = Bucket::containing(bucket_size, date);
                    let row = populated
                        .entry(bucket)
                        .or_insert_with(|| SalesBucketRow::empty(bucket));
                    row.units_sold += sale.quantity;
                    row.sales_total += sale.total;
                }
                None => undated_count += 1,
            }
        }

        let (buckets, gaps_omitted) = fill_gaps(populated, filter, bucket_size);

        Self {
            filter: filter.clone(),
            bucket_size,
            buckets,
            total_revenue: sum_field(payments.iter().copied(), |p| Some(p.total_amount)),
            total_sales: sum_field(sales.iter().copied(), |s| Some(s.total)),
            total_units: sales.iter().map(|s| s.quantity).sum(),
            payment_count: payments.len(),
            sale_count: sales.len(),
            undated_count,
            gaps_omitted,
            top_products: rank_products(dataset, sales.iter().copied(), top),
        }
    }
}

/// Every bucket from the start of the range (or the first populated bucket)
/// through the end of the range (or the last populated bucket)
///
/// Spans longer than [`MAX_FILLED_BUCKETS`] keep only the populated buckets;
/// the flag in the result says so.
fn fill_gaps(
    mut populated: BTreeMap<Bucket, SalesBucketRow>,
    filter: &ReportFilter,
    size: BucketSize,
) -> (Vec<SalesBucketRow>, bool) {
    let first = filter
        .range
        .from
        .map(|date| Bucket::containing(size, date))
        .or_else(|| populated.keys().next().copied());
    let last = filter
        .range
        .to
        .map(|date| Bucket::containing(size, date))
        .or_else(|| populated.keys().next_back().copied());

    let (Some(first), Some(last)) = (first, last) else {
        return (Vec::new(), false);
    };

    match Bucket::span(first, last, MAX_FILLED_BUCKETS) {
        Some(span) => {
            let rows = span
                .into_iter()
                .map(|bucket| {
                    populated
                        .remove(&bucket)
                        .unwrap_or_else(|| SalesBucketRow::empty(bucket))
                })
                .collect();
            (rows, false)
        }
        None => {
            warn!(
                "Sales report spans {} to {}; showing populated {} buckets only",
                first, last, size
            );
            (populated.into_values().collect(), true)
        }
    }
}

fn rank_products<'a>(
    dataset: &Dataset,
    sales: impl IntoIterator<Item = &'a Sale>,
    top: usize,
) -> Vec<ProductSalesRow> {
    let catalog = ProductCatalog::new(&dataset.products);
    let mut by_product: BTreeMap<String, ProductSalesRow> = BTreeMap::new();

    for sale in sales {
        let (key, name) = match catalog.product_for(sale) {
            Some(product) => (product.id.to_string(), product.name.clone()),
            None if !sale.product_name.trim().is_empty() => (
                sale.product_name.trim().to_lowercase(),
                sale.product_name.trim().to_string(),
            ),
            None => (String::new(), "(unnamed)".to_string()),
        };

        let row = by_product.entry(key).or_insert_with(|| ProductSalesRow {
            product: name,
            units_sold: 0.0,
            sales_total: Money::zero(),
            sale_count: 0,
        });
        row.units_sold += sale.quantity;
        row.sales_total += sale.total;
        row.sale_count += 1;
    }

    let mut rows: Vec<_> = by_product.into_values().collect();
    rows.sort_by(|a, b| {
        b.sales_total
            .cmp(&a.sales_total)
            .then_with(|| b.units_sold.total_cmp(&a.units_sold))
            .then_with(|| a.product.cmp(&b.product))
    });
    rows.truncate(top);
    rows
}

impl ReportTable for SalesReport {
    fn title(&self) -> &str {
        "Sales Report"
    }

    fn filter(&self) -> Option<&ReportFilter> {
        Some(&self.filter)
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["Period", "Payments", "Revenue", "Units", "Sales"]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.buckets
            .iter()
            .map(|row| {
                vec![
                    Cell::text(&row.label),
                    Cell::Count(row.payment_count),
                    Cell::Money(row.revenue),
                    Cell::Quantity(row.units_sold),
                    Cell::Money(row.sales_total),
                ]
            })
            .collect()
    }

    fn totals(&self) -> AggregateResult {
        AggregateResult::new()
            .with("Revenue", self.total_revenue)
            .with("Sales", self.total_sales)
    }

    fn sections(&self) -> Vec<Section> {
        if self.top_products.is_empty() {
            return Vec::new();
        }

        vec![Section {
            title: "Top products".to_string(),
            headers: vec!["Product", "Sales", "Units", "Takings"],
            rows: self
                .top_products
                .iter()
                .map(|row| {
                    vec![
                        Cell::text(&row.product),
                        Cell::Count(row.sale_count),
                        Cell::Quantity(row.units_sold),
                        Cell::Money(row.sales_total),
                    ]
                })
                .collect(),
        }]
    }

    fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.undated_count > 0 {
            notes.push(format!(
                "{} undated record(s) counted in totals only",
                self.undated_count
            ));
        }
        if self.gaps_omitted {
            notes.push(format!(
                "Periods with no activity omitted: more than {} {}s in range",
                MAX_FILLED_BUCKETS, self.bucket_size
            ));
        }
        notes
    }
}
