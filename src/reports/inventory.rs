//! Inventory Report
//!
//! Stock on hand valued at unit cost and at selling price. Unit cost is the
//! total purchase cost over the quantity supplied; products supplied in zero
//! quantity have no unit cost and carry no stock value.

use serde::Serialize;

use crate::models::{Dataset, Money, ProductId};

use super::aggregate::AggregateResult;
use super::filter::ReportFilter;
use super::{Cell, ReportTable};

/// One product line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub quantity_supplied: f64,
    pub quantity_in_stock: f64,
    pub unit_cost: Option<Money>,
    pub selling_price: Money,
    pub unit_margin: Option<Money>,
    pub stock_value: Money,
    pub potential_revenue: Money,
}

/// Inventory Report
#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub filter: ReportFilter,
    pub rows: Vec<InventoryRow>,
    pub total_stock_value: Money,
    pub total_potential_revenue: Money,
    /// Products whose unit cost is undefined
    pub uncosted_count: usize,
    /// Products with nothing left in stock
    pub out_of_stock_count: usize,
}

impl InventoryReport {
    /// Generate an inventory report
    ///
    /// Products are matched by keyword and by supply date; sorted by name.
    pub fn generate(dataset: &Dataset, filter: &ReportFilter) -> Self {
        let mut rows: Vec<InventoryRow> = filter
            .apply(&dataset.products)
            .into_iter()
            .map(|product| InventoryRow {
                product_id: product.id.clone(),
                name: product.name.clone(),
                category: product.category.clone(),
                quantity_supplied: product.quantity_supplied,
                quantity_in_stock: product.quantity_in_stock,
                unit_cost: product.unit_cost(),
                selling_price: product.selling_price,
                unit_margin: product.unit_margin(),
                stock_value: product.stock_value(),
                potential_revenue: product.potential_revenue(),
            })
            .collect();

        rows.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.product_id.cmp(&b.product_id))
        });

        Self {
            filter: filter.clone(),
            total_stock_value: rows.iter().map(|r| r.stock_value).sum(),
            total_potential_revenue: rows.iter().map(|r| r.potential_revenue).sum(),
            uncosted_count: rows.iter().filter(|r| r.unit_cost.is_none()).count(),
            out_of_stock_count: rows.iter().filter(|r| r.quantity_in_stock <= 0.0).count(),
            rows,
        }
    }
}

impl ReportTable for InventoryReport {
    fn title(&self) -> &str {
        "Inventory Report"
    }

    fn filter(&self) -> Option<&ReportFilter> {
        Some(&self.filter)
    }

    fn headers(&self) -> Vec<&'static str> {
        vec![
            "Product",
            "Category",
            "In stock",
            "Unit cost",
            "Price",
            "Margin",
            "Stock value",
            "Potential revenue",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    Cell::text(&row.name),
                    Cell::text(&row.category),
                    Cell::Quantity(row.quantity_in_stock),
                    Cell::OptionalMoney(row.unit_cost),
                    Cell::Money(row.selling_price),
                    Cell::OptionalMoney(row.unit_margin),
                    Cell::Money(row.stock_value),
                    Cell::Money(row.potential_revenue),
                ]
            })
            .collect()
    }

    fn totals(&self) -> AggregateResult {
        AggregateResult::new()
            .with("Stock value", self.total_stock_value)
            .with("Potential revenue", self.total_potential_revenue)
    }

    fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.uncosted_count > 0 {
            notes.push(format!(
                "{} product(s) supplied in zero quantity have no unit cost",
                self.uncosted_count
            ));
        }
        if self.out_of_stock_count > 0 {
            notes.push(format!("{} product(s) out of stock", self.out_of_stock_count));
        }
        notes
    }
}
