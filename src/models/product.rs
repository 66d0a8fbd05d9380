//! Product model
//!
//! Inventory items. Unit cost is derived from the total purchase cost of a
//! delivery and the quantity supplied, and is undefined when nothing was
//! supplied.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::ProductId;
use super::money::Money;
use super::traits::{Dated, Searchable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    /// Total cost paid for the supplied quantity
    pub cost: Money,

    pub quantity_supplied: f64,

    pub quantity_in_stock: f64,

    pub selling_price: Money,

    /// Date the stock was supplied
    pub date: Option<NaiveDate>,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        cost: Money,
        quantity_supplied: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            cost,
            quantity_supplied,
            quantity_in_stock: quantity_supplied,
            selling_price: Money::zero(),
            date: None,
        }
    }

    pub fn with_selling_price(mut self, price: Money) -> Self {
        self.selling_price = price;
        self
    }

    pub fn with_stock(mut self, quantity_in_stock: f64) -> Self {
        self.quantity_in_stock = quantity_in_stock;
        self
    }

    /// Cost of one unit, `None` when no quantity was supplied
    pub fn unit_cost(&self) -> Option<Money> {
        self.cost.per_unit(self.quantity_supplied)
    }

    /// Value of the remaining stock at cost (zero when unit cost is undefined)
    pub fn stock_value(&self) -> Money {
        self.unit_cost()
            .map(|unit| unit.times(self.quantity_in_stock))
            .unwrap_or_default()
    }

    /// Revenue if the remaining stock sold at the listed price
    pub fn potential_revenue(&self) -> Money {
        self.selling_price.times(self.quantity_in_stock)
    }

    /// Selling price minus unit cost
    pub fn unit_margin(&self) -> Option<Money> {
        self.unit_cost().map(|unit| self.selling_price - unit)
    }

    /// Whether `name` refers to this product (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        !name.trim().is_empty() && self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

impl Dated for Product {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category.as_str(), self.id.as_str()]
    }
}
