//! Sale model
//!
//! One line of a point-of-sale transaction: a quantity of one product sold at
//! a unit price. Revenue is taken from payments; sales drive cost of goods
//! sold and unit counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{ProductId, SaleId};
use super::money::Money;
use super::traits::{Dated, Searchable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub date: Option<NaiveDate>,

    /// Reference to the product document, when the sale recorded one
    pub product_id: Option<ProductId>,

    /// Product name as shown on the receipt
    #[serde(default)]
    pub product_name: String,

    /// Units sold (may be fractional for goods sold by weight)
    pub quantity: f64,

    pub unit_price: Money,

    /// Line total; `quantity * unit_price` when the document has no total
    pub total: Money,

    #[serde(default)]
    pub customer: String,
}

impl Sale {
    pub fn new(
        id: impl Into<SaleId>,
        date: Option<NaiveDate>,
        product_name: impl Into<String>,
        quantity: f64,
        unit_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            product_id: None,
            product_name: product_name.into(),
            quantity,
            unit_price,
            total: unit_price.times(quantity),
            customer: String::new(),
        }
    }

    pub fn with_product_id(mut self, product_id: impl Into<ProductId>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }
}

impl Dated for Sale {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Searchable for Sale {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.product_name.as_str(), self.customer.as_str()];
        if let Some(product_id) = &self.product_id {
            fields.push(product_id.as_str());
        }
        fields
    }
}
