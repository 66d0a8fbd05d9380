//! Payment model
//!
//! A payment is money received at the point of sale or against a school fee
//! invoice. Payments are the revenue side of every report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::PaymentId;
use super::money::Money;
use super::traits::{Dated, Searchable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,

    /// When the payment was received; `None` when the document has no usable date
    pub date: Option<NaiveDate>,

    /// Amount received
    pub total_amount: Money,

    #[serde(default)]
    pub customer: String,

    /// Cash, card, mobile money, ...
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub reference: String,
}

impl Payment {
    pub fn new(id: impl Into<PaymentId>, date: Option<NaiveDate>, total_amount: Money) -> Self {
        Self {
            id: id.into(),
            date,
            total_amount,
            customer: String::new(),
            method: String::new(),
            reference: String::new(),
        }
    }
}

impl Dated for Payment {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.customer.as_str(),
            self.method.as_str(),
            self.reference.as_str(),
            self.id.as_str(),
        ]
    }
}
