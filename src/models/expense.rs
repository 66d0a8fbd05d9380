//! Expense model
//!
//! Operating expenses. A voided expense stays in the collection for audit
//! display but never contributes to a total.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::ExpenseId;
use super::money::Money;
use super::traits::{Dated, Searchable};

/// Category used when an expense document has none
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: Option<NaiveDate>,
    pub amount: Money,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub voided: bool,
}

impl Expense {
    pub fn new(id: impl Into<ExpenseId>, date: Option<NaiveDate>, amount: Money) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            category: String::new(),
            description: String::new(),
            voided: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn voided(mut self) -> Self {
        self.voided = true;
        self
    }

    /// Whether the expense counts toward totals
    pub fn is_active(&self) -> bool {
        !self.voided
    }

    /// Category for grouping, never empty
    pub fn category_label(&self) -> &str {
        if self.category.trim().is_empty() {
            UNCATEGORIZED
        } else {
            self.category.trim()
        }
    }
}

impl Dated for Expense {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Searchable for Expense {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.category.as_str(), self.description.as_str()]
    }
}
