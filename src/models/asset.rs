//! Asset and liability models for the balance sheet

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{AssetId, LiabilityId};
use super::money::Money;
use super::traits::{Dated, Searchable};

/// Something the organization owns: equipment, vehicles, cash at bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    /// Market value when recorded, else the recorded amount or purchase price
    pub value: Money,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, value: Money) -> Self {
        Self {
            id: id.into(),
            date: None,
            name: name.into(),
            category: String::new(),
            value,
        }
    }
}

impl Dated for Asset {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Searchable for Asset {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category.as_str()]
    }
}

/// Something the organization owes: loans, supplier credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liability {
    pub id: LiabilityId,
    pub date: Option<NaiveDate>,

    /// Lender or liability name
    #[serde(default)]
    pub name: String,

    /// Outstanding balance
    pub balance: Money,
}

impl Liability {
    pub fn new(id: impl Into<LiabilityId>, name: impl Into<String>, balance: Money) -> Self {
        Self {
            id: id.into(),
            date: None,
            name: name.into(),
            balance,
        }
    }
}

impl Dated for Liability {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Searchable for Liability {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}
