//! The set of collections a report is computed from
//!
//! A [`Dataset`] is owned by the caller and passed by reference into report
//! generation; reports never hold on to it or mutate it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::asset::{Asset, Liability};
use super::equity::EquityEntry;
use super::expense::Expense;
use super::payment::Payment;
use super::product::Product;
use super::sale::Sale;

/// Remote collections the reports consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Payments,
    Sales,
    Expenses,
    Assets,
    Liabilities,
    Products,
    Equity,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Payments,
        Collection::Sales,
        Collection::Expenses,
        Collection::Assets,
        Collection::Liabilities,
        Collection::Products,
        Collection::Equity,
    ];

    /// Name used for the snapshot file and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Payments => "payments",
            Self::Sales => "sales",
            Self::Expenses => "expenses",
            Self::Assets => "assets",
            Self::Liabilities => "liabilities",
            Self::Products => "products",
            Self::Equity => "equity",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted || c.name().trim_end_matches('s') == wanted)
            .ok_or_else(|| format!("unknown collection '{}'", s))
    }
}

/// Typed records for every collection, ready for reporting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub liabilities: Vec<Liability>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub equity: Vec<EquityEntry>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held for a collection
    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Payments => self.payments.len(),
            Collection::Sales => self.sales.len(),
            Collection::Expenses => self.expenses.len(),
            Collection::Assets => self.assets.len(),
            Collection::Liabilities => self.liabilities.len(),
            Collection::Products => self.products.len(),
            Collection::Equity => self.equity.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Collection::ALL.iter().all(|c| self.count(*c) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_parse() {
        assert_eq!("payments".parse::<Collection>().unwrap(), Collection::Payments);
        assert_eq!("Product".parse::<Collection>().unwrap(), Collection::Products);
        assert_eq!("equity".parse::<Collection>().unwrap(), Collection::Equity);
        assert!("students".parse::<Collection>().is_err());
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::new();
        assert!(dataset.is_empty());
        assert_eq!(dataset.count(Collection::Sales), 0);
    }
}
