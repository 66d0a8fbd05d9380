//! Owner equity entries
//!
//! Contributions and drawings recorded directly against equity. Together with
//! net income they give the "direct" equity figure the balance sheet checks
//! against assets minus liabilities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EquityEntryId;
use super::money::Money;
use super::traits::{Dated, Searchable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquityKind {
    /// Capital put into the organization
    #[default]
    Contribution,
    /// Capital taken out by the owners
    Drawing,
}

impl EquityKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contribution" | "capital" | "investment" | "deposit" => Some(Self::Contribution),
            "drawing" | "drawings" | "withdrawal" | "dividend" => Some(Self::Drawing),
            _ => None,
        }
    }
}

impl fmt::Display for EquityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contribution => write!(f, "Contribution"),
            Self::Drawing => write!(f, "Drawing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityEntry {
    pub id: EquityEntryId,
    pub date: Option<NaiveDate>,

    /// Always non-negative; the sign comes from `kind`
    pub amount: Money,

    #[serde(default)]
    pub kind: EquityKind,

    #[serde(default)]
    pub description: String,
}

impl EquityEntry {
    pub fn new(id: impl Into<EquityEntryId>, kind: EquityKind, amount: Money) -> Self {
        Self {
            id: id.into(),
            date: None,
            amount: amount.abs(),
            kind,
            description: String::new(),
        }
    }

    /// Effect on equity: positive for contributions, negative for drawings
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EquityKind::Contribution => self.amount,
            EquityKind::Drawing => -self.amount,
        }
    }
}

impl Dated for EquityEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Searchable for EquityEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_amount() {
        let capital = EquityEntry::new("q1", EquityKind::Contribution, Money::from_cents(500));
        let drawing = EquityEntry::new("q2", EquityKind::Drawing, Money::from_cents(-200));
        assert_eq!(capital.signed_amount().cents(), 500);
        assert_eq!(drawing.signed_amount().cents(), -200);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(EquityKind::parse("Capital"), Some(EquityKind::Contribution));
        assert_eq!(EquityKind::parse("withdrawal"), Some(EquityKind::Drawing));
        assert_eq!(EquityKind::parse("loan"), None);
    }
}
