//! Summation and derived totals
//!
//! Amounts are summed in integer cents. A missing or unreadable value
//! contributes zero; it never aborts a sum.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Money, Product, ProductId, Record, Sale};

/// Sum one field over typed records
///
/// `selector` returns `None` for a record whose value is absent; such records
/// add nothing.
pub fn sum_field<'a, T, I, F>(records: I, selector: F) -> Money
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<Money>,
{
    records
        .into_iter()
        .map(|record| selector(record).unwrap_or_default())
        .sum()
}

/// Sum a named field over raw documents
///
/// Numbers, numeric strings and currency-formatted strings are read; anything
/// else counts as zero.
pub fn sum_record_field<'a, I>(records: I, field: &str) -> Money
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|record| record.number(field))
        .filter_map(Money::from_f64)
        .sum()
}

/// revenue − cost of goods sold
pub fn gross_profit(revenue: Money, cost_of_goods_sold: Money) -> Money {
    revenue - cost_of_goods_sold
}

/// gross profit − operating expenses
pub fn net_income(gross_profit: Money, operating_expenses: Money) -> Money {
    gross_profit - operating_expenses
}

/// assets − liabilities
pub fn equity(total_assets: Money, total_liabilities: Money) -> Money {
    total_assets - total_liabilities
}

/// The income statement inputs and the figures derived from them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTotals {
    pub revenue: Money,
    pub cost_of_goods_sold: Money,
    pub operating_expenses: Money,
}

impl IncomeTotals {
    pub fn gross_profit(&self) -> Money {
        gross_profit(self.revenue, self.cost_of_goods_sold)
    }

    pub fn net_income(&self) -> Money {
        net_income(self.gross_profit(), self.operating_expenses)
    }

    /// Gross profit as a percentage of revenue, `None` without revenue
    pub fn gross_margin(&self) -> Option<f64> {
        self.gross_profit().percent_of(self.revenue)
    }
}

/// A named total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Total {
    pub name: String,
    pub amount: Money,
}

/// An ordered set of named totals, the summary block of every report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult {
    totals: Vec<Total>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a total; a later total with the same name replaces the earlier one
    pub fn push(&mut self, name: impl Into<String>, amount: Money) {
        let name = name.into();
        match self.totals.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.amount = amount,
            None => self.totals.push(Total { name, amount }),
        }
    }

    pub fn with(mut self, name: impl Into<String>, amount: Money) -> Self {
        self.push(name, amount);
        self
    }

    pub fn get(&self, name: &str) -> Option<Money> {
        self.totals.iter().find(|t| t.name == name).map(|t| t.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Total> {
        self.totals.iter()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Product lookup used to cost sales
///
/// A sale is matched by product id first, then by product name ignoring case.
pub struct ProductCatalog<'a> {
    by_id: HashMap<&'a str, &'a Product>,
    by_name: HashMap<String, &'a Product>,
}

impl<'a> ProductCatalog<'a> {
    pub fn new(products: &'a [Product]) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_name = HashMap::with_capacity(products.len());

        for product in products {
            by_id.insert(product.id.as_str(), product);
            let name = product.name.trim().to_lowercase();
            if !name.is_empty() {
                // First product with a given name wins
                by_name.entry(name).or_insert(product);
            }
        }

        Self { by_id, by_name }
    }

    pub fn get(&self, id: &ProductId) -> Option<&'a Product> {
        self.by_id.get(id.as_str()).copied()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&'a Product> {
        self.by_name.get(&name.trim().to_lowercase()).copied()
    }

    /// The product a sale refers to
    pub fn product_for(&self, sale: &Sale) -> Option<&'a Product> {
        sale.product_id
            .as_ref()
            .and_then(|id| self.get(id))
            .or_else(|| self.find_by_name(&sale.product_name))
    }

    /// quantity × unit cost; `None` when the product or its unit cost is unknown
    pub fn cost_of_sale(&self, sale: &Sale) -> Option<Money> {
        self.product_for(sale)
            .and_then(Product::unit_cost)
            .map(|unit| unit.times(sale.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, Payment};
    use serde_json::json;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_sum_field_empty_is_zero() {
        let payments: Vec<Payment> = Vec::new();
        assert_eq!(sum_field(&payments, |p| Some(p.total_amount)), Money::zero());
    }

    #[test]
    fn test_sum_field_skips_absent() {
        let expenses = vec![
            Expense::new("e1", None, m(1000)),
            Expense::new("e2", None, m(250)).voided(),
            Expense::new("e3", None, m(50)),
        ];
        let total = sum_field(&expenses, |e| e.is_active().then_some(e.amount));
        assert_eq!(total, m(1050));
    }

    #[test]
    fn test_zero_selector_sums_to_zero() {
        let payments = vec![
            Payment::new("p1", None, m(30000)),
            Payment::new("p2", None, m(-4500)),
        ];
        assert_eq!(sum_field(&payments, |_| Some(Money::zero())), Money::zero());

        let records: Vec<Record> = vec![
            Record::new().with("amount", 12.5),
            Record::new().with("amount", 0.0),
        ];
        assert_eq!(sum_record_field(&records, "amount").cents(), 1250);
        assert_eq!(
            sum_field(&records, |_: &Record| Some(Money::zero())),
            Money::zero()
        );
    }

    #[test]
    fn test_sum_record_field_treats_invalid_as_zero() {
        let records: Vec<Record> = vec![
            json!({"totalAmount": 100}),
            json!({"totalAmount": "abc"}),
            json!({"other": 1}),
            json!({"totalAmount": "1,250.50"}),
        ]
        .into_iter()
        .filter_map(Record::from_json)
        .collect();

        assert_eq!(sum_record_field(&records, "totalAmount"), m(135050));
        assert_eq!(sum_record_field(&records, "missing"), Money::zero());
    }

    #[test]
    fn test_sum_is_order_independent() {
        let records: Vec<Record> = [0.1, 0.2, 0.3, 19.99]
            .iter()
            .map(|v| Record::new().with("amount", *v))
            .collect();
        let forward = sum_record_field(&records, "amount");
        let backward = sum_record_field(records.iter().rev(), "amount");
        assert_eq!(forward, backward);
        assert_eq!(forward, m(2059));
    }

    #[test]
    fn test_derived_formulas() {
        let totals = IncomeTotals {
            revenue: m(100000),
            cost_of_goods_sold: m(40000),
            operating_expenses: m(25000),
        };
        assert_eq!(totals.gross_profit(), m(60000));
        assert_eq!(totals.net_income(), m(35000));
        assert!((totals.gross_margin().unwrap() - 60.0).abs() < 1e-9);
        assert_eq!(equity(m(25000), m(8000)), m(17000));
    }

    #[test]
    fn test_gross_margin_without_revenue() {
        let totals = IncomeTotals {
            cost_of_goods_sold: m(500),
            ..Default::default()
        };
        assert_eq!(totals.gross_margin(), None);
        assert_eq!(totals.net_income(), m(-500));
    }

    #[test]
    fn test_aggregate_result_keeps_order_and_replaces() {
        let mut result = AggregateResult::new().with("revenue", m(10)).with("cogs", m(4));
        result.push("revenue", m(12));
        let names: Vec<&str> = result.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["revenue", "cogs"]);
        assert_eq!(result.get("revenue"), Some(m(12)));
        assert_eq!(result.get("missing"), None);
    }

    #[test]
    fn test_catalog_costs_sales() {
        let products = vec![
            Product::new("p1", "Exercise Book", m(10000), 50.0),
            Product::new("p2", "Broken", m(10000), 0.0),
        ];
        let catalog = ProductCatalog::new(&products);

        let by_id = Sale::new("s1", None, "whatever", 3.0, m(500)).with_product_id("p1");
        assert_eq!(catalog.cost_of_sale(&by_id), Some(m(600)));

        let by_name = Sale::new("s2", None, "exercise book", 2.0, m(500));
        assert_eq!(catalog.cost_of_sale(&by_name), Some(m(400)));

        let zero_supplied = Sale::new("s3", None, "Broken", 1.0, m(500));
        assert_eq!(catalog.cost_of_sale(&zero_supplied), None);

        let unknown = Sale::new("s4", None, "Pens", 1.0, m(500));
        assert!(catalog.product_for(&unknown).is_none());
    }
}
