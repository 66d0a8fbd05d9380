//! Ingestion of raw documents into typed records
//!
//! This is the one place where loosely structured documents meet the typed
//! schema. Conversion never fails: a field that is missing or cannot be
//! interpreted becomes a neutral value (zero, no date, empty text) and a
//! [`FieldIssue`] describing what was wrong.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use crate::models::ids::positional_id;
use crate::models::record::DATE_FIELDS;
use crate::models::{
    Asset, Collection, Dataset, EquityEntry, EquityKind, Expense, FieldRead, Liability, Money,
    Payment, Product, Record, Sale,
};

/// What was wrong with a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// A field the report needs is absent
    Missing,
    /// The field is present but holds an unusable value
    Unparseable { raw: String },
}

/// One problem found while converting a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub collection: Collection,
    pub record_id: String,
    /// Schema field name (or the document key that held the bad value)
    pub field: String,
    pub problem: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            IssueKind::Missing => write!(
                f,
                "{} {}: missing field '{}'",
                self.collection, self.record_id, self.field
            ),
            IssueKind::Unparseable { raw } => write!(
                f,
                "{} {}: could not read '{}' from {}",
                self.collection, self.record_id, self.field, raw
            ),
        }
    }
}

/// A converted record plus the issues found along the way
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub record: T,
    pub issues: Vec<FieldIssue>,
}

/// Typed records that can be built from a raw document
pub trait FromRecord: Sized {
    const COLLECTION: Collection;

    fn from_record(reader: &mut FieldReader<'_>) -> Self;

    /// Convert one document, collecting issues
    fn ingest(record: &Record) -> Ingested<Self> {
        Self::ingest_at(record, 0)
    }

    /// Convert the document at `index` of its collection
    fn ingest_at(record: &Record, index: usize) -> Ingested<Self> {
        let mut reader = FieldReader::new(record, Self::COLLECTION, index);
        let converted = Self::from_record(&mut reader);
        Ingested {
            record: converted,
            issues: reader.issues,
        }
    }
}

/// Reads fields off a document, recording an issue for every fallback taken
pub struct FieldReader<'a> {
    record: &'a Record,
    collection: Collection,
    id: String,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'a Record, collection: Collection, index: usize) -> Self {
        let id = match record.id() {
            Some(id) => id.to_string(),
            None => {
                let fallback = positional_id(collection, index);
                debug!("{} document without id, named {}", collection, fallback);
                fallback
            }
        };
        Self {
            record,
            collection,
            id,
            issues: Vec::new(),
        }
    }

    /// The document id, or its position when the document has none
    pub fn id(&self) -> String {
        self.id.clone()
    }

    fn push(&mut self, field: &str, problem: IssueKind) {
        self.issues.push(FieldIssue {
            collection: self.collection,
            record_id: self.id.clone(),
            field: field.to_string(),
            problem,
        });
    }

    /// First alias holding a usable number; later aliases are fallbacks
    ///
    /// Records an issue only when no alias yields a number: `Missing` when the
    /// field is absent, `Unparseable` when the first present alias was bad.
    pub fn number(&mut self, field: &str, aliases: &[&str], required: bool) -> Option<f64> {
        let mut first_invalid = None;
        for alias in aliases {
            match self.record.read_number(&[*alias]) {
                FieldRead::Present(value) => return Some(value),
                FieldRead::Invalid { field, raw } => {
                    first_invalid.get_or_insert((field, raw));
                }
                FieldRead::Missing => {}
            }
        }

        match first_invalid {
            Some((key, raw)) => self.push(&key, IssueKind::Unparseable { raw }),
            None if required => self.push(field, IssueKind::Missing),
            None => {}
        }
        None
    }

    /// Money field; unusable values count as zero
    pub fn money(&mut self, field: &str, aliases: &[&str], required: bool) -> Option<Money> {
        let value = self.number(field, aliases, required)?;
        match Money::from_f64(value) {
            Some(money) => Some(money),
            None => {
                self.push(
                    field,
                    IssueKind::Unparseable {
                        raw: value.to_string(),
                    },
                );
                None
            }
        }
    }

    pub fn date(&mut self, field: &str, aliases: &[&str], required: bool) -> Option<NaiveDate> {
        match self.record.read_date(aliases) {
            FieldRead::Present(date) => Some(date),
            FieldRead::Invalid { field, raw } => {
                self.push(&field, IssueKind::Unparseable { raw });
                None
            }
            FieldRead::Missing => {
                if required {
                    self.push(field, IssueKind::Missing);
                }
                None
            }
        }
    }

    pub fn text(&mut self, aliases: &[&str]) -> String {
        match self.record.read_text(aliases) {
            FieldRead::Present(text) => text,
            FieldRead::Invalid { field, raw } => {
                self.push(&field, IssueKind::Unparseable { raw });
                String::new()
            }
            FieldRead::Missing => String::new(),
        }
    }

    pub fn optional_text(&mut self, aliases: &[&str]) -> Option<String> {
        Some(self.text(aliases)).filter(|s| !s.is_empty())
    }

    /// Boolean flag; absent means false
    pub fn flag(&mut self, aliases: &[&str]) -> bool {
        match self.record.read_flag(aliases) {
            FieldRead::Present(flag) => flag,
            FieldRead::Invalid { field, raw } => {
                self.push(&field, IssueKind::Unparseable { raw });
                false
            }
            FieldRead::Missing => false,
        }
    }
}

impl FromRecord for Payment {
    const COLLECTION: Collection = Collection::Payments;

    fn from_record(r: &mut FieldReader<'_>) -> Self {
        let mut payment = Payment::new(
            r.id(),
            r.date("date", DATE_FIELDS, true),
            r.money("total_amount", &["totalAmount", "total_amount", "amount"], true)
                .unwrap_or_default(),
        );
        payment.customer = r.text(&["customer", "customerName", "customer_name", "studentName"]);
        payment.method = r.text(&["paymentMethod", "payment_method", "method"]);
        payment.reference = r.text(&["reference", "receiptNumber", "receipt_number"]);
        payment
    }
}

impl FromRecord for Sale {
    const COLLECTION: Collection = Collection::Sales;

    fn from_record(r: &mut FieldReader<'_>) -> Self {
        let id = r.id();
        let date = r.date("date", DATE_FIELDS, true);
        let product_id = r.optional_text(&["productId", "product_id"]);
        let product_name = r.text(&["productName", "product_name", "product", "name"]);
        let quantity = r
            .number("quantity", &["quantity", "qty", "quantitySold"], true)
            .unwrap_or(0.0);
        let unit_price = r.money("unit_price", &["unitPrice", "unit_price", "price", "sellingPrice"], false);
        let total = r.money("total", &["total", "totalAmount", "total_amount", "amount"], false);

        let (unit_price, total) = match (unit_price, total) {
            (Some(price), Some(total)) => (price, total),
            (Some(price), None) => (price, price.times(quantity)),
            (None, Some(total)) => (total.per_unit(quantity).unwrap_or_default(), total),
            (None, None) => {
                r.push("unit_price", IssueKind::Missing);
                (Money::zero(), Money::zero())
            }
        };

        let mut sale = Sale::new(id, date, product_name, quantity, unit_price);
        sale.total = total;
        sale.product_id = product_id.map(Into::into);
        sale.customer = r.text(&["customer", "customerName", "customer_name"]);
        sale
    }
}

impl FromRecord for Expense {
    const COLLECTION: Collection = Collection::Expenses;

    fn from_record(r: &mut FieldReader<'_>) -> Self {
        let mut expense = Expense::new(
            r.id(),
            r.date("date", DATE_FIELDS, true),
            r.money("amount", &["amount", "totalAmount", "cost"], true)
                .unwrap_or_default(),
        );
        expense.category = r.text(&["category", "type", "expenseType"]);
        expense.description = r.text(&["description", "name", "title", "note"]);
        expense.voided = r.flag(&["voided", "isVoided", "is_voided", "void"]);
        expense
    }
}

impl FromRecord for Asset {
    const COLLECTION: Collection = Collection::Assets;

    fn from_record(r: &mut FieldReader<'_>) -> Self {
        let value = r
            .money(
                "value",
                &["marketValue", "market_value", "amount", "purchasePrice", "purchase_price", "value"],
                true,
            )
            .unwrap_or_default();
        let mut asset = Asset::new(r.id(), r.text(&["name", "assetName", "description"]), value);
        asset.category = r.text(&["category", "type", "assetType"]);
        asset.date = r.date(
            "date",
            &["date", "purchaseDate", "purchase_date", "acquiredAt", "createdAt"],
            false,
        );
        asset
    }
}

impl FromRecord for Liability {
    const COLLECTION: Collection = Collection::Liabilities;

    fn from_record(r: &mut FieldReader<'_>) -> Self {
        let balance = r
            .money(
                "balance",
                &["loanBalance", "loan_balance", "balance", "amount"],
                true,
            )
            .unwrap_or_default();
        let mut liability = Liability::new(r.id(), r.text(&["name", "lender", "description"]), balance);
        liability.date = r.date("date", DATE_FIELDS, false);
        liability
    }
}

impl FromRecord for Product {
    const COLLECTION: Collection = Collection::Products;

    fn from_record(r: &mut FieldReader<'_>) -> Self {
        let cost = r
            .money("cost", &["cost", "totalCost", "total_cost", "costPrice"], true)
            .unwrap_or_default();
        let supplied = r
            .number(
                "quantity_supplied",
                &["quantitySupplied", "quantity_supplied", "quantity"],
                true,
            )
            .unwrap_or(0.0);

        let mut product = Product::new(r.id(), r.text(&["name", "productName", "product_name"]), cost, supplied);
        product.category = r.text(&["category"]);
        product.quantity_in_stock = r
            .number(
                "quantity_in_stock",
                &["quantityInStock", "quantity_in_stock", "stock", "inStock"],
                false,
            )
            .unwrap_or(supplied);
        product.selling_price = r
            .money("selling_price", &["sellingPrice", "selling_price", "price"], false)
            .unwrap_or_default();
        product.date = r.date(
            "date",
            &["dateSupplied", "date_supplied", "date", "createdAt"],
            false,
        );
        product
    }
}

impl FromRecord for EquityEntry {
    const COLLECTION: Collection = Collection::Equity;

    fn from_record(r: &mut FieldReader<'_>) -> Self {
        let amount = r
            .money("amount", &["amount", "value"], true)
            .unwrap_or_default();

        let record = r.record;
        let kind = match record.first(&["kind", "type"]) {
            None => {
                if amount.is_negative() {
                    EquityKind::Drawing
                } else {
                    EquityKind::Contribution
                }
            }
            Some((field, value)) => match value.as_text().and_then(EquityKind::parse) {
                Some(kind) => kind,
                None => {
                    let raw = value.describe();
                    r.push(field, IssueKind::Unparseable { raw });
                    EquityKind::default()
                }
            },
        };

        let mut entry = EquityEntry::new(r.id(), kind, amount);
        entry.date = r.date("date", DATE_FIELDS, false);
        entry.description = r.text(&["description", "note", "name"]);
        entry
    }
}

/// Convert every document of one collection
pub fn ingest_all<T: FromRecord>(records: &[Record]) -> (Vec<T>, Vec<FieldIssue>) {
    let mut converted = Vec::with_capacity(records.len());
    let mut issues = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let ingested = T::ingest_at(record, index);
        converted.push(ingested.record);
        issues.extend(ingested.issues);
    }
    (converted, issues)
}

/// Per-collection ingestion counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub records: usize,
    /// Records with at least one issue
    pub records_with_issues: usize,
}

/// Outcome of converting a full set of raw collections
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
    pub collections: BTreeMap<Collection, CollectionSummary>,
    pub issues: Vec<FieldIssue>,
}

impl IngestSummary {
    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    pub fn issues_for(&self, collection: Collection) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter().filter(move |i| i.collection == collection)
    }

    fn record<T: FromRecord>(&mut self, records: usize, issues: Vec<FieldIssue>) {
        let mut affected: Vec<&str> = issues.iter().map(|i| i.record_id.as_str()).collect();
        affected.sort_unstable();
        affected.dedup();

        let summary = CollectionSummary {
            records,
            records_with_issues: affected.len(),
        };

        if summary.records_with_issues > 0 {
            warn!(
                "{}: {} of {} documents had unreadable fields",
                T::COLLECTION,
                summary.records_with_issues,
                summary.records
            );
        }
        for issue in &issues {
            debug!("{}", issue);
        }

        self.collections.insert(T::COLLECTION, summary);
        self.issues.extend(issues);
    }
}

/// Raw documents keyed by collection, as loaded from storage
pub type RawCollections = BTreeMap<Collection, Vec<Record>>;

fn convert<T: FromRecord>(raw: &RawCollections, summary: &mut IngestSummary) -> Vec<T> {
    let records = raw.get(&T::COLLECTION).map(Vec::as_slice).unwrap_or(&[]);
    let (converted, issues) = ingest_all::<T>(records);
    summary.record::<T>(records.len(), issues);
    converted
}

/// Convert every collection into a [`Dataset`]
pub fn ingest_dataset(raw: &RawCollections) -> (Dataset, IngestSummary) {
    let mut summary = IngestSummary::default();
    let dataset = Dataset {
        payments: convert(raw, &mut summary),
        sales: convert(raw, &mut summary),
        expenses: convert(raw, &mut summary),
        assets: convert(raw, &mut summary),
        liabilities: convert(raw, &mut summary),
        products: convert(raw, &mut summary),
        equity: convert(raw, &mut summary),
    };
    (dataset, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rec(value: Value) -> Record {
        Record::from_json(value).unwrap()
    }

    #[test]
    fn test_payment_fields() {
        let ingested = Payment::ingest(&rec(json!({
            "id": "pay1",
            "date": "2025-01-10",
            "totalAmount": 300,
            "customerName": "Jane",
            "paymentMethod": "cash"
        })));
        assert!(ingested.issues.is_empty());
        let payment = ingested.record;
        assert_eq!(payment.id.as_str(), "pay1");
        assert_eq!(payment.total_amount, Money::from_cents(30000));
        assert_eq!(payment.customer, "Jane");
        assert_eq!(payment.method, "cash");
        assert_eq!(payment.date, NaiveDate::from_ymd_opt(2025, 1, 10));
    }

    #[test]
    fn test_malformed_amount_becomes_zero_with_issue() {
        let ingested = Payment::ingest(&rec(json!({
            "id": "pay2",
            "date": "2025-01-10",
            "totalAmount": "lots"
        })));
        assert_eq!(ingested.record.total_amount, Money::zero());
        assert_eq!(ingested.issues.len(), 1);
        assert_eq!(ingested.issues[0].field, "totalAmount");
        assert!(matches!(ingested.issues[0].problem, IssueKind::Unparseable { .. }));
    }

    #[test]
    fn test_missing_date_is_reported() {
        let ingested = Expense::ingest(&rec(json!({"id": "e1", "amount": 100})));
        assert_eq!(ingested.record.date, None);
        assert_eq!(ingested.issues.len(), 1);
        assert_eq!(ingested.issues[0].field, "date");
        assert_eq!(ingested.issues[0].problem, IssueKind::Missing);
    }

    #[test]
    fn test_expense_voided_flag() {
        let voided = Expense::ingest(&rec(json!({
            "id": "e2", "date": "2025-01-01", "amount": 50, "voided": true
        })));
        assert!(voided.record.voided);

        let active = Expense::ingest(&rec(json!({
            "id": "e3", "date": "2025-01-01", "amount": 100, "voided": false
        })));
        assert!(!active.record.voided);
    }

    #[test]
    fn test_asset_value_fallback_order() {
        let market = Asset::ingest(&rec(json!({"id": "a1", "marketValue": 200, "amount": 10})));
        assert_eq!(market.record.value, Money::from_cents(20000));

        let amount = Asset::ingest(&rec(json!({"id": "a2", "amount": 50})));
        assert_eq!(amount.record.value, Money::from_cents(5000));
        assert!(amount.issues.is_empty());

        // A bad market value still falls back to the amount
        let bad_market = Asset::ingest(&rec(json!({"id": "a3", "marketValue": "n/a", "amount": 75})));
        assert_eq!(bad_market.record.value, Money::from_cents(7500));
        assert!(bad_market.issues.is_empty());
    }

    #[test]
    fn test_liability_loan_balance() {
        let ingested = Liability::ingest(&rec(json!({"id": "l1", "loanBalance": 80, "lender": "Bank"})));
        assert_eq!(ingested.record.balance, Money::from_cents(8000));
        assert_eq!(ingested.record.name, "Bank");
    }

    #[test]
    fn test_sale_total_derived_from_quantity() {
        let ingested = Sale::ingest(&rec(json!({
            "id": "s1", "date": "2025-01-02", "productId": "p1",
            "productName": "Pen", "quantity": 3, "unitPrice": 1.5
        })));
        let sale = ingested.record;
        assert_eq!(sale.total, Money::from_cents(450));
        assert_eq!(sale.product_id.as_ref().map(|p| p.as_str()), Some("p1"));
    }

    #[test]
    fn test_sale_unit_price_derived_from_total() {
        let sale = Sale::ingest(&rec(json!({
            "id": "s2", "date": "2025-01-02", "quantity": 4, "total": 10
        })))
        .record;
        assert_eq!(sale.unit_price, Money::from_cents(250));

        let no_quantity = Sale::ingest(&rec(json!({
            "id": "s3", "date": "2025-01-02", "quantity": 0, "total": 10
        })))
        .record;
        assert_eq!(no_quantity.unit_price, Money::zero());
        assert_eq!(no_quantity.total, Money::from_cents(1000));
    }

    #[test]
    fn test_product_stock_defaults_to_supplied() {
        let product = Product::ingest(&rec(json!({
            "id": "p1", "name": "Pen", "cost": 100, "quantitySupplied": 50
        })))
        .record;
        assert_eq!(product.quantity_in_stock, 50.0);
        assert_eq!(product.unit_cost(), Some(Money::from_cents(200)));
    }

    #[test]
    fn test_equity_kind() {
        let drawing = EquityEntry::ingest(&rec(json!({"id": "q1", "amount": -40})));
        assert_eq!(drawing.record.kind, EquityKind::Drawing);
        assert_eq!(drawing.record.signed_amount(), Money::from_cents(-4000));

        let bad = EquityEntry::ingest(&rec(json!({"id": "q2", "amount": 40, "type": "loan"})));
        assert_eq!(bad.record.kind, EquityKind::Contribution);
        assert_eq!(bad.issues.len(), 1);
    }

    #[test]
    fn test_missing_id_falls_back_to_position() {
        let records = vec![
            rec(json!({"id": "l1", "balance": 5})),
            rec(json!({"balance": "n/a"})),
        ];
        let (first, issues) = ingest_all::<Liability>(&records);
        let (second, _) = ingest_all::<Liability>(&records);

        assert_eq!(first[1].id.as_str(), "liabilities#1");
        assert_eq!(first[1].id, second[1].id);
        assert_eq!(issues[0].record_id, "liabilities#1");
    }

    #[test]
    fn test_ingest_dataset_summary() {
        let mut raw = RawCollections::new();
        raw.insert(
            Collection::Expenses,
            vec![
                rec(json!({"id": "e1", "date": "2025-01-01", "amount": 100})),
                rec(json!({"id": "e2", "date": "bad", "amount": "bad"})),
            ],
        );
        raw.insert(
            Collection::Payments,
            vec![rec(json!({"id": "p1", "date": "2025-01-01", "totalAmount": 10}))],
        );

        let (dataset, summary) = ingest_dataset(&raw);
        assert_eq!(dataset.expenses.len(), 2);
        assert_eq!(dataset.payments.len(), 1);
        assert!(dataset.products.is_empty());

        let expenses = &summary.collections[&Collection::Expenses];
        assert_eq!(expenses.records, 2);
        assert_eq!(expenses.records_with_issues, 1);
        assert_eq!(summary.total_issues(), 2);
        assert_eq!(summary.issues_for(Collection::Payments).count(), 0);
    }
}
