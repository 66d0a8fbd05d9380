//! Core data models for Backoffice
//!
//! Raw documents ([`Record`]) as they arrive from the remote database, the
//! typed schema each collection is converted into, and the supporting value
//! types (money, ids, date ranges).

pub mod asset;
pub mod dataset;
pub mod equity;
pub mod expense;
pub mod ids;
pub mod money;
pub mod payment;
pub mod period;
pub mod product;
pub mod record;
pub mod sale;
pub mod traits;

pub use asset::{Asset, Liability};
pub use dataset::{Collection, Dataset};
pub use equity::{EquityEntry, EquityKind};
pub use expense::Expense;
pub use ids::{AssetId, EquityEntryId, ExpenseId, LiabilityId, PaymentId, ProductId, SaleId};
pub use money::Money;
pub use payment::Payment;
pub use period::{Bucket, BucketSize, DateRange};
pub use product::Product;
pub use record::{FieldRead, FieldValue, Record};
pub use sale::Sale;
pub use traits::{Dated, Searchable};
