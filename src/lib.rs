//! Backoffice - report aggregation for a small organization's back office
//!
//! Reads JSON snapshots of the remote database collections (payments, sales,
//! expenses, assets, liabilities, products, owner equity), converts them into
//! typed records at a single ingestion boundary, and computes financial
//! reports from a caller-owned dataset.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Raw documents, typed schemas and value types
//! - `storage`: JSON snapshot storage layer
//! - `services`: Ingestion of raw documents into the typed dataset
//! - `reports`: Filters, summation and the financial reports
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML writers
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use backoffice::config::BackofficePaths;
//! use backoffice::reports::{ProfitAndLossReport, ReportFilter};
//! use backoffice::storage::Storage;
//!
//! let mut storage = Storage::new(BackofficePaths::new()?)?;
//! storage.load_all()?;
//! let (dataset, _issues) = storage.load_dataset()?;
//! let report = ProfitAndLossReport::generate(&dataset, &ReportFilter::all());
//! println!("Net income: {}", report.net_income);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BackofficeError, BackofficeResult};
