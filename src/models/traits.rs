//! Capabilities the report filters rely on

use chrono::NaiveDate;

/// A record that may carry a calendar date
pub trait Dated {
    /// The record's date, `None` when missing or unparseable
    fn date(&self) -> Option<NaiveDate>;
}

/// A record with textual fields a keyword can match against
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}
