//! Date-range and keyword filters
//!
//! Filters borrow from the caller's records and return the matching
//! subsequence in its original order. They never clone or modify records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{DateRange, Dated, Searchable};

/// Records whose date lies in `[from, to]`; an absent bound is unbounded
///
/// Undated records are dropped as soon as either bound is set. With no bounds
/// at all every record is returned, dated or not.
pub fn filter_by_date_range<'a, T, I>(
    records: I,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    filter_by_range(records, &DateRange::new(from, to))
}

/// [`filter_by_date_range`] taking a [`DateRange`]
pub fn filter_by_range<'a, T, I>(records: I, range: &DateRange) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|record| range.admits(record.date()))
        .collect()
}

/// Records with a text field containing `keyword`, ignoring case
///
/// An empty or all-whitespace keyword matches everything.
pub fn filter_by_keyword<'a, T, I>(records: I, keyword: &str) -> Vec<&'a T>
where
    T: Searchable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// The filter a report view is computed under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub range: DateRange,
    pub keyword: Option<String>,
}

impl ReportFilter {
    /// No date bounds, no keyword
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = (!keyword.trim().is_empty()).then_some(keyword);
        self
    }

    pub fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or("")
    }

    /// Date range first, then keyword
    pub fn apply<'a, T: Dated + Searchable>(&self, records: &'a [T]) -> Vec<&'a T> {
        filter_by_keyword(filter_by_range(records, &self.range), self.keyword())
    }

    /// Keyword only, for collections that are not filtered by date
    pub fn apply_keyword<'a, T: Searchable>(&self, records: &'a [T]) -> Vec<&'a T> {
        filter_by_keyword(records, self.keyword())
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.range)?;
        if let Some(keyword) = &self.keyword {
            write!(f, ", matching \"{}\"", keyword)?;
        }
        Ok(())
    }
}
