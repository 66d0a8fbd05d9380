//! Raw document records
//!
//! A [`Record`] is one document as fetched from the remote database: a mapping
//! of field names to loosely typed values. Keys are not uniform across
//! collections and values are frequently stringly typed, so every accessor here
//! is lenient and reports *why* a field could not be read instead of failing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use super::traits::{Dated, Searchable};

/// Field names that commonly carry a record's date
pub const DATE_FIELDS: &[&str] = &["date", "createdAt", "created_at", "timestamp"];

/// Years a business document can carry; anything else is a unit mix-up
/// such as seconds or microseconds passed as milliseconds
pub const PLAUSIBLE_YEARS: RangeInclusive<i32> = 1900..=2200;

/// Field names that carry the document id
pub const ID_FIELDS: &[&str] = &["id", "_id", "docId"];

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₦', '₹', '₵'];

/// One field value of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Database timestamp objects (`{"seconds": .., "nanoseconds": ..}`)
    Timestamp(DateTime<Utc>),
    /// Arrays and maps the aggregation never looks into
    Nested(Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view: numbers as-is, numeric strings parsed leniently
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Non-empty text view
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Calendar date view of timestamps, date strings, and epoch milliseconds
    ///
    /// Dates outside [`PLAUSIBLE_YEARS`] read as unparseable.
    pub fn as_date(&self) -> Option<NaiveDate> {
        let date = match self {
            Self::Timestamp(ts) => Some(ts.date_naive()),
            Self::Text(s) => parse_date(s),
            Self::Number(n) => date_from_epoch_millis(*n),
            _ => None,
        };
        date.filter(|date| PLAUSIBLE_YEARS.contains(&date.year()))
    }

    /// Boolean view: bools, "true"/"false"/"yes"/"no"/"1"/"0", and numbers
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) if n.is_finite() => Some(*n != 0.0),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Some(true),
                "false" | "no" | "n" | "0" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Short rendering for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => format!("{:?}", s),
            Self::Timestamp(ts) => ts.to_rfc3339(),
            Self::Nested(v) => {
                let rendered = v.to_string();
                if rendered.chars().count() > 40 {
                    let head: String = rendered.chars().take(37).collect();
                    format!("{}...", head)
                } else {
                    rendered
                }
            }
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::Text(s),
            Value::Object(map) => match timestamp_from_object(&map) {
                Some(ts) => Self::Timestamp(ts),
                None => Self::Nested(Value::Object(map)),
            },
            other => Self::Nested(other),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
            FieldValue::Nested(v) => v,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(date: NaiveDate) -> Self {
        Self::Text(date.format("%Y-%m-%d").to_string())
    }
}

/// Outcome of reading a field through a list of aliases
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRead<T> {
    /// None of the aliases is present (or all are null)
    Missing,
    /// A field was present but could not be interpreted
    Invalid { field: String, raw: String },
    Present(T),
}

impl<T> FieldRead<T> {
    /// The value, treating missing and invalid alike
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// One document from a remote collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; only objects are records
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                fields: map
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            }),
            _ => None,
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Document id, if the document carries one
    pub fn id(&self) -> Option<&str> {
        self.first(ID_FIELDS).and_then(|(_, v)| v.as_text())
    }

    /// First non-null field among `aliases`
    pub fn first<'a>(&'a self, aliases: &[&'a str]) -> Option<(&'a str, &'a FieldValue)> {
        aliases.iter().find_map(|alias| {
            self.fields
                .get(*alias)
                .filter(|v| !v.is_null())
                .map(|v| (*alias, v))
        })
    }

    pub fn read_number(&self, aliases: &[&str]) -> FieldRead<f64> {
        self.read_with(aliases, FieldValue::as_number)
    }

    pub fn read_date(&self, aliases: &[&str]) -> FieldRead<NaiveDate> {
        self.read_with(aliases, FieldValue::as_date)
    }

    pub fn read_flag(&self, aliases: &[&str]) -> FieldRead<bool> {
        self.read_with(aliases, FieldValue::as_flag)
    }

    pub fn read_text(&self, aliases: &[&str]) -> FieldRead<String> {
        match self.first(aliases) {
            None => FieldRead::Missing,
            Some((_, FieldValue::Text(s))) if s.trim().is_empty() => FieldRead::Missing,
            Some((_, FieldValue::Text(s))) => FieldRead::Present(s.trim().to_string()),
            // Numbers used as names/codes are still usable text
            Some((_, FieldValue::Number(n))) if n.is_finite() => FieldRead::Present(n.to_string()),
            Some((field, other)) => FieldRead::Invalid {
                field: field.to_string(),
                raw: other.describe(),
            },
        }
    }

    fn read_with<T>(&self, aliases: &[&str], view: impl Fn(&FieldValue) -> Option<T>) -> FieldRead<T> {
        match self.first(aliases) {
            None => FieldRead::Missing,
            Some((field, value)) => match view(value) {
                Some(v) => FieldRead::Present(v),
                None => FieldRead::Invalid {
                    field: field.to_string(),
                    raw: value.describe(),
                },
            },
        }
    }

    /// Lenient numeric lookup of a single field: missing or non-numeric is `None`
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_number)
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Dated for Record {
    fn date(&self) -> Option<NaiveDate> {
        self.read_date(DATE_FIELDS).ok()
    }
}

impl Searchable for Record {
    fn search_fields(&self) -> Vec<&str> {
        self.fields.values().filter_map(FieldValue::as_text).collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "record {}", id),
            None => write!(f, "record without id"),
        }
    }
}

/// Parse a number the way people type them into admin forms
///
/// Accepts thousands separators, surrounding whitespace, a leading currency
/// symbol or three-letter currency code, and a sign before or after the symbol.
pub fn parse_number(s: &str) -> Option<f64> {
    let mut s = s.trim();
    let mut negative = false;

    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest.trim_start();
    }

    s = s.trim_start_matches(CURRENCY_SYMBOLS).trim_start();

    let bytes = s.as_bytes();
    if bytes.len() > 3
        && bytes[..3].iter().all(u8::is_ascii_uppercase)
        && !bytes[3].is_ascii_alphabetic()
    {
        s = s[3..].trim_start();
    }

    if !negative {
        if let Some(rest) = s.strip_prefix('-') {
            negative = true;
            s = rest;
        }
    }

    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parse a calendar date from the string forms documents use
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<f64>().ok().and_then(date_from_epoch_millis);
    }

    None
}

fn date_from_epoch_millis(millis: f64) -> Option<NaiveDate> {
    if !millis.is_finite() || millis <= 0.0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.date_naive())
}

fn timestamp_from_object(map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let seconds = map
        .get("seconds")
        .or_else(|| map.get("_seconds"))
        .and_then(Value::as_i64)?;
    let nanos = map
        .get("nanoseconds")
        .or_else(|| map.get("_nanoseconds"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
}
