//! Dynamic records: a column-name to typed-value mapping.
//!
//! Records are what crosses between the repositories and the storage
//! adapter. They carry values, never statement text.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};

/// Storage and input format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage and input format for times of day.
pub const TIME_FORMAT: &str = "%H:%M";

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 64-bit signed integer.
    Integer,
    /// Exact decimal, stored as text.
    Decimal,
    /// UTF-8 text.
    Text,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Time of day, `HH:MM`.
    Time,
    /// UTC instant, RFC 3339.
    Timestamp,
}

impl ValueKind {
    /// Lower-case name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value bound to a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Integer value.
    Integer(i64),
    /// Exact decimal value.
    Decimal(Decimal),
    /// Text value.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// UTC instant.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Kind of a non-null value.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(ValueKind::Integer),
            Self::Decimal(_) => Some(ValueKind::Decimal),
            Self::Text(_) => Some(ValueKind::Text),
            Self::Date(_) => Some(ValueKind::Date),
            Self::Time(_) => Some(ValueKind::Time),
            Self::Timestamp(_) => Some(ValueKind::Timestamp),
        }
    }

    /// Kind name, or `null`.
    pub fn type_name(&self) -> &'static str {
        self.kind().map_or("null", |k| k.as_str())
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert this value to `kind`, parsing text where that is unambiguous.
    ///
    /// Returns `None` when the value cannot represent the target kind.
    /// `Null` coerces to `Null` for every kind.
    pub fn coerce(&self, kind: ValueKind) -> Option<Value> {
        if self.kind() == Some(kind) || self.is_null() {
            return Some(self.clone());
        }

        match (self, kind) {
            (Self::Text(s), ValueKind::Integer) => s.trim().parse::<i64>().ok().map(Self::Integer),
            (Self::Text(s), ValueKind::Decimal) => s.trim().parse::<Decimal>().ok().map(Self::Decimal),
            (Self::Integer(n), ValueKind::Decimal) => Some(Self::Decimal(Decimal::from(*n))),
            (Self::Text(s), ValueKind::Date) => {
                NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok().map(Self::Date)
            }
            (Self::Text(s), ValueKind::Time) => parse_time(s.trim()).map(Self::Time),
            (Self::Text(s), ValueKind::Timestamp) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| Self::Timestamp(dt.with_timezone(&Utc))),
            _ => None,
        }
    }

    /// Canonical text form used for storage of non-integer values.
    pub fn to_storage_text(&self) -> Option<String> {
        match self {
            Self::Null | Self::Integer(_) => None,
            Self::Decimal(d) => Some(d.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            Self::Time(t) => Some(t.format(TIME_FORMAT).to_string()),
            Self::Timestamp(ts) => Some(ts.to_rfc3339_opts(SecondsFormat::Micros, true)),
        }
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(n) => write!(f, "{n}"),
            other => f.write_str(&other.to_storage_text().unwrap_or_default()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// Mapping from column name to typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, Value>,
}

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column, replacing any previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// True when the column is present and not null.
    pub fn has_value(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| !v.is_null())
    }

    /// Drop a column, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    /// Number of columns present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no columns are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Columns and values in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn mismatch(column: &str, expected: ValueKind, found: Option<&Value>) -> DomainError {
        DomainError::TypeMismatch {
            column: column.to_string(),
            expected: expected.as_str(),
            found: found.map_or("missing", Value::type_name).to_string(),
        }
    }

    /// A required integer column.
    pub fn integer(&self, column: &str) -> DomainResult<i64> {
        self.opt_integer(column)?
            .ok_or_else(|| Self::mismatch(column, ValueKind::Integer, self.get(column)))
    }

    /// An integer column that may be absent or NULL.
    pub fn opt_integer(&self, column: &str) -> DomainResult<Option<i64>> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(*n)),
            other => Err(Self::mismatch(column, ValueKind::Integer, other)),
        }
    }

    /// A non-negative integer column as `u32`.
    pub fn count(&self, column: &str) -> DomainResult<u32> {
        let n = self.integer(column)?;
        u32::try_from(n).map_err(|_| DomainError::TypeMismatch {
            column: column.to_string(),
            expected: "non-negative integer",
            found: n.to_string(),
        })
    }

    /// A required text column.
    pub fn text(&self, column: &str) -> DomainResult<String> {
        self.opt_text(column)?
            .ok_or_else(|| Self::mismatch(column, ValueKind::Text, self.get(column)))
    }

    /// A text column that may be absent or NULL.
    pub fn opt_text(&self, column: &str) -> DomainResult<Option<String>> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            other => Err(Self::mismatch(column, ValueKind::Text, other)),
        }
    }

    /// A required decimal column.
    pub fn decimal(&self, column: &str) -> DomainResult<Decimal> {
        match self.get(column) {
            Some(Value::Decimal(d)) => Ok(*d),
            other => Err(Self::mismatch(column, ValueKind::Decimal, other)),
        }
    }

    /// A required date column.
    pub fn date(&self, column: &str) -> DomainResult<NaiveDate> {
        self.opt_date(column)?
            .ok_or_else(|| Self::mismatch(column, ValueKind::Date, self.get(column)))
    }

    /// A date column that may be absent or NULL.
    pub fn opt_date(&self, column: &str) -> DomainResult<Option<NaiveDate>> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Date(d)) => Ok(Some(*d)),
            other => Err(Self::mismatch(column, ValueKind::Date, other)),
        }
    }

    /// A required time column.
    pub fn time(&self, column: &str) -> DomainResult<NaiveTime> {
        match self.get(column) {
            Some(Value::Time(t)) => Ok(*t),
            other => Err(Self::mismatch(column, ValueKind::Time, other)),
        }
    }

    /// A required timestamp column.
    pub fn timestamp(&self, column: &str) -> DomainResult<DateTime<Utc>> {
        self.opt_timestamp(column)?
            .ok_or_else(|| Self::mismatch(column, ValueKind::Timestamp, self.get(column)))
    }

    /// A timestamp column that may be absent or NULL.
    pub fn opt_timestamp(&self, column: &str) -> DomainResult<Option<DateTime<Utc>>> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Timestamp(ts)) => Ok(Some(*ts)),
            other => Err(Self::mismatch(column, ValueKind::Timestamp, other)),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numeric_text() {
        assert_eq!(Value::from(" 42 ").coerce(ValueKind::Integer), Some(Value::Integer(42)));
        assert_eq!(
            Value::from("350000.50").coerce(ValueKind::Decimal),
            Some(Value::Decimal(Decimal::new(35_000_050, 2)))
        );
        assert_eq!(Value::from("three").coerce(ValueKind::Integer), None);
        assert_eq!(Value::from("1; DROP TABLE x").coerce(ValueKind::Decimal), None);
    }

    #[test]
    fn test_coerce_dates_and_times() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(Value::from("2024-03-15").coerce(ValueKind::Date), Some(Value::Date(date)));
        assert_eq!(Value::from("15/03/2024").coerce(ValueKind::Date), None);

        let time = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(Value::from("14:30").coerce(ValueKind::Time), Some(Value::Time(time)));
        assert_eq!(Value::from("14:30:00").coerce(ValueKind::Time), Some(Value::Time(time)));
    }

    #[test]
    fn test_coerce_never_turns_numbers_into_text() {
        assert_eq!(Value::Integer(7).coerce(ValueKind::Text), None);
        assert_eq!(Value::Null.coerce(ValueKind::Text), Some(Value::Null));
        assert_eq!(
            Value::Integer(7).coerce(ValueKind::Decimal),
            Some(Value::Decimal(Decimal::from(7)))
        );
    }

    #[test]
    fn test_record_getters_report_type_mismatch() {
        let record = Record::new().with("num_bedrooms", "three").with("city", "Austin");

        assert_eq!(record.text("city").unwrap(), "Austin");
        match record.integer("num_bedrooms") {
            Err(DomainError::TypeMismatch { column, expected, found }) => {
                assert_eq!(column, "num_bedrooms");
                assert_eq!(expected, "integer");
                assert_eq!(found, "text");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
        assert!(matches!(
            record.integer("missing"),
            Err(DomainError::TypeMismatch { .. })
        ));
        assert_eq!(record.opt_integer("missing").unwrap(), None);
    }

    #[test]
    fn test_count_rejects_negative() {
        let record = Record::new().with("num_bathrooms", -1_i64);
        assert!(record.count("num_bathrooms").is_err());
    }

    #[test]
    fn test_storage_text_is_canonical() {
        let ts = DateTime::parse_from_rfc3339("2024-03-15T10:00:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            Value::Timestamp(ts).to_storage_text().unwrap(),
            "2024-03-15T10:00:00.123456Z"
        );
        assert_eq!(Value::Integer(3).to_storage_text(), None);
    }
}
