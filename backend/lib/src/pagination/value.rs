//! Typed sort-key values and the field-access capability records expose.

use std::{cmp::Ordering, fmt};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Earliest storable timestamp (4714-11-24 BC, Julian day 0) in microseconds
/// since the Unix epoch. The latest one lies beyond chrono's range.
pub const MIN_TIMESTAMP_MICROS: i64 = -210_866_803_200_000_000;

/// Comparison type of a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Text,
    Timestamp,
}

impl ValueKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "integer",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field value a record can be filtered or ordered by.
///
/// Timestamps carry microsecond precision, the resolution of the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Int(i64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl KeyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Text(_) => ValueKind::Text,
            Self::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// Orders two values of the same kind; `None` when the kinds differ.
    pub fn compare(&self, other: &KeyValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// JSON form used inside continuation tokens.
    ///
    /// Timestamps are written as integer microseconds since the Unix epoch.
    pub(crate) fn to_wire(&self) -> Value {
        match self {
            Self::Int(v) => Value::from(*v),
            Self::Text(v) => Value::from(v.as_str()),
            Self::Timestamp(v) => Value::from(v.and_utc().timestamp_micros()),
        }
    }

    /// Reads a token value as `kind`, `None` if it cannot represent one.
    ///
    /// Timestamps before [`MIN_TIMESTAMP_MICROS`] are refused.
    pub(crate) fn from_wire(kind: ValueKind, value: &Value) -> Option<Self> {
        match kind {
            ValueKind::Int => value.as_i64().map(Self::Int),
            ValueKind::Text => value.as_str().map(|s| Self::Text(s.to_owned())),
            ValueKind::Timestamp => value
                .as_i64()
                .filter(|micros| *micros >= MIN_TIMESTAMP_MICROS)
                .and_then(DateTime::<Utc>::from_timestamp_micros)
                .map(|dt| Self::Timestamp(dt.naive_utc())),
        }
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<NaiveDateTime> for KeyValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// Named access to the fields of a record.
///
/// This is everything the pagination engine knows about a record: tokens are
/// projected through [`FieldAccess::field`] and in-memory sources evaluate
/// filters with it.
pub trait FieldAccess {
    /// The scalar value of `name`, `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<KeyValue>;

    /// The elements of a list-valued field such as tags.
    fn list_field(&self, _name: &str) -> Option<&[String]> {
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(12, 30, 15, 123_456)
            .unwrap()
    }

    #[test]
    fn compare_only_orders_matching_kinds() {
        assert_eq!(
            KeyValue::Int(1).compare(&KeyValue::Int(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            KeyValue::from("b").compare(&KeyValue::from("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(KeyValue::Int(1).compare(&KeyValue::from("1")), None);
    }

    #[test]
    fn timestamps_keep_microseconds_on_the_wire() {
        let value = KeyValue::Timestamp(timestamp());
        let wire = value.to_wire();

        assert!(wire.is_i64());
        assert_eq!(
            KeyValue::from_wire(ValueKind::Timestamp, &wire),
            Some(value)
        );
    }

    #[test]
    fn from_wire_rejects_incompatible_json() {
        assert_eq!(
            KeyValue::from_wire(ValueKind::Timestamp, &Value::from("yesterday")),
            None
        );
        assert_eq!(KeyValue::from_wire(ValueKind::Int, &Value::from(1.5)), None);
        assert_eq!(KeyValue::from_wire(ValueKind::Text, &Value::from(7)), None);
        assert_eq!(KeyValue::from_wire(ValueKind::Int, &Value::Null), None);
    }

    #[test]
    fn from_wire_bounds_timestamps_to_the_store_range() {
        let earliest = KeyValue::from_wire(ValueKind::Timestamp, &Value::from(MIN_TIMESTAMP_MICROS))
            .unwrap();
        match earliest {
            KeyValue::Timestamp(ts) => {
                assert_eq!(ts.format("%Y-%m-%d").to_string(), "-4713-11-24")
            }
            other => panic!("unexpected value {other:?}"),
        }

        assert_eq!(
            KeyValue::from_wire(ValueKind::Timestamp, &Value::from(MIN_TIMESTAMP_MICROS - 1)),
            None
        );
        assert_eq!(
            KeyValue::from_wire(ValueKind::Timestamp, &Value::from(i64::MIN)),
            None
        );
    }
}
