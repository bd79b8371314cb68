//! Dynamically typed cell value

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::kind::DecodeKind;

/// Format used when a timestamp leaves the process as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A single materialized cell.
///
/// Typed decode kinds produce `Bool`, `Int`, `Float`, `String` and
/// `Timestamp`. `Null` and `Bytes` only come out of the raw decode kind,
/// which passes the driver's native value through.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Naive wall-clock time. Zoned driver values (`TIMESTAMPTZ`, MySQL
    /// `TIMESTAMP`) are converted to UTC and the offset is dropped.
    Timestamp(NaiveDateTime),
    Bytes(Vec<u8>),
}

/// `0001-01-01T00:00:00`, the zero timestamp.
pub fn zero_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl Value {
    /// Zero value of a decode kind. `Raw` has no type, so its zero is `Null`.
    pub fn zero(kind: DecodeKind) -> Self {
        match kind {
            DecodeKind::String => Self::String(String::new()),
            DecodeKind::Bool => Self::Bool(false),
            DecodeKind::Int => Self::Int(0),
            DecodeKind::Float => Self::Float(0.0),
            DecodeKind::Timestamp => Self::Timestamp(zero_timestamp()),
            DecodeKind::Raw => Self::Null,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Bytes(_) => "bytes",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to a JSON value. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Int(v) => serde_json::Value::Number(serde_json::Number::from(*v)),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::Timestamp(v) => serde_json::Value::String(v.format(TIMESTAMP_FORMAT).to_string()),
            Self::Bytes(v) => serde_json::Value::String(BASE64_STANDARD.encode(v)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Timestamp(v) => serializer.collect_str(&v.format(TIMESTAMP_FORMAT)),
            Self::Bytes(v) => serializer.serialize_str(&BASE64_STANDARD.encode(v)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
