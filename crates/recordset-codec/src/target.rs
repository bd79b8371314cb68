//! Per-column decode targets

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::kind::DecodeKind;
use crate::value::Value;

/// How a NULL in a typed column is rendered in array-form rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullMode {
    /// NULL becomes the zero value of the column's kind (`""`, `0`, `false`, ...).
    #[default]
    Zero,
    /// NULL stays `Value::Null`.
    Preserve,
}

/// Container a cursor decodes one cell into.
///
/// Typed variants are nullable wrappers: `None` means the cell was SQL NULL.
/// `Raw` carries the driver value as-is, with NULL as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeTarget {
    String(Option<String>),
    Bool(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Timestamp(Option<NaiveDateTime>),
    Raw(Value),
}

impl DecodeTarget {
    /// Empty target for a decode kind.
    pub const fn new(kind: DecodeKind) -> Self {
        match kind {
            DecodeKind::String => Self::String(None),
            DecodeKind::Bool => Self::Bool(None),
            DecodeKind::Int => Self::Int(None),
            DecodeKind::Float => Self::Float(None),
            DecodeKind::Timestamp => Self::Timestamp(None),
            DecodeKind::Raw => Self::Raw(Value::Null),
        }
    }

    pub const fn kind(&self) -> DecodeKind {
        match self {
            Self::String(_) => DecodeKind::String,
            Self::Bool(_) => DecodeKind::Bool,
            Self::Int(_) => DecodeKind::Int,
            Self::Float(_) => DecodeKind::Float,
            Self::Timestamp(_) => DecodeKind::Timestamp,
            Self::Raw(_) => DecodeKind::Raw,
        }
    }

    pub const fn is_null(&self) -> bool {
        match self {
            Self::String(v) => v.is_none(),
            Self::Bool(v) => v.is_none(),
            Self::Int(v) => v.is_none(),
            Self::Float(v) => v.is_none(),
            Self::Timestamp(v) => v.is_none(),
            Self::Raw(v) => v.is_null(),
        }
    }

    /// Store a decoded value, keeping the target's kind.
    ///
    /// `Value::Null` clears a typed target. A value of another type is
    /// rejected; raw targets accept anything.
    pub fn set(&mut self, value: Value) -> Result<()> {
        let kind = self.kind();
        *self = match (kind, value) {
            (DecodeKind::Raw, v) => Self::Raw(v),
            (kind, Value::Null) => Self::new(kind),
            (DecodeKind::String, Value::String(v)) => Self::String(Some(v)),
            (DecodeKind::Bool, Value::Bool(v)) => Self::Bool(Some(v)),
            (DecodeKind::Int, Value::Int(v)) => Self::Int(Some(v)),
            (DecodeKind::Float, Value::Float(v)) => Self::Float(Some(v)),
            (DecodeKind::Timestamp, Value::Timestamp(v)) => Self::Timestamp(Some(v)),
            (kind, other) => {
                return Err(CodecError::TypeMismatch {
                    expected: kind,
                    found: other.type_name(),
                })
            }
        };
        Ok(())
    }

    /// Copy of the decoded value; typed NULLs read as `Value::Null`.
    pub fn value(&self) -> Value {
        self.clone().into_value(NullMode::Preserve)
    }

    /// Collapse the target into a cell value.
    pub fn into_value(self, null_mode: NullMode) -> Value {
        let kind = self.kind();
        let value = match self {
            Self::String(v) => v.map(Value::String),
            Self::Bool(v) => v.map(Value::Bool),
            Self::Int(v) => v.map(Value::Int),
            Self::Float(v) => v.map(Value::Float),
            Self::Timestamp(v) => v.map(Value::Timestamp),
            Self::Raw(v) => return v,
        };
        match (value, null_mode) {
            (Some(v), _) => v,
            (None, NullMode::Zero) => Value::zero(kind),
            (None, NullMode::Preserve) => Value::Null,
        }
    }
}
