//! Declared type name -> decode kind dispatch

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Decode target selected for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeKind {
    String,
    Bool,
    Int,
    Float,
    Timestamp,
    /// Untyped target; receives whatever the driver hands over, NULL included.
    Raw,
}

impl DecodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Raw => "raw",
        }
    }

    pub const fn is_typed(self) -> bool {
        !matches!(self, Self::Raw)
    }
}

impl fmt::Display for DecodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecodeKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "timestamp" => Ok(Self::Timestamp),
            "raw" => Ok(Self::Raw),
            other => Err(CodecError::UnknownKind(other.to_string())),
        }
    }
}

const DEFAULT_TYPES: &[(&str, DecodeKind)] = &[
    ("VARCHAR", DecodeKind::String),
    ("TEXT", DecodeKind::String),
    ("CHAR", DecodeKind::String),
    ("UUID", DecodeKind::String),
    ("BOOL", DecodeKind::Bool),
    ("INT", DecodeKind::Int),
    ("BIGINT", DecodeKind::Int),
    ("SMALLINT", DecodeKind::Int),
    ("FLOAT", DecodeKind::Float),
    ("DOUBLE", DecodeKind::Float),
    ("DECIMAL", DecodeKind::Float),
    ("TIMESTAMP", DecodeKind::Timestamp),
    ("DATETIME", DecodeKind::Timestamp),
    ("DATE", DecodeKind::Timestamp),
];

/// Mapping from driver-reported type names to decode kinds.
///
/// Lookups are exact and case-sensitive: `"varchar"` does not match the
/// `"VARCHAR"` entry. Names without an entry resolve to the fallback kind,
/// which is [`DecodeKind::Raw`] unless overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    entries: HashMap<String, DecodeKind>,
    fallback: DecodeKind,
}

impl TypeMap {
    /// Map with no entries; every name resolves to the fallback.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: DecodeKind::Raw,
        }
    }

    #[must_use]
    pub fn with(mut self, type_name: impl Into<String>, kind: DecodeKind) -> Self {
        self.insert(type_name, kind);
        self
    }

    #[must_use]
    pub fn without(mut self, type_name: &str) -> Self {
        self.remove(type_name);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, kind: DecodeKind) -> Self {
        self.fallback = kind;
        self
    }

    pub fn insert(&mut self, type_name: impl Into<String>, kind: DecodeKind) -> Option<DecodeKind> {
        self.entries.insert(type_name.into(), kind)
    }

    pub fn remove(&mut self, type_name: &str) -> Option<DecodeKind> {
        self.entries.remove(type_name)
    }

    pub fn resolve(&self, type_name: &str) -> DecodeKind {
        self.entries
            .get(type_name)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub const fn fallback(&self) -> DecodeKind {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        DEFAULT_TYPES
            .iter()
            .fold(Self::empty(), |map, (name, kind)| map.with(*name, *kind))
    }
}
