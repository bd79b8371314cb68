//! Materializer settings loadable from JSON

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::kind::{DecodeKind, TypeMap};
use crate::target::NullMode;

/// Serializable description of a [`TypeMap`] and [`NullMode`].
///
/// ```json
/// {
///   "type_overrides": {"INTEGER": "int", "INT8": "int"},
///   "removed_types": ["UUID"],
///   "null_mode": "preserve"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsetSettings {
    /// Start from the built-in type table instead of an empty one.
    pub use_default_types: bool,
    pub type_overrides: HashMap<String, DecodeKind>,
    pub removed_types: Vec<String>,
    pub fallback: DecodeKind,
    pub null_mode: NullMode,
}

impl Default for RecordsetSettings {
    fn default() -> Self {
        Self {
            use_default_types: true,
            type_overrides: HashMap::new(),
            removed_types: Vec::new(),
            fallback: DecodeKind::Raw,
            null_mode: NullMode::Zero,
        }
    }
}

impl RecordsetSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CodecError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Effective type map: base table, then removals, then overrides.
    pub fn type_map(&self) -> TypeMap {
        let mut map = if self.use_default_types {
            TypeMap::default()
        } else {
            TypeMap::empty()
        };
        for name in &self.removed_types {
            map.remove(name);
        }
        for (name, kind) in &self.type_overrides {
            map.insert(name.clone(), *kind);
        }
        map.with_fallback(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_table() {
        let settings = RecordsetSettings::default();
        assert_eq!(settings.type_map(), TypeMap::default());
        assert_eq!(settings.null_mode, NullMode::Zero);
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "type_overrides": {"INTEGER": "int"},
            "removed_types": ["UUID"],
            "null_mode": "preserve"
        }"#;
        let settings = RecordsetSettings::from_json(json).unwrap();

        assert!(settings.use_default_types);
        assert_eq!(settings.null_mode, NullMode::Preserve);

        let map = settings.type_map();
        assert_eq!(map.resolve("INTEGER"), DecodeKind::Int);
        assert_eq!(map.resolve("UUID"), DecodeKind::Raw);
        assert_eq!(map.resolve("VARCHAR"), DecodeKind::String);
    }

    #[test]
    fn test_without_default_types() {
        let json = r#"{
            "use_default_types": false,
            "fallback": "string",
            "type_overrides": {"INT8": "int"}
        }"#;
        let settings = RecordsetSettings::from_json(json).unwrap();
        let map = settings.type_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve("INT8"), DecodeKind::Int);
        assert_eq!(map.resolve("BIGINT"), DecodeKind::String);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = RecordsetSettings::default();
        settings.type_overrides.insert("NUMERIC".into(), DecodeKind::Float);
        let json = settings.to_json().unwrap();
        assert_eq!(RecordsetSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json() {
        let err = RecordsetSettings::from_json(r#"{"null_mode": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Serialization(_)));
    }
}
