//! JSON and MessagePack encoding of materialized result sets

use std::collections::HashMap;

use crate::error::{CodecError, Result};
use crate::value::Value;

/// Array-form rows as a JSON array of arrays.
pub fn rows_to_json(rows: &[Vec<Value>]) -> serde_json::Value {
    serde_json::Value::Array(
        rows.iter()
            .map(|row| serde_json::Value::Array(row.iter().map(Value::to_json).collect()))
            .collect(),
    )
}

/// Map-form rows as a JSON array of objects.
pub fn maps_to_json(rows: &[HashMap<String, Value>]) -> serde_json::Value {
    serde_json::Value::Array(
        rows.iter()
            .map(|row| {
                serde_json::Value::Object(
                    row.iter()
                        .map(|(name, value)| (name.clone(), value.to_json()))
                        .collect(),
                )
            })
            .collect(),
    )
}

pub fn rows_to_msgpack(rows: &[Vec<Value>]) -> Result<Vec<u8>> {
    rmp_serde::to_vec(rows).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Maps are written as MessagePack maps keyed by column name.
pub fn maps_to_msgpack(rows: &[HashMap<String, Value>]) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(rows).map_err(|e| CodecError::Serialization(e.to_string()))
}
