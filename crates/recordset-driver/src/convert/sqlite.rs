//! SQLite cell decoding

use chrono::{NaiveDate, NaiveDateTime};
use recordset_codec::{DecodeKind, DecodeTarget, Value};
use sqlx::{sqlite::SqliteRow, Row, ValueRef};
use uuid::Uuid;

use super::{midnight, DecodeRow};

impl DecodeRow for SqliteRow {
    fn decode_cell(&self, idx: usize, kind: DecodeKind) -> Result<DecodeTarget, sqlx::Error> {
        decode_sqlite_cell(self, idx, kind)
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn decode_sqlite_cell(
    row: &SqliteRow,
    idx: usize,
    kind: DecodeKind,
) -> Result<DecodeTarget, sqlx::Error> {
    match kind {
        // sqlx binds a Uuid as a 16-byte BLOB
        DecodeKind::String => row
            .try_get::<Option<String>, _>(idx)
            .or_else(|_| {
                row.try_get::<Option<Uuid>, _>(idx)
                    .map(|v| v.map(|u| u.to_string()))
            })
            .or_else(|_| {
                row.try_get::<Option<i64>, _>(idx)
                    .map(|v| v.map(|i| i.to_string()))
            })
            .or_else(|_| {
                row.try_get::<Option<f64>, _>(idx)
                    .map(|v| v.map(|f| f.to_string()))
            })
            .map(DecodeTarget::String),
        DecodeKind::Bool => row
            .try_get::<Option<bool>, _>(idx)
            .or_else(|_| row.try_get::<Option<i64>, _>(idx).map(|v| v.map(|i| i != 0)))
            .map(DecodeTarget::Bool),
        DecodeKind::Int => row.try_get::<Option<i64>, _>(idx).map(DecodeTarget::Int),
        DecodeKind::Float => row
            .try_get::<Option<f64>, _>(idx)
            .or_else(|_| row.try_get::<Option<i64>, _>(idx).map(|v| v.map(|i| i as f64)))
            .map(DecodeTarget::Float),
        DecodeKind::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(idx)
            .or_else(|_| {
                row.try_get::<Option<NaiveDate>, _>(idx)
                    .map(|v| v.and_then(midnight))
            })
            .map(DecodeTarget::Timestamp),
        DecodeKind::Raw => decode_sqlite_raw(row, idx).map(DecodeTarget::Raw),
    }
}

/// SQLite is dynamically typed: try INTEGER, REAL, TEXT, then BLOB.
fn decode_sqlite_raw(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Ok(Value::Int(v));
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Ok(Value::Float(v));
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Ok(Value::String(v));
    }
    row.try_get::<Vec<u8>, _>(idx).map(Value::Bytes)
}
