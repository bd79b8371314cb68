//! PostgreSQL cell decoding

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use recordset_codec::{DecodeKind, DecodeTarget, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Row, ValueRef};
use uuid::Uuid;

use super::{midnight, DecodeRow, TIME_FORMAT};

impl DecodeRow for PgRow {
    fn decode_cell(&self, idx: usize, kind: DecodeKind) -> Result<DecodeTarget, sqlx::Error> {
        decode_pg_cell(self, idx, kind)
    }
}

pub fn decode_pg_cell(
    row: &PgRow,
    idx: usize,
    kind: DecodeKind,
) -> Result<DecodeTarget, sqlx::Error> {
    match kind {
        DecodeKind::String => row
            .try_get::<Option<String>, _>(idx)
            .or_else(|_| {
                row.try_get::<Option<Uuid>, _>(idx)
                    .map(|v| v.map(|u| u.to_string()))
            })
            .map(DecodeTarget::String),
        DecodeKind::Bool => row.try_get::<Option<bool>, _>(idx).map(DecodeTarget::Bool),
        // Postgres integers are strictly sized; widen INT4/INT2 to i64.
        DecodeKind::Int => row
            .try_get::<Option<i64>, _>(idx)
            .or_else(|_| row.try_get::<Option<i32>, _>(idx).map(|v| v.map(i64::from)))
            .or_else(|_| row.try_get::<Option<i16>, _>(idx).map(|v| v.map(i64::from)))
            .map(DecodeTarget::Int),
        DecodeKind::Float => row
            .try_get::<Option<f64>, _>(idx)
            .or_else(|_| row.try_get::<Option<f32>, _>(idx).map(|v| v.map(f64::from)))
            .or_else(|_| {
                row.try_get::<Option<Decimal>, _>(idx)
                    .map(|v| v.and_then(|d| d.to_f64()))
            })
            .map(DecodeTarget::Float),
        DecodeKind::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(idx)
            .or_else(|_| {
                row.try_get::<Option<DateTime<Utc>>, _>(idx)
                    .map(|v| v.map(|dt| dt.naive_utc()))
            })
            .or_else(|_| {
                row.try_get::<Option<NaiveDate>, _>(idx)
                    .map(|v| v.and_then(midnight))
            })
            .map(DecodeTarget::Timestamp),
        DecodeKind::Raw => decode_pg_raw(row, idx).map(DecodeTarget::Raw),
    }
}

fn decode_pg_raw(row: &PgRow, idx: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(v) = row.try_get::<bool, _>(idx) {
        return Ok(Value::Bool(v));
    }
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Ok(Value::Int(v));
    }
    if let Ok(v) = row.try_get::<i32, _>(idx) {
        return Ok(Value::Int(i64::from(v)));
    }
    if let Ok(v) = row.try_get::<i16, _>(idx) {
        return Ok(Value::Int(i64::from(v)));
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Ok(Value::Float(v));
    }
    if let Ok(v) = row.try_get::<f32, _>(idx) {
        return Ok(Value::Float(f64::from(v)));
    }
    // NUMERIC: preserve precision by returning as string
    if let Ok(v) = row.try_get::<Decimal, _>(idx) {
        return Ok(Value::String(v.to_string()));
    }
    if let Ok(v) = row.try_get::<Uuid, _>(idx) {
        return Ok(Value::String(v.to_string()));
    }
    if let Ok(v) = row.try_get::<serde_json::Value, _>(idx) {
        return Ok(Value::String(v.to_string()));
    }
    if let Ok(v) = row.try_get::<NaiveDateTime, _>(idx) {
        return Ok(Value::Timestamp(v));
    }
    if let Ok(v) = row.try_get::<DateTime<Utc>, _>(idx) {
        return Ok(Value::Timestamp(v.naive_utc()));
    }
    if let Ok(v) = row.try_get::<NaiveDate, _>(idx) {
        return Ok(midnight(v).map_or(Value::Null, Value::Timestamp));
    }
    if let Ok(v) = row.try_get::<NaiveTime, _>(idx) {
        return Ok(Value::String(v.format(TIME_FORMAT).to_string()));
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Ok(Value::String(v));
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
        return Ok(Value::Bytes(v));
    }
    // INTERVAL, INET, MONEY, arrays, enums: pass the binary encoding through
    row.try_get_unchecked::<Vec<u8>, _>(idx).map(Value::Bytes)
}
