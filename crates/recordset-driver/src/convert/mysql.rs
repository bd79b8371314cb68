//! MySQL cell decoding

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use recordset_codec::{DecodeKind, DecodeTarget, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{mysql::MySqlRow, Row, ValueRef};
use uuid::Uuid;

use super::{midnight, DecodeRow, TIME_FORMAT};

impl DecodeRow for MySqlRow {
    fn decode_cell(&self, idx: usize, kind: DecodeKind) -> Result<DecodeTarget, sqlx::Error> {
        decode_mysql_cell(self, idx, kind)
    }
}

pub fn decode_mysql_cell(
    row: &MySqlRow,
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
            .or_else(|_| {
                row.try_get::<Option<i64>, _>(idx)
                    .map(|v| v.map(|i| i.to_string()))
            })
            .map(DecodeTarget::String),
        // BOOL is TINYINT(1) on the wire
        DecodeKind::Bool => row
            .try_get::<Option<bool>, _>(idx)
            .or_else(|_| row.try_get::<Option<i64>, _>(idx).map(|v| v.map(|i| i != 0)))
            .map(DecodeTarget::Bool),
        DecodeKind::Int => row
            .try_get::<Option<i64>, _>(idx)
            .or_else(|_| {
                row.try_get::<Option<u64>, _>(idx)?
                    .map(|v| i64::try_from(v).map_err(|e| sqlx::Error::Decode(Box::new(e))))
                    .transpose()
            })
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
        DecodeKind::Raw => decode_mysql_raw(row, idx).map(DecodeTarget::Raw),
    }
}

fn decode_mysql_raw(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Ok(Value::Int(v));
    }
    if let Ok(v) = row.try_get::<u64, _>(idx) {
        return Ok(i64::try_from(v).map_or_else(|_| Value::String(v.to_string()), Value::Int));
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Ok(Value::Float(v));
    }
    if let Ok(v) = row.try_get::<f32, _>(idx) {
        return Ok(Value::Float(f64::from(v)));
    }
    // DECIMAL: preserve precision by returning as string
    if let Ok(v) = row.try_get::<Decimal, _>(idx) {
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
    if let Ok(v) = row.try_get::<serde_json::Value, _>(idx) {
        return Ok(Value::String(v.to_string()));
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Ok(Value::String(v));
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
        return Ok(Value::Bytes(v));
    }
    // Unlisted type: hand over the wire bytes without a type check
    row.try_get_unchecked::<Vec<u8>, _>(idx).map(Value::Bytes)
}
