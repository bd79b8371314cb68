//! Row materializer over a borrowed cursor

use std::collections::HashMap;

use recordset_codec::{DecodeKind, DecodeTarget, NullMode, RecordsetSettings, TypeMap, Value};
use tracing::{debug, trace, warn};

use crate::cursor::Cursor;
use crate::error::{MetadataStep, RecordsetError, Result};

/// Array-form row: one value per column, in column order.
pub type Row = Vec<Value>;

/// Map-form row: column name -> value, NULL cells omitted.
pub type RowMap = HashMap<String, Value>;

/// Materializes an open cursor into generic rows.
///
/// The cursor is borrowed: whoever opened it closes it, whether
/// materialization succeeded or not. Both [`Recordset::query`] and
/// [`Recordset::query_as_map`] drain the cursor; a recordset is meant to be
/// used once.
pub struct Recordset<'c, C: Cursor> {
    cursor: Option<&'c mut C>,
    type_map: TypeMap,
    null_mode: NullMode,
}

impl<'c, C: Cursor> Recordset<'c, C> {
    pub fn new(cursor: &'c mut C) -> Self {
        Self::from_option(Some(cursor))
    }

    pub fn from_option(cursor: Option<&'c mut C>) -> Self {
        Self {
            cursor,
            type_map: TypeMap::default(),
            null_mode: NullMode::default(),
        }
    }

    /// Recordset without a cursor; both operations fail with `InvalidInput`.
    pub fn unset() -> Self {
        Self::from_option(None)
    }

    #[must_use]
    pub fn with_type_map(mut self, type_map: TypeMap) -> Self {
        self.type_map = type_map;
        self
    }

    #[must_use]
    pub fn with_null_mode(mut self, null_mode: NullMode) -> Self {
        self.null_mode = null_mode;
        self
    }

    #[must_use]
    pub fn with_settings(self, settings: &RecordsetSettings) -> Self {
        self.with_type_map(settings.type_map())
            .with_null_mode(settings.null_mode)
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    pub fn null_mode(&self) -> NullMode {
        self.null_mode
    }

    /// Materialize every row as a fixed-length sequence of values.
    ///
    /// Each column's decode kind comes from its declared type name through the
    /// type map. A NULL in a typed column becomes that kind's zero value (or
    /// `Value::Null` under [`NullMode::Preserve`]); raw columns pass the
    /// driver value through unchanged.
    pub fn query(&mut self) -> Result<Vec<Row>> {
        let cursor = self.cursor.as_deref_mut().ok_or_else(unset_cursor)?;
        let type_map = &self.type_map;
        let null_mode = self.null_mode;

        let columns = cursor.columns().map_err(|e| {
            warn!(error = %e, "failed to get column names");
            RecordsetError::metadata(MetadataStep::ColumnNames, e)
        })?;
        let column_types = cursor.column_types().map_err(|e| {
            warn!(error = %e, "failed to get column types");
            RecordsetError::metadata(MetadataStep::ColumnTypes, e)
        })?;
        if column_types.len() != columns.len() {
            warn!(
                columns = columns.len(),
                types = column_types.len(),
                "column type count mismatch"
            );
            return Err(RecordsetError::metadata(
                MetadataStep::ColumnTypes,
                format!(
                    "cursor reported {} column types for {} columns",
                    column_types.len(),
                    columns.len()
                ),
            ));
        }

        let kinds: Vec<DecodeKind> = column_types
            .iter()
            .map(|type_name| type_map.resolve(type_name))
            .collect();
        debug!(columns = columns.len(), "materializing rows");

        let mut rows = Vec::new();
        while cursor.next_row() {
            let mut targets: Vec<DecodeTarget> =
                kinds.iter().copied().map(DecodeTarget::new).collect();
            cursor.scan(&mut targets).map_err(|e| {
                warn!(row = rows.len(), error = %e, "failed to scan row");
                RecordsetError::scan(rows.len(), e)
            })?;

            let row: Row = targets
                .into_iter()
                .map(|target| target.into_value(null_mode))
                .collect();
            trace!(row = rows.len(), "materialized row");
            rows.push(row);
        }

        check_iteration(cursor)?;
        debug!(rows = rows.len(), "materialized rows");
        Ok(rows)
    }

    /// Materialize every row as a column name -> value mapping.
    ///
    /// All columns are decoded raw. A cell whose decoded value is the
    /// driver's NULL is left out of its row's map, and when two columns share
    /// a name the later one wins.
    pub fn query_as_map(&mut self) -> Result<Vec<RowMap>> {
        let cursor = self.cursor.as_deref_mut().ok_or_else(unset_cursor)?;

        let columns = cursor.columns().map_err(|e| {
            warn!(error = %e, "failed to get column names");
            RecordsetError::metadata(MetadataStep::ColumnNames, e)
        })?;
        debug!(columns = columns.len(), "materializing rows as maps");

        let mut targets = vec![DecodeTarget::new(DecodeKind::Raw); columns.len()];
        let mut rows = Vec::new();
        while cursor.next_row() {
            cursor.scan(&mut targets).map_err(|e| {
                warn!(row = rows.len(), error = %e, "failed to scan row");
                RecordsetError::scan(rows.len(), e)
            })?;

            let mut row = RowMap::with_capacity(columns.len());
            for (name, target) in columns.iter().zip(&targets) {
                let value = target.value();
                if !value.is_null() {
                    row.insert(name.clone(), value);
                }
            }
            trace!(row = rows.len(), keys = row.len(), "materialized row");
            rows.push(row);
        }

        check_iteration(cursor)?;
        debug!(rows = rows.len(), "materialized rows");
        Ok(rows)
    }
}

fn unset_cursor() -> RecordsetError {
    warn!("recordset has no cursor");
    RecordsetError::InvalidInput("cursor is not set".into())
}

fn check_iteration<C: Cursor + ?Sized>(cursor: &mut C) -> Result<()> {
    match cursor.take_error() {
        Some(e) => {
            warn!(error = %e, "error during row iteration");
            Err(RecordsetError::Iteration(Box::new(e)))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCursor;
    use chrono::NaiveDate;
    use recordset_codec::{encode, zero_timestamp};
    use serde_json::json;

    /// ("id" BIGINT, "name" VARCHAR), row 2 has a NULL name
    fn people() -> MemoryCursor {
        MemoryCursor::new([("id", "BIGINT"), ("name", "VARCHAR")])
            .row([Value::Int(1), Value::from("Alice")])
            .row([Value::Int(2), Value::Null])
            .row([Value::Int(3), Value::from("Carol")])
    }

    #[test]
    fn test_query_people() {
        let mut cursor = people();
        let rows = Recordset::new(&mut cursor).query().unwrap();

        assert_eq!(
            rows,
            vec![
                vec![Value::Int(1), Value::from("Alice")],
                vec![Value::Int(2), Value::from("")],
                vec![Value::Int(3), Value::from("Carol")],
            ]
        );
        assert_eq!(encode::rows_to_json(&rows), json!([[1, "Alice"], [2, ""], [3, "Carol"]]));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_query_as_map_people() {
        let mut cursor = people();
        let rows = Recordset::new(&mut cursor).query_as_map().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 1);
        assert!(!rows[1].contains_key("name"));
        assert_eq!(
            encode::maps_to_json(&rows),
            json!([{"id": 1, "name": "Alice"}, {"id": 2}, {"id": 3, "name": "Carol"}])
        );
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_zero_rows() {
        let mut cursor = MemoryCursor::new([("id", "BIGINT")]);
        assert!(Recordset::new(&mut cursor).query().unwrap().is_empty());

        let mut cursor = MemoryCursor::new([("id", "BIGINT")]);
        assert!(Recordset::new(&mut cursor).query_as_map().unwrap().is_empty());
    }

    #[test]
    fn test_unset_cursor_is_invalid_input() {
        let err = Recordset::<MemoryCursor>::unset().query().unwrap_err();
        assert!(matches!(err, RecordsetError::InvalidInput(_)));
    }

    #[test]
    fn test_unset_cursor_map_form_also_rejected() {
        // The array form has always rejected a missing cursor; the map form
        // now does the same rather than failing on the metadata call.
        let err = Recordset::<MemoryCursor>::from_option(None)
            .query_as_map()
            .unwrap_err();
        assert!(matches!(err, RecordsetError::InvalidInput(_)));
    }

    #[test]
    fn test_null_in_every_recognized_type_is_zero() {
        let columns = [
            ("s", "VARCHAR"),
            ("t", "TEXT"),
            ("c", "CHAR"),
            ("u", "UUID"),
            ("b", "BOOL"),
            ("i", "INT"),
            ("bi", "BIGINT"),
            ("si", "SMALLINT"),
            ("f", "FLOAT"),
            ("d", "DOUBLE"),
            ("dec", "DECIMAL"),
            ("ts", "TIMESTAMP"),
            ("dt", "DATETIME"),
            ("day", "DATE"),
        ];
        let nulls = vec![Value::Null; columns.len()];

        let mut cursor = MemoryCursor::new(columns).row(nulls.clone());
        let rows = Recordset::new(&mut cursor).query().unwrap();
        let zero_ts = Value::Timestamp(zero_timestamp());
        assert_eq!(
            rows[0],
            vec![
                Value::from(""),
                Value::from(""),
                Value::from(""),
                Value::from(""),
                Value::Bool(false),
                Value::Int(0),
                Value::Int(0),
                Value::Int(0),
                Value::Float(0.0),
                Value::Float(0.0),
                Value::Float(0.0),
                zero_ts.clone(),
                zero_ts.clone(),
                zero_ts,
            ]
        );

        let mut cursor = MemoryCursor::new(columns).row(nulls);
        let maps = Recordset::new(&mut cursor).query_as_map().unwrap();
        assert_eq!(maps.len(), 1);
        assert!(maps[0].is_empty());
    }

    #[test]
    fn test_present_values_per_kind() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let mut cursor = MemoryCursor::new([
            ("active", "BOOL"),
            ("score", "DOUBLE"),
            ("created", "TIMESTAMP"),
        ])
        .row([Value::Bool(true), Value::Float(9.5), Value::Timestamp(ts)]);

        let rows = Recordset::new(&mut cursor).query().unwrap();
        assert_eq!(
            rows,
            vec![vec![Value::Bool(true), Value::Float(9.5), Value::Timestamp(ts)]]
        );
    }

    #[test]
    fn test_unrecognized_type_passes_raw_value() {
        let columns = [("payload", "JSONB"), ("blob", "BYTEA"), ("n", "INTEGER")];
        let mut cursor = MemoryCursor::new(columns)
            .row([Value::from("{\"a\":1}"), Value::Bytes(vec![1, 2, 3]), Value::Null])
            .row([Value::Int(5), Value::Null, Value::Int(7)]);

        let rows = Recordset::new(&mut cursor).query().unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Value::from("{\"a\":1}"), Value::Bytes(vec![1, 2, 3]), Value::Null],
                vec![Value::Int(5), Value::Null, Value::Int(7)],
            ]
        );
    }

    #[test]
    fn test_type_names_are_case_sensitive() {
        let mut cursor = MemoryCursor::new([("name", "varchar")]).row([Value::Null]);
        let rows = Recordset::new(&mut cursor).query().unwrap();
        assert_eq!(rows, vec![vec![Value::Null]]);
    }

    #[test]
    fn test_type_map_override() {
        let mut cursor = MemoryCursor::new([("n", "INTEGER"), ("name", "VARCHAR")])
            .row([Value::Null, Value::Null]);
        let map = TypeMap::default()
            .with("INTEGER", DecodeKind::Int)
            .without("VARCHAR");

        let rows = Recordset::new(&mut cursor)
            .with_type_map(map)
            .query()
            .unwrap();
        assert_eq!(rows, vec![vec![Value::Int(0), Value::Null]]);
    }

    #[test]
    fn test_preserve_null_mode() {
        let mut cursor = people();
        let rows = Recordset::new(&mut cursor)
            .with_null_mode(NullMode::Preserve)
            .query()
            .unwrap();
        assert_eq!(rows[1], vec![Value::Int(2), Value::Null]);
    }

    #[test]
    fn test_with_settings() {
        let settings = RecordsetSettings::from_json(
            r#"{"type_overrides": {"INTEGER": "int"}, "null_mode": "preserve"}"#,
        )
        .unwrap();
        let mut cursor = MemoryCursor::new([("n", "INTEGER")]).row([Value::Null]);
        let mut recordset = Recordset::new(&mut cursor).with_settings(&settings);

        assert_eq!(recordset.type_map().resolve("INTEGER"), DecodeKind::Int);
        assert_eq!(recordset.null_mode(), NullMode::Preserve);
        assert_eq!(recordset.query().unwrap(), vec![vec![Value::Null]]);
    }

    #[test]
    fn test_row_order_and_length() {
        let mut cursor = MemoryCursor::new([("a", "INT"), ("b", "INT"), ("c", "INT")]);
        for i in 0..20 {
            cursor = cursor.row([Value::Int(i), Value::Null, Value::Int(-i)]);
        }
        let rows = Recordset::new(&mut cursor).query().unwrap();

        assert_eq!(rows.len(), 20);
        for (i, row) in (0_i64..).zip(&rows) {
            assert_eq!(row.len(), 3);
            assert_eq!(row[0], Value::Int(i));
            assert_eq!(row[2], Value::Int(-i));
        }
    }

    #[test]
    fn test_scan_failure_returns_no_rows() {
        let mut cursor = people().fail_scan_at(1, "bad bytes");
        let err = Recordset::new(&mut cursor).query().unwrap_err();
        assert!(matches!(err, RecordsetError::Scan { row: 1, .. }));
        assert!(err.to_string().contains("bad bytes"));

        let mut cursor = people().fail_scan_at(2, "bad bytes");
        let err = Recordset::new(&mut cursor).query_as_map().unwrap_err();
        assert!(matches!(err, RecordsetError::Scan { row: 2, .. }));
    }

    #[test]
    fn test_uncoercible_value_is_scan_failure() {
        let mut cursor = MemoryCursor::new([("id", "BIGINT")])
            .row([Value::Int(1)])
            .row([Value::from("two")]);
        let err = Recordset::new(&mut cursor).query().unwrap_err();
        assert!(matches!(err, RecordsetError::Scan { row: 1, .. }));
    }

    #[test]
    fn test_metadata_failures() {
        let mut cursor = people().fail_columns("closed");
        let err = Recordset::new(&mut cursor).query().unwrap_err();
        assert!(matches!(
            err,
            RecordsetError::Metadata { step: MetadataStep::ColumnNames, .. }
        ));
        assert_eq!(err.to_string(), "Failed to get column names: closed");

        let mut cursor = people().fail_column_types("no types");
        let err = Recordset::new(&mut cursor).query().unwrap_err();
        assert!(matches!(
            err,
            RecordsetError::Metadata { step: MetadataStep::ColumnTypes, .. }
        ));

        let mut cursor = people().fail_columns("closed");
        let err = Recordset::new(&mut cursor).query_as_map().unwrap_err();
        assert!(matches!(
            err,
            RecordsetError::Metadata { step: MetadataStep::ColumnNames, .. }
        ));
    }

    #[test]
    fn test_map_form_ignores_column_types() {
        let mut cursor = people().fail_column_types("no types");
        let rows = Recordset::new(&mut cursor).query_as_map().unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_deferred_iteration_error() {
        let mut cursor = people().fail_after_rows("connection reset");
        let err = Recordset::new(&mut cursor).query().unwrap_err();
        assert!(matches!(err, RecordsetError::Iteration(_)));
        assert_eq!(err.to_string(), "Error during row iteration: connection reset");

        let mut cursor = people().fail_after_rows("connection reset");
        let err = Recordset::new(&mut cursor).query_as_map().unwrap_err();
        assert!(matches!(err, RecordsetError::Iteration(_)));
    }

    #[test]
    fn test_duplicate_column_names_last_wins() {
        let mut cursor = MemoryCursor::new([("id", "BIGINT"), ("id", "BIGINT")])
            .row([Value::Int(1), Value::Int(2)])
            .row([Value::Int(3), Value::Null]);
        let rows = Recordset::new(&mut cursor).query_as_map().unwrap();

        assert_eq!(rows[0]["id"], Value::Int(2));
        // A NULL in the later column leaves the earlier value in place.
        assert_eq!(rows[1]["id"], Value::Int(3));
    }
}
