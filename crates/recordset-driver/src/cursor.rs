//! Cursor over rows fetched by sqlx

use futures::{Stream, StreamExt};
use recordset_codec::DecodeTarget;
use recordset_core::Cursor;
use sqlx::{Column, Row, TypeInfo};
use tracing::debug;

use crate::convert::DecodeRow;
use crate::error::{DriverError, Result};

/// Column name and driver-reported type name, as sqlx describes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Columns of a row. Type names are passed through unchanged.
    pub fn of_row<R: Row>(row: &R) -> Vec<Self> {
        row.columns()
            .iter()
            .map(|column| Self::new(column.name(), column.type_info().name()))
            .collect()
    }
}

/// [`Cursor`] over rows an external layer already fetched with sqlx.
///
/// Column metadata is read from the first row unless given explicitly, which
/// is the only way a zero-row result can report its columns. A stream that
/// failed partway keeps the rows it produced and reports the failure from
/// [`Cursor::take_error`] after the last of them.
pub struct RowsCursor<R> {
    columns: Option<Vec<ColumnInfo>>,
    rows: Vec<R>,
    position: Option<usize>,
    deferred: Option<sqlx::Error>,
}

impl<R: DecodeRow> RowsCursor<R> {
    pub const fn new(rows: Vec<R>) -> Self {
        Self {
            columns: None,
            rows,
            position: None,
            deferred: None,
        }
    }

    pub const fn with_columns(columns: Vec<ColumnInfo>, rows: Vec<R>) -> Self {
        Self {
            columns: Some(columns),
            rows,
            position: None,
            deferred: None,
        }
    }

    /// Take rows until the first error, which becomes the deferred error.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<R, sqlx::Error>>,
    {
        let mut cursor = Self::new(Vec::new());
        for result in results {
            match result {
                Ok(row) => cursor.rows.push(row),
                Err(e) => {
                    cursor.deferred = Some(e);
                    break;
                }
            }
        }
        cursor
    }

    /// Drain a sqlx `fetch` stream the same way as [`RowsCursor::from_results`].
    pub async fn collect<S>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<R, sqlx::Error>>,
    {
        let mut stream = std::pin::pin!(stream);
        let mut cursor = Self::new(Vec::new());
        while let Some(result) = stream.next().await {
            match result {
                Ok(row) => cursor.rows.push(row),
                Err(e) => {
                    debug!(rows = cursor.rows.len(), error = %e, "row stream failed");
                    cursor.deferred = Some(e);
                    break;
                }
            }
        }
        cursor
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.position.is_some_and(|pos| pos >= self.rows.len())
    }

    fn column_info(&self) -> Vec<ColumnInfo> {
        match (&self.columns, self.rows.first()) {
            (Some(columns), _) => columns.clone(),
            (None, Some(row)) => ColumnInfo::of_row(row),
            (None, None) => Vec::new(),
        }
    }
}

impl<R: DecodeRow> Cursor for RowsCursor<R> {
    type Error = DriverError;

    fn columns(&self) -> Result<Vec<String>> {
        Ok(self.column_info().into_iter().map(|c| c.name).collect())
    }

    fn column_types(&self) -> Result<Vec<String>> {
        Ok(self.column_info().into_iter().map(|c| c.type_name).collect())
    }

    fn next_row(&mut self) -> bool {
        let next = self.position.map_or(0, |pos| pos + 1);
        self.position = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    fn scan(&mut self, targets: &mut [DecodeTarget]) -> Result<()> {
        let row = self
            .position
            .and_then(|pos| self.rows.get(pos))
            .ok_or(DriverError::NoCurrentRow)?;

        let expected = row.len();
        if targets.len() != expected {
            return Err(DriverError::TargetCount {
                expected,
                found: targets.len(),
            });
        }
        for (idx, target) in targets.iter_mut().enumerate() {
            *target = row
                .decode_cell(idx, target.kind())
                .map_err(|source| DriverError::Decode {
                    column: idx,
                    source,
                })?;
        }
        Ok(())
    }

    fn take_error(&mut self) -> Option<DriverError> {
        self.deferred.take().map(DriverError::from)
    }
}
