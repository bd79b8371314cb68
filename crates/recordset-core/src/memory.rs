//! In-memory cursor over pre-built rows

use recordset_codec::{DecodeTarget, Value};
use thiserror::Error;

use crate::cursor::Cursor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MemoryCursorError(pub String);

/// Cursor over rows held in memory.
///
/// Useful for materializing data that did not come from a live driver, and
/// for scripting failures: metadata errors, a scan error at a given row, or a
/// deferred error reported after the last row.
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<(String, String)>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
    columns_error: Option<String>,
    column_types_error: Option<String>,
    scan_error: Option<(usize, String)>,
    deferred_error: Option<String>,
}

impl MemoryCursor {
    /// `columns` are `(name, declared type name)` pairs.
    pub fn new<N, T>(columns: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, type_name)| (name.into(), type_name.into()))
                .collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn row(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.rows.push(values.into_iter().collect());
        self
    }

    #[must_use]
    pub fn fail_columns(mut self, message: impl Into<String>) -> Self {
        self.columns_error = Some(message.into());
        self
    }

    #[must_use]
    pub fn fail_column_types(mut self, message: impl Into<String>) -> Self {
        self.column_types_error = Some(message.into());
        self
    }

    /// Fail the scan of the row at 0-based index `row`.
    #[must_use]
    pub fn fail_scan_at(mut self, row: usize, message: impl Into<String>) -> Self {
        self.scan_error = Some((row, message.into()));
        self
    }

    /// Report `message` from [`Cursor::take_error`] once the rows run out.
    #[must_use]
    pub fn fail_after_rows(mut self, message: impl Into<String>) -> Self {
        self.deferred_error = Some(message.into());
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.position.is_some_and(|pos| pos >= self.rows.len())
    }

    fn current(&self) -> Option<(usize, &[Value])> {
        let pos = self.position?;
        self.rows.get(pos).map(|row| (pos, row.as_slice()))
    }
}

impl Cursor for MemoryCursor {
    type Error = MemoryCursorError;

    fn columns(&self) -> Result<Vec<String>, Self::Error> {
        if let Some(message) = &self.columns_error {
            return Err(MemoryCursorError(message.clone()));
        }
        Ok(self.columns.iter().map(|(name, _)| name.clone()).collect())
    }

    fn column_types(&self) -> Result<Vec<String>, Self::Error> {
        if let Some(message) = &self.column_types_error {
            return Err(MemoryCursorError(message.clone()));
        }
        Ok(self.columns.iter().map(|(_, ty)| ty.clone()).collect())
    }

    fn next_row(&mut self) -> bool {
        let next = self.position.map_or(0, |pos| pos + 1);
        self.position = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    fn scan(&mut self, targets: &mut [DecodeTarget]) -> Result<(), Self::Error> {
        let (pos, row) = self
            .current()
            .ok_or_else(|| MemoryCursorError("no current row".into()))?;

        if let Some((fail_at, message)) = &self.scan_error {
            if *fail_at == pos {
                return Err(MemoryCursorError(message.clone()));
            }
        }
        if targets.len() != row.len() {
            return Err(MemoryCursorError(format!(
                "expected {} targets, got {}",
                row.len(),
                targets.len()
            )));
        }
        for (idx, (target, value)) in targets.iter_mut().zip(row).enumerate() {
            target
                .set(value.clone())
                .map_err(|e| MemoryCursorError(format!("column {}: {}", idx, e)))?;
        }
        Ok(())
    }

    fn take_error(&mut self) -> Option<Self::Error> {
        if !self.is_exhausted() {
            return None;
        }
        self.deferred_error.take().map(MemoryCursorError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordset_codec::DecodeKind;

    #[test]
    fn test_iteration_and_scan() {
        let mut cursor = MemoryCursor::new([("id", "BIGINT")])
            .row([Value::Int(1)])
            .row([Value::Int(2)]);

        let mut seen = Vec::new();
        while cursor.next_row() {
            let mut targets = [DecodeTarget::new(DecodeKind::Int)];
            cursor.scan(&mut targets).unwrap();
            seen.push(targets[0].value());
        }
        assert_eq!(seen, vec![Value::Int(1), Value::Int(2)]);
        assert!(cursor.is_exhausted());
        assert!(!cursor.next_row());
    }

    #[test]
    fn test_scan_without_current_row() {
        let mut cursor = MemoryCursor::new([("id", "BIGINT")]).row([Value::Int(1)]);
        let mut targets = [DecodeTarget::new(DecodeKind::Int)];
        assert!(cursor.scan(&mut targets).is_err());
    }

    #[test]
    fn test_deferred_error_only_after_exhaustion() {
        let mut cursor = MemoryCursor::new([("id", "BIGINT")])
            .row([Value::Int(1)])
            .fail_after_rows("connection reset");
        assert!(cursor.take_error().is_none());
        while cursor.next_row() {}
        assert_eq!(
            cursor.take_error(),
            Some(MemoryCursorError("connection reset".into()))
        );
        assert!(cursor.take_error().is_none());
    }
}
