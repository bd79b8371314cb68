//! Cursor boundary consumed by the materializer

use recordset_codec::DecodeTarget;

/// An open, forward-only handle over an executed query's result stream.
///
/// Implementations are supplied by the database-access layer. Opening and
/// closing the cursor stay with that layer; [`crate::Recordset`] only reads
/// metadata and advances it.
pub trait Cursor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Column names, in column order.
    fn columns(&self) -> Result<Vec<String>, Self::Error>;

    /// Driver-reported declared type names, one per column.
    fn column_types(&self) -> Result<Vec<String>, Self::Error>;

    /// Advance to the next row. `false` once the stream is exhausted or failed.
    fn next_row(&mut self) -> bool;

    /// Decode the current row into `targets`, one per column, in column order.
    ///
    /// Each target already carries the decode kind chosen for its column.
    fn scan(&mut self, targets: &mut [DecodeTarget]) -> Result<(), Self::Error>;

    /// Error observed while iterating that `next_row` could only report as
    /// exhaustion. Checked once after the last row.
    fn take_error(&mut self) -> Option<Self::Error>;
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    type Error = C::Error;

    fn columns(&self) -> Result<Vec<String>, Self::Error> {
        (**self).columns()
    }

    fn column_types(&self) -> Result<Vec<String>, Self::Error> {
        (**self).column_types()
    }

    fn next_row(&mut self) -> bool {
        (**self).next_row()
    }

    fn scan(&mut self, targets: &mut [DecodeTarget]) -> Result<(), Self::Error> {
        (**self).scan(targets)
    }

    fn take_error(&mut self) -> Option<Self::Error> {
        (**self).take_error()
    }
}
