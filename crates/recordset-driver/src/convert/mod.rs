//! Per-backend cell decoding into decode targets

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use chrono::{NaiveDate, NaiveDateTime};
use recordset_codec::{DecodeKind, DecodeTarget};

pub use mysql::decode_mysql_cell;
pub use postgres::decode_pg_cell;
pub use sqlite::decode_sqlite_cell;

/// A driver row whose cells can be decoded into [`DecodeTarget`]s.
pub trait DecodeRow: sqlx::Row {
    /// Decode cell `idx` as `kind`. `Ok` with an empty target means SQL NULL.
    fn decode_cell(&self, idx: usize, kind: DecodeKind) -> Result<DecodeTarget, sqlx::Error>;
}

/// Text form of a time-of-day cell under the raw kind.
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S%.f";

pub(crate) fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}
