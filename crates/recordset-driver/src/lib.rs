//! sqlx-backed cursors for the recordset materializer.
//!
//! The database-access layer executes the query with sqlx and hands the rows
//! over as a [`RowsCursor`]; [`recordset_core::Recordset`] then turns them
//! into generic rows.
//!
//! ```rust,ignore
//! let stream = sqlx::query("SELECT id, name FROM users").fetch(&mut conn);
//! let mut cursor = RowsCursor::collect(stream).await;
//! let rows = Recordset::new(&mut cursor).query()?;
//! ```
//!
//! # Backends
//!
//! Each backend decodes cells through its [`DecodeRow`] impl in `convert/`:
//!
//! - **SQLite**: dynamic typing; raw cells try INTEGER, REAL, TEXT, then BLOB
//! - **PostgreSQL**: strictly sized integers are widened to i64, UUID and
//!   NUMERIC read as strings in raw cells
//! - **MySQL**: TINYINT(1) booleans, unsigned integers, DECIMAL as string in
//!   raw cells
//!
//! Declared type names are taken from `sqlx::TypeInfo::name` unchanged, so the
//! type map sees e.g. `INT8` on Postgres and `INTEGER` on SQLite.

pub mod convert;
pub mod cursor;
pub mod error;

pub use convert::DecodeRow;
pub use cursor::{ColumnInfo, RowsCursor};
pub use error::{DriverError, Result};
