//! Materialize an executed query's cursor into generic rows.
//!
//! [`Recordset`] sits on top of any [`Cursor`] and offers two operations:
//!
//! - [`Recordset::query`]: `Vec<Vec<Value>>`, one fixed-length row per driver
//!   row. NULLs in typed columns collapse to the type's zero value.
//! - [`Recordset::query_as_map`]: `Vec<HashMap<String, Value>>`. NULL cells are
//!   left out of the map.
//!
//! ```rust,ignore
//! use recordset_core::{MemoryCursor, Recordset, Value};
//!
//! let mut cursor = MemoryCursor::new([("id", "BIGINT"), ("name", "VARCHAR")])
//!     .row([Value::Int(1), Value::from("Alice")])
//!     .row([Value::Int(2), Value::Null]);
//!
//! let rows = Recordset::new(&mut cursor).query()?;
//! // [[1, "Alice"], [2, ""]]
//! ```
//!
//! The cursor is borrowed, never closed here. Both operations drain it and
//! either return every row or an error; there is no partial result.

pub mod cursor;
pub mod error;
pub mod memory;
pub mod recordset;

pub use cursor::Cursor;
pub use error::{BoxError, MetadataStep, RecordsetError, Result};
pub use memory::{MemoryCursor, MemoryCursorError};
pub use recordset::{Recordset, Row, RowMap};

pub use recordset_codec::{
    DecodeKind, DecodeTarget, NullMode, RecordsetSettings, TypeMap, Value,
};
