//! Value model for materialized query results.
//!
//! This crate holds the types shared between the materializer
//! (`recordset-core`) and the cursor implementations (`recordset-driver`):
//!
//! - [`Value`]: a dynamically typed cell
//! - [`DecodeKind`] / [`TypeMap`]: declared type name -> decode kind dispatch
//! - [`DecodeTarget`]: per-column nullable container a cursor scans into
//! - [`NullMode`] / [`RecordsetSettings`]: how typed NULLs are rendered,
//!   loadable from JSON
//! - [`encode`]: JSON and MessagePack output for result sets
//!
//! # Default type table
//!
//! | declared type                          | kind        |
//! |----------------------------------------|-------------|
//! | `VARCHAR`, `TEXT`, `CHAR`, `UUID`      | `String`    |
//! | `BOOL`                                 | `Bool`      |
//! | `INT`, `BIGINT`, `SMALLINT`            | `Int`       |
//! | `FLOAT`, `DOUBLE`, `DECIMAL`           | `Float`     |
//! | `TIMESTAMP`, `DATETIME`, `DATE`        | `Timestamp` |
//! | anything else                          | `Raw`       |
//!
//! Matching is exact and case-sensitive.

pub mod encode;
pub mod error;
pub mod kind;
pub mod settings;
pub mod target;
pub mod value;

pub use error::{CodecError, Result};
pub use kind::{DecodeKind, TypeMap};
pub use settings::RecordsetSettings;
pub use target::{DecodeTarget, NullMode};
pub use value::{zero_timestamp, Value, TIMESTAMP_FORMAT};
