//! Error types for recordset-driver

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Failed to decode column {column}: {source}")]
    Decode {
        column: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("No current row")]
    NoCurrentRow,

    #[error("Expected {expected} decode targets, got {found}")]
    TargetCount { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, DriverError>;
