//! Error types for recordset-core

use std::fmt;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Metadata call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStep {
    ColumnNames,
    ColumnTypes,
}

impl fmt::Display for MetadataStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNames => f.write_str("column names"),
            Self::ColumnTypes => f.write_str("column types"),
        }
    }
}

/// Every variant aborts the call; no rows are returned alongside it.
#[derive(Debug, Error)]
pub enum RecordsetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to get {step}: {source}")]
    Metadata {
        step: MetadataStep,
        #[source]
        source: BoxError,
    },

    #[error("Failed to scan row {row}: {source}")]
    Scan {
        row: usize,
        #[source]
        source: BoxError,
    },

    #[error("Error during row iteration: {0}")]
    Iteration(#[source] BoxError),
}

impl RecordsetError {
    pub(crate) fn metadata(step: MetadataStep, source: impl Into<BoxError>) -> Self {
        Self::Metadata {
            step,
            source: source.into(),
        }
    }

    pub(crate) fn scan(row: usize, source: impl Into<BoxError>) -> Self {
        Self::Scan {
            row,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordsetError>;
