//! Error types for recordset-codec

use thiserror::Error;

use crate::kind::DecodeKind;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unknown decode kind: {0}")]
    UnknownKind(String),

    #[error("Cannot store {found} value in {expected} target")]
    TypeMismatch {
        expected: DecodeKind,
        found: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
