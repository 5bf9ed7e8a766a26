//! The module contains the error the engine can throw.
//!
//! Aggregation never fails: malformed records are defaulted while they are
//! decoded. Errors only come from the store and from the write path.
//!
//! - [`KeyNotFound`] thrown when a record is not found.
//! - [`InvalidRecord`] thrown when a write is rejected before reaching the store.
//! - [`Forbidden`] thrown when a scoped caller reaches outside its scope.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidRecord`]: EngineError::InvalidRecord
//!  [`Forbidden`]: EngineError::Forbidden
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidRecord(a), Self::InvalidRecord(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Export(a), Self::Export(b)) => a == b,
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
