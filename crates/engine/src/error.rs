//! The module contains the errors the engine can throw.
//!
//! Every failure maps to exactly one stable kind:
//!
//! - [`NotFound`] the requested transaction does not exist.
//! - [`ParentNotFound`] the parent named by a create does not exist.
//! - [`InvalidData`] semantic validation failed (amount, self-reference,
//!   empty type, cycle).
//! - [`DatabaseOperation`] the store failed; the cause is kept as `source`.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`ParentNotFound`]: EngineError::ParentNotFound
//!  [`InvalidData`]: EngineError::InvalidData
//!  [`DatabaseOperation`]: EngineError::DatabaseOperation
use std::time::Duration;

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("transaction {0} not found")]
    NotFound(i64),
    #[error("parent transaction {0} not found")]
    ParentNotFound(i64),
    #[error("invalid transaction data: {0}")]
    InvalidData(String),
    #[error("database operation failed: {context}")]
    DatabaseOperation {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl EngineError {
    /// Wrap a store failure with a description of what was being done.
    pub(crate) fn database(context: impl Into<String>) -> impl FnOnce(StoreError) -> EngineError {
        let context = context.into();
        move |source| EngineError::DatabaseOperation { context, source }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ParentNotFound(a), Self::ParentNotFound(b)) => a == b,
            (Self::InvalidData(a), Self::InvalidData(b)) => a == b,
            (
                Self::DatabaseOperation {
                    context: a,
                    source: sa,
                },
                Self::DatabaseOperation {
                    context: b,
                    source: sb,
                },
            ) => a == b && sa.to_string() == sb.to_string(),
            _ => false,
        }
    }
}

/// Failures reported by a [`TransactionStore`](crate::TransactionStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("transaction {0} vanished while following the parent chain")]
    MissingRecord(i64),
    #[error("store call exceeded its {0:?} deadline")]
    Timeout(Duration),
    #[error("store backend failure: {0}")]
    Backend(String),
}
