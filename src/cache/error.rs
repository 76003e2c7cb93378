use crate::db::DatabaseError;
use thiserror::Error;

/// Errors raised by a maintenance run
#[derive(Error, Debug)]
pub enum InvalidatorError {
    /// The record store failed; the run is aborted without retry
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),

    #[error("Invalid staleness offset: {0}")]
    InvalidOffset(String),
}
