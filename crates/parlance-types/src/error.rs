use thiserror::Error;

/// Errors from persistence-gateway operations (used by trait definitions in
/// parlance-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("record not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not authorized for the requested record")]
    Unauthorized,
}
