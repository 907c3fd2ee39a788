use thiserror::Error;

/// Discriminated failure modes of the reservation services.
///
/// Raw store errors never cross this boundary except wrapped in
/// `Connectivity`; every multi-step mutation runs inside a transaction
/// that is rolled back before one of these is returned.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store unavailable: {0}")]
    Connectivity(#[from] sqlx::Error),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no seats left on train {0}")]
    CapacityExceeded(String),

    #[error("conflict: {0}")]
    Conflict(String),
}
