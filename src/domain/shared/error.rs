//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store rejected request: {0}")]
    StoreRejected(String),

    #[error("Call widget failure: {0}")]
    WidgetFailure(String),

    #[error("Missing participant: {0}")]
    MissingParticipant(String),
}
