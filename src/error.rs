//! Error handling module
//!
//! Centralized error type returned by account persistence and reports.

use uuid::Uuid;

use crate::config::ConfigError;
use crate::domain::DomainError;
use crate::event_store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A command broke a business rule
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Neither a snapshot nor any event exists for the account
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Reading or writing a store failed
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification of an [`AppError`]; each kind calls for a
/// different corrective action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InactiveAggregate,
    InsufficientFunds,
    NonZeroBalance,
    NotFound,
    PersistenceFailure,
    Configuration,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::InactiveAggregate => "inactive_aggregate",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::NonZeroBalance => "non_zero_balance",
            ErrorKind::NotFound => "not_found",
            ErrorKind::PersistenceFailure => "persistence_failure",
            ErrorKind::Configuration => "configuration",
        }
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DomainError::InactiveAggregate(_) => ErrorKind::InactiveAggregate,
            DomainError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            DomainError::NonZeroBalance(_) => ErrorKind::NonZeroBalance,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(err) => err.kind(),
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Persistence(_) => ErrorKind::PersistenceFailure,
            AppError::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Check if this is a client error (fix the input)
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Domain(_) | AppError::NotFound(_))
    }

    /// Check if retrying the same call might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Persistence(e) if e.is_retryable())
    }
}
