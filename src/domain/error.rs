//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::AmountError;

/// Business rule violations raised by account commands.
///
/// None of these are ever persisted: a rejected command creates no event
/// and leaves the account untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed command input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Command issued against a closed (or never opened) account
    #[error("Account {0} is not active")]
    InactiveAggregate(Uuid),

    /// Withdrawal or transfer exceeds the balance
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    /// Close attempted with an outstanding balance
    #[error("Cannot close account with non-zero balance {0}")]
    NonZeroBalance(Decimal),
}

impl DomainError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an insufficient funds error
    pub fn insufficient_funds(requested: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_funds_error() {
        let err = DomainError::insufficient_funds(dec!(100), dec!(50));

        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn test_amount_error_is_invalid_argument() {
        let err: DomainError = AmountError::NotPositive(dec!(0)).into();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert!(err.to_string().contains("positive"));
    }
}
