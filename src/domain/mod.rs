//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod error;
pub mod events;

pub use amount::{Amount, AmountError, Balance};
pub use error::DomainError;
pub use events::{
    AccountClosed, AccountEvent, AccountOpened, EventType, MoneyDeposited, MoneyTransferred,
    MoneyWithdrawn, UnknownEventType,
};
