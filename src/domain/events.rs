//! Domain Events
//!
//! Event definitions for Event Sourcing.
//! Events are immutable facts that have happened to an account. Each variant
//! wraps its own payload struct so the envelope codec can serialize a single
//! variant's fields without the enum wrapper.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Payload of [`AccountEvent::Opened`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOpened {
    pub aggregate_id: Uuid,
    pub version: u64,
    pub holder: String,
    pub initial_amount: Decimal,
    pub currency: String,
    pub occurred_at: DateTime<Utc>,
}

/// Payload of [`AccountEvent::Deposited`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyDeposited {
    pub aggregate_id: Uuid,
    pub version: u64,
    pub amount: Decimal,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Payload of [`AccountEvent::Withdrawn`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyWithdrawn {
    pub aggregate_id: Uuid,
    pub version: u64,
    pub amount: Decimal,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Payload of [`AccountEvent::Transferred`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyTransferred {
    pub aggregate_id: Uuid,
    pub version: u64,
    pub amount: Decimal,
    pub destination_id: Uuid,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Payload of [`AccountEvent::Closed`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountClosed {
    pub aggregate_id: Uuid,
    pub version: u64,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Account-related events
#[derive(Debug, Clone, PartialEq)]
pub enum AccountEvent {
    /// Account was opened (always version 0)
    Opened(AccountOpened),

    /// Money was deposited (balance increased)
    Deposited(MoneyDeposited),

    /// Money was withdrawn (balance decreased)
    Withdrawn(MoneyWithdrawn),

    /// Money left the account towards another account.
    /// The destination is not credited by this event.
    Transferred(MoneyTransferred),

    /// Account was closed
    Closed(AccountClosed),
}

impl AccountEvent {
    /// Get the variant tag of this event
    pub fn event_type(&self) -> EventType {
        match self {
            AccountEvent::Opened(_) => EventType::Opened,
            AccountEvent::Deposited(_) => EventType::Deposited,
            AccountEvent::Withdrawn(_) => EventType::Withdrawn,
            AccountEvent::Transferred(_) => EventType::Transferred,
            AccountEvent::Closed(_) => EventType::Closed,
        }
    }

    /// Get the account ID this event relates to
    pub fn aggregate_id(&self) -> Uuid {
        match self {
            AccountEvent::Opened(e) => e.aggregate_id,
            AccountEvent::Deposited(e) => e.aggregate_id,
            AccountEvent::Withdrawn(e) => e.aggregate_id,
            AccountEvent::Transferred(e) => e.aggregate_id,
            AccountEvent::Closed(e) => e.aggregate_id,
        }
    }

    /// Get the position of this event in its account's stream
    pub fn version(&self) -> u64 {
        match self {
            AccountEvent::Opened(e) => e.version,
            AccountEvent::Deposited(e) => e.version,
            AccountEvent::Withdrawn(e) => e.version,
            AccountEvent::Transferred(e) => e.version,
            AccountEvent::Closed(e) => e.version,
        }
    }

    /// When the event was created
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::Opened(e) => e.occurred_at,
            AccountEvent::Deposited(e) => e.occurred_at,
            AccountEvent::Withdrawn(e) => e.occurred_at,
            AccountEvent::Transferred(e) => e.occurred_at,
            AccountEvent::Closed(e) => e.occurred_at,
        }
    }

    /// The monetary amount carried by the event, if any.
    /// For `Opened` this is the initial amount.
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            AccountEvent::Opened(e) => Some(e.initial_amount),
            AccountEvent::Deposited(e) => Some(e.amount),
            AccountEvent::Withdrawn(e) => Some(e.amount),
            AccountEvent::Transferred(e) => Some(e.amount),
            AccountEvent::Closed(_) => None,
        }
    }
}

/// The closed set of event variants, used as the envelope type tag
/// and for cross-account queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Opened,
    Deposited,
    Withdrawn,
    Transferred,
    Closed,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Opened,
        EventType::Deposited,
        EventType::Withdrawn,
        EventType::Transferred,
        EventType::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Opened => "AccountOpened",
            EventType::Deposited => "MoneyDeposited",
            EventType::Withdrawn => "MoneyWithdrawn",
            EventType::Transferred => "MoneyTransferred",
            EventType::Closed => "AccountClosed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type tag names no known event variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}
