//! Event Envelope Codec
//!
//! Wraps an [`AccountEvent`] with its type tag and schema version so the
//! durable store can persist every variant in one generic shape.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    AccountClosed, AccountEvent, AccountOpened, EventType, MoneyDeposited, MoneyTransferred,
    MoneyWithdrawn,
};

use super::StoreError;

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Envelopes persisted before the schema field existed deserialize as this
const LEGACY_SCHEMA_VERSION: u32 = 0;

/// Durable representation of one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub aggregate_id: Uuid,
    pub event_type: String,
    #[serde(default)]
    pub event_version_schema: u32,
    pub event_data: Value,
    pub stored_at: DateTime<Utc>,
}

/// Wrap an event for storage
pub fn encode(event: &AccountEvent) -> Result<StoredEvent, StoreError> {
    let event_data = match event {
        AccountEvent::Opened(payload) => serde_json::to_value(payload)?,
        AccountEvent::Deposited(payload) => serde_json::to_value(payload)?,
        AccountEvent::Withdrawn(payload) => serde_json::to_value(payload)?,
        AccountEvent::Transferred(payload) => serde_json::to_value(payload)?,
        AccountEvent::Closed(payload) => serde_json::to_value(payload)?,
    };

    Ok(StoredEvent {
        aggregate_id: event.aggregate_id(),
        event_type: event.event_type().as_str().to_string(),
        event_version_schema: CURRENT_SCHEMA_VERSION,
        event_data,
        stored_at: Utc::now(),
    })
}

/// Unwrap a stored envelope back into an event
pub fn decode(stored: &StoredEvent) -> Result<AccountEvent, StoreError> {
    let event_type: EventType = stored.event_type.parse()?;
    let version = stored.event_version_schema;

    let event = match event_type {
        EventType::Opened => AccountEvent::Opened(decode_opened(stored, version)?),
        EventType::Deposited => AccountEvent::Deposited(decode_deposited(stored, version)?),
        EventType::Withdrawn => AccountEvent::Withdrawn(decode_withdrawn(stored, version)?),
        EventType::Transferred => {
            AccountEvent::Transferred(decode_transferred(stored, version)?)
        }
        EventType::Closed => AccountEvent::Closed(decode_closed(stored, version)?),
    };

    Ok(event)
}

fn decode_opened(stored: &StoredEvent, version: u32) -> Result<AccountOpened, StoreError> {
    match version {
        CURRENT_SCHEMA_VERSION | LEGACY_SCHEMA_VERSION => payload(stored),
        other => Err(unsupported(stored, other)),
    }
}

fn decode_deposited(stored: &StoredEvent, version: u32) -> Result<MoneyDeposited, StoreError> {
    match version {
        CURRENT_SCHEMA_VERSION => payload(stored),
        LEGACY_SCHEMA_VERSION => legacy_payload(stored, &["description"]),
        other => Err(unsupported(stored, other)),
    }
}

fn decode_withdrawn(stored: &StoredEvent, version: u32) -> Result<MoneyWithdrawn, StoreError> {
    match version {
        CURRENT_SCHEMA_VERSION => payload(stored),
        LEGACY_SCHEMA_VERSION => legacy_payload(stored, &["description"]),
        other => Err(unsupported(stored, other)),
    }
}

fn decode_transferred(
    stored: &StoredEvent,
    version: u32,
) -> Result<MoneyTransferred, StoreError> {
    match version {
        CURRENT_SCHEMA_VERSION => payload(stored),
        LEGACY_SCHEMA_VERSION => legacy_payload(stored, &["description"]),
        other => Err(unsupported(stored, other)),
    }
}

fn decode_closed(stored: &StoredEvent, version: u32) -> Result<AccountClosed, StoreError> {
    match version {
        CURRENT_SCHEMA_VERSION => payload(stored),
        LEGACY_SCHEMA_VERSION => legacy_payload(stored, &["reason"]),
        other => Err(unsupported(stored, other)),
    }
}

fn payload<T: DeserializeOwned>(stored: &StoredEvent) -> Result<T, StoreError> {
    Ok(T::deserialize(&stored.event_data)?)
}

/// Unversioned payloads may lack free-text fields; fill them with empty text
/// and decode through the current layout.
fn legacy_payload<T: DeserializeOwned>(
    stored: &StoredEvent,
    text_fields: &[&str],
) -> Result<T, StoreError> {
    let mut data = stored.event_data.clone();
    if let Value::Object(map) = &mut data {
        for field in text_fields {
            map.entry(*field)
                .or_insert_with(|| Value::String(String::new()));
        }
    }
    Ok(serde_json::from_value(data)?)
}

fn unsupported(stored: &StoredEvent, version: u32) -> StoreError {
    StoreError::UnsupportedSchemaVersion {
        event_type: stored.event_type.clone(),
        version,
    }
}
