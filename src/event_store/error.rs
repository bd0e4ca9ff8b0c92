//! Store Errors
//!
//! Error types shared by the event store and snapshot store implementations.

use uuid::Uuid;

/// Errors that can occur while reading or writing persisted events and snapshots
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Envelope carries a type tag no decoder knows about
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// Envelope was written with a schema this build cannot read
    #[error("Unsupported schema version {version} for event type {event_type}")]
    UnsupportedSchemaVersion { event_type: String, version: u32 },

    /// Stored history is not contiguous
    #[error("Version gap for aggregate {aggregate_id}: expected {expected}, found {found}")]
    VersionGap {
        aggregate_id: Uuid,
        expected: u64,
        found: u64,
    },

    /// Replaying an event would overflow the balance
    #[error("Balance overflow replaying version {version} of aggregate {aggregate_id}")]
    BalanceOverflow { aggregate_id: Uuid, version: u64 },
}

impl From<crate::domain::UnknownEventType> for StoreError {
    fn from(err: crate::domain::UnknownEventType) -> Self {
        StoreError::UnknownEventType(err.0)
    }
}

impl StoreError {
    /// Check if this error is a decoding problem with persisted data
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            StoreError::Serialization(_)
                | StoreError::UnknownEventType(_)
                | StoreError::UnsupportedSchemaVersion { .. }
                | StoreError::VersionGap { .. }
                | StoreError::BalanceOverflow { .. }
        )
    }

    /// Check if retrying the same call might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}
