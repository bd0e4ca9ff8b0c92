//! Event Store module
//!
//! Append-only persistence of every account's event stream.
//! Two backends: an in-memory map for tests and ephemeral runs, and a single
//! JSON file holding the envelopes of every account.

pub mod envelope;
mod error;
mod file;
mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AccountEvent, EventType};

pub use envelope::{StoredEvent, CURRENT_SCHEMA_VERSION};
pub use error::StoreError;
pub use file::JsonFileEventStore;
pub use memory::InMemoryEventStore;

/// Persistence contract for event streams.
///
/// Stores never reorder or validate versions; the account guarantees they
/// arrive in order.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append `events` to the stream of `aggregate_id`
    async fn save_events(
        &self,
        aggregate_id: Uuid,
        events: &[AccountEvent],
    ) -> Result<(), StoreError>;

    /// All events ever saved for `aggregate_id`, in storage order.
    /// Unknown ids yield an empty vector.
    async fn get_events(&self, aggregate_id: Uuid) -> Result<Vec<AccountEvent>, StoreError>;

    /// Every stored event of one variant across all accounts
    async fn events_by_type(&self, event_type: EventType)
        -> Result<Vec<AccountEvent>, StoreError>;
}
