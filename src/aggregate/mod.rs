//! Aggregate module
//!
//! Aggregate Root pattern implementation for Event Sourcing.

pub mod account;
mod stores;

pub use account::{Account, DEFAULT_CURRENCY, SNAPSHOT_THRESHOLD};
pub use stores::Stores;

/// Aggregate trait that all aggregates must implement
pub trait Aggregate: Sized + Default {
    /// The type of events this aggregate handles
    type Event;

    /// Get the aggregate ID
    fn id(&self) -> uuid::Uuid;

    /// Version of the last applied event, `None` before the first one
    fn version(&self) -> Option<u64>;

    /// Apply an event to update the aggregate state
    fn apply(&mut self, event: Self::Event);

    /// Version the next emitted event must carry
    fn next_version(&self) -> u64 {
        self.version().map_or(0, |v| v + 1)
    }
}
