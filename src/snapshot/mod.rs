//! Snapshot module
//!
//! Point-in-time copies of account state used to shortcut replay.
//! A snapshot is never the system of record: deleting every snapshot only
//! makes loading slower.

mod file;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event_store::StoreError;

pub use file::FileSnapshotStore;
pub use memory::InMemorySnapshotStore;

/// Denormalized account state at a known version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub aggregate_id: Uuid,
    pub holder: String,
    pub balance: Decimal,
    pub currency: String,
    pub active: bool,
    pub version: u64,
    pub taken_at: DateTime<Utc>,
}

/// Persistence contract for snapshots: one per account, last write wins
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist `snapshot`, replacing any previous one for `aggregate_id`
    async fn save_snapshot(&self, aggregate_id: Uuid, snapshot: &Snapshot)
        -> Result<(), StoreError>;

    /// The latest snapshot, or `None` when the account has never been captured
    async fn get_snapshot(&self, aggregate_id: Uuid) -> Result<Option<Snapshot>, StoreError>;
}
