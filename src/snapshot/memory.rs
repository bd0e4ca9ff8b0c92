//! In-memory Snapshot Store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::event_store::StoreError;

use super::{Snapshot, SnapshotStore};

/// Snapshot store backed by a shared map. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<Uuid, Snapshot>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored snapshot
    pub async fn clear(&self) {
        self.snapshots.write().await.clear();
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save_snapshot(
        &self,
        aggregate_id: Uuid,
        snapshot: &Snapshot,
    ) -> Result<(), StoreError> {
        self.snapshots
            .write()
            .await
            .insert(aggregate_id, snapshot.clone());
        Ok(())
    }

    async fn get_snapshot(&self, aggregate_id: Uuid) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.snapshots.read().await.get(&aggregate_id).cloned())
    }
}
