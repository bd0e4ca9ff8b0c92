//! Common test utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ledger_es::event_store::{InMemoryEventStore, JsonFileEventStore};
use ledger_es::snapshot::{FileSnapshotStore, InMemorySnapshotStore};
use ledger_es::{NoopTelemetry, Snapshot, SnapshotStore, StoreError, Stores};
use tempfile::TempDir;
use uuid::Uuid;

/// Snapshot store that counts writes before delegating
#[derive(Debug, Default)]
pub struct CountingSnapshotStore {
    inner: InMemorySnapshotStore,
    writes: AtomicUsize,
}

impl CountingSnapshotStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for CountingSnapshotStore {
    async fn save_snapshot(
        &self,
        aggregate_id: Uuid,
        snapshot: &Snapshot,
    ) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save_snapshot(aggregate_id, snapshot).await
    }

    async fn get_snapshot(&self, aggregate_id: Uuid) -> Result<Option<Snapshot>, StoreError> {
        self.inner.get_snapshot(aggregate_id).await
    }
}

/// In-memory stores with a snapshot write counter
pub fn counting_stores() -> (Stores, Arc<CountingSnapshotStore>) {
    let snapshots = Arc::new(CountingSnapshotStore::default());
    let stores = Stores::new(
        Arc::new(InMemoryEventStore::new()),
        snapshots.clone(),
        Arc::new(NoopTelemetry),
    );
    (stores, snapshots)
}

/// File-backed stores inside a fresh temporary directory.
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn file_stores() -> (Stores, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let stores = file_stores_in(&dir);
    (stores, dir)
}

/// File-backed stores over an existing directory, as a restarted process would open them
pub fn file_stores_in(dir: &TempDir) -> Stores {
    Stores::new(
        Arc::new(JsonFileEventStore::new(dir.path().join("events.json"))),
        Arc::new(FileSnapshotStore::new(dir.path().join("snapshots"))),
        Arc::new(NoopTelemetry),
    )
}
