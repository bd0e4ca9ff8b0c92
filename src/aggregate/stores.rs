//! Store bundle
//!
//! The explicit set of collaborators an account is saved to and loaded from.

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::event_store::{EventStore, InMemoryEventStore, JsonFileEventStore};
use crate::snapshot::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};
use crate::telemetry::Telemetry;

/// Event store, snapshot store and telemetry sink, passed to every
/// save and load call.
#[derive(Clone)]
pub struct Stores {
    pub events: Arc<dyn EventStore>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub telemetry: Arc<dyn Telemetry>,
}

impl Stores {
    pub fn new(
        events: Arc<dyn EventStore>,
        snapshots: Arc<dyn SnapshotStore>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            events,
            snapshots,
            telemetry,
        }
    }

    /// Fresh in-memory stores
    pub fn in_memory(telemetry: Arc<dyn Telemetry>) -> Self {
        Self::new(
            Arc::new(InMemoryEventStore::with_telemetry(telemetry.clone())),
            Arc::new(InMemorySnapshotStore::new()),
            telemetry,
        )
    }

    /// Stores for the configured backend
    pub fn from_config(config: &Config, telemetry: Arc<dyn Telemetry>) -> Self {
        match config.backend {
            StoreBackend::Memory => Self::in_memory(telemetry),
            StoreBackend::File => Self::new(
                Arc::new(JsonFileEventStore::with_telemetry(
                    &config.event_log_path,
                    telemetry.clone(),
                )),
                Arc::new(FileSnapshotStore::new(&config.snapshot_dir)),
                telemetry,
            ),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
