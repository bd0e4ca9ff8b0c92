//! In-memory Event Store
//!
//! Keeps streams in process memory; nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{AccountEvent, EventType};
use crate::telemetry::{NoopTelemetry, Telemetry};

use super::{EventStore, StoreError};

#[derive(Debug, Default)]
struct Streams {
    by_aggregate: HashMap<Uuid, Vec<AccountEvent>>,
    all: Vec<AccountEvent>,
}

/// Event store backed by a per-account map plus a flat list of all events.
///
/// Clones share the same underlying streams.
#[derive(Clone)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<Streams>>,
    telemetry: Arc<dyn Telemetry>,
}

impl InMemoryEventStore {
    /// Create an empty store that reports nothing
    pub fn new() -> Self {
        Self::with_telemetry(Arc::new(NoopTelemetry))
    }

    /// Create an empty store reporting to `telemetry`
    pub fn with_telemetry(telemetry: Arc<dyn Telemetry>) -> Self {
        Self {
            streams: Arc::new(RwLock::new(Streams::default())),
            telemetry,
        }
    }

    /// Total number of stored events
    pub async fn len(&self) -> usize {
        self.streams.read().await.all.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEventStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save_events(
        &self,
        aggregate_id: Uuid,
        events: &[AccountEvent],
    ) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }

        {
            let mut streams = self.streams.write().await;
            streams
                .by_aggregate
                .entry(aggregate_id)
                .or_default()
                .extend_from_slice(events);
            streams.all.extend_from_slice(events);
        }

        self.telemetry
            .events_appended("memory", aggregate_id, events.len());
        Ok(())
    }

    async fn get_events(&self, aggregate_id: Uuid) -> Result<Vec<AccountEvent>, StoreError> {
        let streams = self.streams.read().await;
        Ok(streams
            .by_aggregate
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn events_by_type(
        &self,
        event_type: EventType,
    ) -> Result<Vec<AccountEvent>, StoreError> {
        let streams = self.streams.read().await;
        Ok(streams
            .all
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect())
    }
}
