//! JSON file Event Store
//!
//! All envelopes of every account live in one JSON array. Saving reads the
//! whole file, appends, and rewrites it: two processes saving at the same time
//! will lose one side's events.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AccountEvent, EventType};
use crate::telemetry::{NoopTelemetry, Telemetry};

use super::envelope::{self, StoredEvent};
use super::{EventStore, StoreError};

/// Event store persisted as a single JSON array of envelopes
#[derive(Clone)]
pub struct JsonFileEventStore {
    path: PathBuf,
    telemetry: Arc<dyn Telemetry>,
}

impl JsonFileEventStore {
    /// Create a store over `path`; the file is created on first save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_telemetry(path, Arc::new(NoopTelemetry))
    }

    pub fn with_telemetry(path: impl Into<PathBuf>, telemetry: Arc<dyn Telemetry>) -> Self {
        Self {
            path: path.into(),
            telemetry,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every envelope in the file.
    /// A missing or blank file is an empty log.
    pub async fn read_envelopes(&self) -> Result<Vec<StoredEvent>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_envelopes(&self, envelopes: &[StoredEvent]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let json = serde_json::to_vec_pretty(envelopes)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Decode every envelope matching `keep`; any bad envelope aborts the read
    async fn decode_matching(
        &self,
        keep: impl Fn(&StoredEvent) -> bool,
    ) -> Result<Vec<AccountEvent>, StoreError> {
        let envelopes = self.read_envelopes().await?;
        envelopes
            .iter()
            .filter(|&stored| keep(stored))
            .map(envelope::decode)
            .collect()
    }
}

impl std::fmt::Debug for JsonFileEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileEventStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EventStore for JsonFileEventStore {
    async fn save_events(
        &self,
        aggregate_id: Uuid,
        events: &[AccountEvent],
    ) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut envelopes = self.read_envelopes().await?;
        for event in events {
            envelopes.push(envelope::encode(event)?);
        }
        self.write_envelopes(&envelopes).await?;

        self.telemetry
            .events_appended("json_file", aggregate_id, events.len());
        Ok(())
    }

    async fn get_events(&self, aggregate_id: Uuid) -> Result<Vec<AccountEvent>, StoreError> {
        self.decode_matching(|stored| stored.aggregate_id == aggregate_id)
            .await
    }

    async fn events_by_type(
        &self,
        event_type: EventType,
    ) -> Result<Vec<AccountEvent>, StoreError> {
        let tag = event_type.as_str();
        self.decode_matching(|stored| stored.event_type == tag).await
    }
}
