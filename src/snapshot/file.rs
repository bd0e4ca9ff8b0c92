//! File Snapshot Store
//!
//! Snapshots are stored as `<dir>/<aggregate_id>.json`. Writes go through a
//! temp file and a rename so readers never see a half-written snapshot.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::event_store::StoreError;

use super::{Snapshot, SnapshotStore};

/// Snapshot store keeping one JSON file per account
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store under `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `aggregate_id`
    pub fn snapshot_path(&self, aggregate_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", aggregate_id))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save_snapshot(
        &self,
        aggregate_id: Uuid,
        snapshot: &Snapshot,
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.snapshot_path(aggregate_id);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn get_snapshot(&self, aggregate_id: Uuid) -> Result<Option<Snapshot>, StoreError> {
        let bytes = match tokio::fs::read(self.snapshot_path(aggregate_id)).await {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
