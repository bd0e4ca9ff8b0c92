//! Telemetry port
//!
//! Observer interface the stores and the account's save/load paths report to.
//! Callers inject an implementation; nothing here installs a global logger.

use uuid::Uuid;

use crate::domain::DomainError;

/// Receives notifications about persistence activity.
///
/// Every method has an empty default so implementations only override what
/// they care about.
pub trait Telemetry: Send + Sync {
    /// Events were appended to a store
    fn events_appended(&self, _store: &'static str, _aggregate_id: Uuid, _count: usize) {}

    /// A snapshot was written
    fn snapshot_saved(&self, _aggregate_id: Uuid, _version: u64) {}

    /// An account was rebuilt from storage
    fn aggregate_loaded(
        &self,
        _aggregate_id: Uuid,
        _version: Option<u64>,
        _snapshot_version: Option<u64>,
        _replayed: usize,
    ) {
    }

    /// A command was refused by the account's guards
    fn command_rejected(&self, _aggregate_id: Uuid, _error: &DomainError) {}
}

/// Emits structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn events_appended(&self, store: &'static str, aggregate_id: Uuid, count: usize) {
        tracing::debug!(store, %aggregate_id, count, "events appended");
    }

    fn snapshot_saved(&self, aggregate_id: Uuid, version: u64) {
        tracing::info!(%aggregate_id, version, "snapshot saved");
    }

    fn aggregate_loaded(
        &self,
        aggregate_id: Uuid,
        version: Option<u64>,
        snapshot_version: Option<u64>,
        replayed: usize,
    ) {
        tracing::debug!(
            %aggregate_id,
            ?version,
            ?snapshot_version,
            replayed,
            "account loaded"
        );
    }

    fn command_rejected(&self, aggregate_id: Uuid, error: &DomainError) {
        tracing::warn!(%aggregate_id, kind = error.kind().as_str(), %error, "command rejected");
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {}
