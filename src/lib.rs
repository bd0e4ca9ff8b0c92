//! ledger_es Library
//!
//! Event-sourced accounts rebuilt from an append-only event log,
//! with periodic snapshots to shorten replay.

pub mod aggregate;
pub mod domain;
pub mod event_store;
pub mod projection;
pub mod snapshot;
pub mod telemetry;

pub mod config;
mod error;

pub use aggregate::{Account, Aggregate, Stores};
pub use config::Config;
pub use domain::{AccountEvent, Amount, AmountError, Balance, DomainError, EventType};
pub use error::{AppError, AppResult, ErrorKind};
pub use event_store::{EventStore, StoreError};
pub use snapshot::{Snapshot, SnapshotStore};
pub use telemetry::{NoopTelemetry, Telemetry, TracingTelemetry};
