//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which persistence backend the stores use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// JSON event log plus one snapshot file per account
    File,
    /// Process memory only
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::InvalidValue("LEDGER_STORE")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Persistence backend
    pub backend: StoreBackend,

    /// Path of the JSON event log
    pub event_log_path: PathBuf,

    /// Directory holding snapshot files
    pub snapshot_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = env::var("LEDGER_STORE")
            .unwrap_or_else(|_| "file".to_string())
            .parse()?;

        let event_log_path = env::var("LEDGER_EVENT_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/events.json"));

        let snapshot_dir = env::var("LEDGER_SNAPSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/snapshots"));

        Ok(Self {
            backend,
            event_log_path,
            snapshot_dir,
        })
    }

    /// Configuration for a throwaway in-memory ledger
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            event_log_path: PathBuf::new(),
            snapshot_dir: PathBuf::new(),
        }
    }

    /// Check if data survives a restart
    pub fn is_durable(&self) -> bool {
        self.backend == StoreBackend::File
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
