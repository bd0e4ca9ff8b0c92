//! Projection module
//!
//! Cross-account read models built from `events_by_type` queries.

mod report;

pub use report::{list_accounts, ledger_statistics, AccountSummary, LedgerStatistics, VariantTotal};
