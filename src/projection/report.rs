//! Ledger reports
//!
//! Enumerates accounts through their `Opened` events and sums amounts per
//! event variant.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{Account, Aggregate, Stores};
use crate::domain::EventType;
use crate::error::AppResult;

/// Current state of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub holder: String,
    pub balance: Decimal,
    pub currency: String,
    pub active: bool,
    pub version: u64,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            holder: account.holder().to_string(),
            balance: account.balance().value(),
            currency: account.currency().to_string(),
            active: account.is_active(),
            version: account.version().unwrap_or_default(),
        }
    }
}

/// Count and amount sum of one event variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VariantTotal {
    pub count: usize,
    pub amount: Decimal,
}

/// Ledger-wide totals across every account
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerStatistics {
    pub opened: VariantTotal,
    pub deposited: VariantTotal,
    pub withdrawn: VariantTotal,
    pub transferred: VariantTotal,
    pub closed: VariantTotal,
}

impl LedgerStatistics {
    fn total_mut(&mut self, event_type: EventType) -> &mut VariantTotal {
        match event_type {
            EventType::Opened => &mut self.opened,
            EventType::Deposited => &mut self.deposited,
            EventType::Withdrawn => &mut self.withdrawn,
            EventType::Transferred => &mut self.transferred,
            EventType::Closed => &mut self.closed,
        }
    }

    /// Accounts opened and not closed
    pub fn active_accounts(&self) -> usize {
        self.opened.count.saturating_sub(self.closed.count)
    }

    /// Opening amounts plus deposits minus withdrawals and transfers out;
    /// equals the sum of every account balance.
    pub fn net_flow(&self) -> Decimal {
        self.opened.amount + self.deposited.amount
            - self.withdrawn.amount
            - self.transferred.amount
    }
}

/// Load every account that has ever been opened, in first-opened order
pub async fn list_accounts(stores: &Stores) -> AppResult<Vec<AccountSummary>> {
    let opened = stores.events.events_by_type(EventType::Opened).await?;

    let mut seen = HashSet::new();
    let mut summaries = Vec::new();
    for event in opened {
        let id = event.aggregate_id();
        if !seen.insert(id) {
            continue;
        }
        let account = Account::load(id, stores).await?;
        summaries.push(AccountSummary::from(&account));
    }

    Ok(summaries)
}

/// Count and sum every event variant across all accounts
pub async fn ledger_statistics(stores: &Stores) -> AppResult<LedgerStatistics> {
    let mut stats = LedgerStatistics::default();

    for event_type in EventType::ALL {
        let events = stores.events.events_by_type(event_type).await?;
        let total = stats.total_mut(event_type);
        total.count = events.len();
        total.amount = events.iter().filter_map(|e| e.amount()).sum();
    }

    Ok(stats)
}
