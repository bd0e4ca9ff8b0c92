//! Account Aggregate
//!
//! Account is the aggregate for a single ledger account.
//! Commands validate against current state, emit an event with the next
//! version, apply it and buffer it. Persistence is a separate `save` step.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    AccountClosed, AccountEvent, AccountOpened, Amount, Balance, DomainError, MoneyDeposited,
    MoneyTransferred, MoneyWithdrawn,
};
use crate::error::{AppError, AppResult};
use crate::event_store::StoreError;
use crate::snapshot::Snapshot;

use super::{Aggregate, Stores};

/// Currency used when the caller does not pick one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Events persisted since the last snapshot that trigger a new one
pub const SNAPSHOT_THRESHOLD: usize = 10;

/// Account Aggregate
///
/// State is derived from events, never directly mutated.
#[derive(Debug, Clone, Default)]
pub struct Account {
    /// Unique account ID
    id: Uuid,

    /// Account holder name
    holder: String,

    /// Current balance (derived from events)
    balance: Balance,

    /// ISO currency code
    currency: String,

    /// False before opening and after closing
    active: bool,

    /// Version of the last applied event
    version: Option<u64>,

    /// Events applied to this instance, in order
    history: Vec<AccountEvent>,

    /// Events not yet handed to the event store
    uncommitted: Vec<AccountEvent>,

    /// Events persisted by `save` since the last snapshot
    events_since_snapshot: usize,
}

impl Account {
    // =========================================================================
    // Commands
    // =========================================================================

    /// Open a new account; the returned account holds the version-0 event
    /// in its uncommitted buffer.
    pub fn open(
        holder: impl Into<String>,
        initial_amount: Decimal,
        currency: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let holder = holder.into().trim().to_string();
        if holder.is_empty() {
            return Err(DomainError::invalid_argument("holder name must not be empty"));
        }

        if initial_amount < Decimal::ZERO {
            return Err(DomainError::invalid_argument(format!(
                "initial amount must not be negative (got {})",
                initial_amount
            )));
        }

        let currency = currency.into().trim().to_ascii_uppercase();
        if currency.is_empty() {
            return Err(DomainError::invalid_argument("currency must not be empty"));
        }

        let mut account = Self::default();
        account.record(AccountEvent::Opened(AccountOpened {
            aggregate_id: Uuid::new_v4(),
            version: 0,
            holder,
            initial_amount,
            currency,
            occurred_at: Utc::now(),
        }));

        Ok(account)
    }

    /// Deposit money into the account
    pub fn deposit(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        let amount = Amount::new(amount)?;
        self.balance.credit(amount.value())?;

        self.record(AccountEvent::Deposited(MoneyDeposited {
            aggregate_id: self.id,
            version: self.next_version(),
            amount: amount.value(),
            description: description.into(),
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Withdraw money from the account
    pub fn withdraw(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        let amount = Amount::new(amount)?;
        self.ensure_covers(&amount)?;

        self.record(AccountEvent::Withdrawn(MoneyWithdrawn {
            aggregate_id: self.id,
            version: self.next_version(),
            amount: amount.value(),
            description: description.into(),
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Send money to another account.
    /// Only this account's side is recorded; the destination is not credited.
    pub fn transfer_out(
        &mut self,
        destination_id: Uuid,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        let amount = Amount::new(amount)?;

        if destination_id == self.id || destination_id.is_nil() {
            return Err(DomainError::invalid_argument(format!(
                "invalid transfer destination {}",
                destination_id
            )));
        }

        self.ensure_covers(&amount)?;

        self.record(AccountEvent::Transferred(MoneyTransferred {
            aggregate_id: self.id,
            version: self.next_version(),
            amount: amount.value(),
            destination_id,
            description: description.into(),
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Close the account. The balance must be exactly zero.
    pub fn close(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_active()?;

        if !self.balance.is_zero() {
            return Err(DomainError::NonZeroBalance(self.balance.value()));
        }

        self.record(AccountEvent::Closed(AccountClosed {
            aggregate_id: self.id,
            version: self.next_version(),
            reason: reason.into(),
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Run a command against this account, reporting a rejection to the
    /// stores' telemetry before returning it.
    ///
    /// ```ignore
    /// account.execute(&stores, |a| a.deposit(dec!(5), "top-up"))?;
    /// ```
    pub fn execute<F>(&mut self, stores: &Stores, command: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Self) -> Result<(), DomainError>,
    {
        let result = command(self);
        if let Err(err) = &result {
            stores.telemetry.command_rejected(self.id, err);
        }
        result
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if !self.active {
            return Err(DomainError::InactiveAggregate(self.id));
        }
        Ok(())
    }

    fn ensure_covers(&self, amount: &Amount) -> Result<(), DomainError> {
        if !self.balance.is_sufficient_for(amount) {
            return Err(DomainError::insufficient_funds(
                amount.value(),
                self.balance.value(),
            ));
        }
        Ok(())
    }

    fn record(&mut self, event: AccountEvent) {
        self.apply(event.clone());
        self.uncommitted.push(event);
    }

    // =========================================================================
    // Replay
    // =========================================================================

    /// Rebuild an account from an optional snapshot plus the events after it.
    ///
    /// `events` must be sorted ascending and start right after the snapshot's
    /// version (or at 0 without a snapshot).
    pub fn load_from_history(
        snapshot: Option<&Snapshot>,
        events: impl IntoIterator<Item = AccountEvent>,
    ) -> Result<Self, StoreError> {
        let mut account = snapshot.map(Self::from_snapshot).unwrap_or_default();

        for event in events {
            let expected = account.next_version();
            if event.version() != expected {
                return Err(StoreError::VersionGap {
                    aggregate_id: event.aggregate_id(),
                    expected,
                    found: event.version(),
                });
            }
            if account.balance_after(&event).is_none() {
                return Err(StoreError::BalanceOverflow {
                    aggregate_id: event.aggregate_id(),
                    version: event.version(),
                });
            }
            account.apply(event);
        }

        Ok(account)
    }

    fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.aggregate_id,
            holder: snapshot.holder.clone(),
            balance: Balance::from_snapshot(snapshot.balance),
            currency: snapshot.currency.clone(),
            active: snapshot.active,
            version: Some(snapshot.version),
            ..Self::default()
        }
    }

    /// Capture the current state
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            aggregate_id: self.id,
            holder: self.holder.clone(),
            balance: self.balance.value(),
            currency: self.currency.clone(),
            active: self.active,
            version: self.version.unwrap_or_default(),
            taken_at: Utc::now(),
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Persist uncommitted events, then snapshot if enough events have
    /// accumulated since the last snapshot.
    ///
    /// Returns whether a snapshot was written. If the event store fails the
    /// uncommitted buffer is kept so the call can be repeated. If only the
    /// snapshot write fails the events are already persisted and the buffer
    /// is cleared; the counter is left above the threshold so the next save
    /// that persists events writes the snapshot.
    pub async fn save(&mut self, stores: &Stores) -> AppResult<bool> {
        if self.uncommitted.is_empty() {
            return Ok(false);
        }

        stores.events.save_events(self.id, &self.uncommitted).await?;
        self.events_since_snapshot += self.uncommitted.len();
        self.uncommitted.clear();

        if self.events_since_snapshot < SNAPSHOT_THRESHOLD {
            return Ok(false);
        }

        let snapshot = self.to_snapshot();
        stores.snapshots.save_snapshot(self.id, &snapshot).await?;
        stores.telemetry.snapshot_saved(self.id, snapshot.version);
        self.events_since_snapshot = 0;

        Ok(true)
    }

    /// Load an account: latest snapshot plus the events recorded after it
    pub async fn load(aggregate_id: Uuid, stores: &Stores) -> AppResult<Self> {
        let snapshot = stores.snapshots.get_snapshot(aggregate_id).await?;
        let mut events = stores.events.get_events(aggregate_id).await?;

        if let Some(snapshot) = &snapshot {
            events.retain(|e| e.version() > snapshot.version);
        }
        events.sort_by_key(AccountEvent::version);

        if snapshot.is_none() && events.is_empty() {
            return Err(AppError::NotFound(aggregate_id));
        }

        let replayed = events.len();
        let account = Self::load_from_history(snapshot.as_ref(), events)?;

        stores.telemetry.aggregate_loaded(
            aggregate_id,
            account.version,
            snapshot.map(|s| s.version),
            replayed,
        );

        Ok(account)
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Events applied to this instance. After a snapshot load this only
    /// holds the replayed tail.
    pub fn history(&self) -> &[AccountEvent] {
        &self.history
    }

    pub fn uncommitted_events(&self) -> &[AccountEvent] {
        &self.uncommitted
    }

    pub fn events_since_snapshot(&self) -> usize {
        self.events_since_snapshot
    }
}

impl Aggregate for Account {
    type Event = AccountEvent;

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> Option<u64> {
        self.version
    }

    fn apply(&mut self, event: Self::Event) {
        // Commands reject overflowing amounts and replay checks each event
        // first, so a failed move is unreachable; the balance is left as is.
        if let Some(balance) = self.balance_after(&event) {
            self.balance = balance;
        }

        match &event {
            AccountEvent::Opened(e) => {
                self.id = e.aggregate_id;
                self.holder = e.holder.clone();
                self.currency = e.currency.clone();
                self.active = true;
            }
            AccountEvent::Deposited(_)
            | AccountEvent::Withdrawn(_)
            | AccountEvent::Transferred(_) => {}
            AccountEvent::Closed(_) => {
                self.active = false;
            }
        }

        self.version = Some(event.version());
        self.history.push(event);
    }
}

impl Account {
    /// Balance once `event` is applied, `None` if it would overflow
    fn balance_after(&self, event: &AccountEvent) -> Option<Balance> {
        match event {
            AccountEvent::Opened(e) => Balance::zero().credit(e.initial_amount).ok(),
            AccountEvent::Deposited(e) => self.balance.credit(e.amount).ok(),
            AccountEvent::Withdrawn(e) => self.balance.debit(e.amount).ok(),
            AccountEvent::Transferred(e) => self.balance.debit(e.amount).ok(),
            AccountEvent::Closed(_) => Some(self.balance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventType;
    use crate::event_store::InMemoryEventStore;
    use crate::snapshot::{InMemorySnapshotStore, SnapshotStore};
    use crate::telemetry::{NoopTelemetry, Telemetry};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn open(holder: &str, initial: Decimal) -> Account {
        Account::open(holder, initial, DEFAULT_CURRENCY).unwrap()
    }

    #[test]
    fn test_open_account() {
        let account = Account::open("  Alice ", dec!(1000), "usd").unwrap();

        assert!(!account.id().is_nil());
        assert_eq!(account.holder(), "Alice");
        assert_eq!(account.currency(), "USD");
        assert_eq!(account.balance().value(), dec!(1000));
        assert!(account.is_active());
        assert_eq!(account.version(), Some(0));
        assert_eq!(account.uncommitted_events().len(), 1);
        assert_eq!(
            account.uncommitted_events()[0].event_type(),
            EventType::Opened
        );
    }

    #[test]
    fn test_open_rejects_invalid_input() {
        assert!(matches!(
            Account::open("   ", dec!(10), "USD"),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            Account::open("Eve", dec!(-1), "USD"),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            Account::open("Eve", dec!(1), " "),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unset_account_rejects_commands() {
        let mut account = Account::default();
        assert_eq!(account.version(), None);
        assert!(matches!(
            account.deposit(dec!(1), "x"),
            Err(DomainError::InactiveAggregate(_))
        ));
    }

    #[test]
    fn test_deposit_then_withdraw() {
        let mut account = open("Alice", dec!(1000));
        account.deposit(dec!(500), "salary").unwrap();
        account.withdraw(dec!(200), "rent").unwrap();

        assert_eq!(account.balance().value(), dec!(1300));
        assert_eq!(account.version(), Some(2));
        assert_eq!(account.history().len(), 3);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut account = open("Alice", dec!(100));

        for amount in [dec!(0), dec!(-5)] {
            assert!(matches!(
                account.deposit(amount, "x"),
                Err(DomainError::InvalidArgument(_))
            ));
            assert!(matches!(
                account.withdraw(amount, "x"),
                Err(DomainError::InvalidArgument(_))
            ));
            assert!(matches!(
                account.transfer_out(Uuid::new_v4(), amount, "x"),
                Err(DomainError::InvalidArgument(_))
            ));
        }

        assert_eq!(account.version(), Some(0));
        assert_eq!(account.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_insufficient_funds_leaves_state_unchanged() {
        let mut account = open("Bob", dec!(0));

        let result = account.withdraw(dec!(50), "too much");
        assert!(matches!(
            result,
            Err(DomainError::InsufficientFunds { requested, available })
                if requested == dec!(50) && available == dec!(0)
        ));

        let result = account.transfer_out(Uuid::new_v4(), dec!(50), "too much");
        assert!(matches!(result, Err(DomainError::InsufficientFunds { .. })));

        assert_eq!(account.balance().value(), dec!(0));
        assert_eq!(account.version(), Some(0));
    }

    #[test]
    fn test_transfer_out_debits_only_source() {
        let mut account = open("Alice", dec!(100));
        let destination = Uuid::new_v4();

        account.transfer_out(destination, dec!(40), "rent").unwrap();

        assert_eq!(account.balance().value(), dec!(60));
        match account.history().last().unwrap() {
            AccountEvent::Transferred(e) => {
                assert_eq!(e.destination_id, destination);
                assert_eq!(e.version, 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_transfer_to_self_rejected() {
        let mut account = open("Alice", dec!(100));
        let own_id = account.id();

        assert!(matches!(
            account.transfer_out(own_id, dec!(10), "loop"),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_close_with_zero_balance() {
        let mut account = open("Carl", dec!(100));
        account.withdraw(dec!(100), "everything").unwrap();
        account.close("done").unwrap();

        assert_eq!(account.balance().value(), dec!(0));
        assert!(!account.is_active());
        assert_eq!(account.version(), Some(2));
    }

    #[test]
    fn test_close_with_balance_rejected() {
        let mut account = open("Carl", dec!(100));

        assert!(matches!(
            account.close("early"),
            Err(DomainError::NonZeroBalance(b)) if b == dec!(100)
        ));
        assert!(account.is_active());
    }

    #[test]
    fn test_closed_account_rejects_commands() {
        let mut account = open("Dana", dec!(0));
        account.close("done").unwrap();

        assert!(matches!(
            account.deposit(dec!(10), "late"),
            Err(DomainError::InactiveAggregate(_))
        ));
        assert!(matches!(
            account.withdraw(dec!(10), "late"),
            Err(DomainError::InactiveAggregate(_))
        ));
        assert!(matches!(
            account.close("again"),
            Err(DomainError::InactiveAggregate(_))
        ));
        assert_eq!(account.version(), Some(1));
    }

    #[test]
    fn test_version_increments_by_one() {
        let mut account = open("Alice", dec!(10));
        for expected in 1..=5u64 {
            account.deposit(dec!(1), "tick").unwrap();
            assert_eq!(account.version(), Some(expected));
        }
    }

    #[test]
    fn test_replay_matches_command_path() {
        let mut account = open("Alice", dec!(1000));
        account.deposit(dec!(500), "a").unwrap();
        account.withdraw(dec!(200), "b").unwrap();
        account.transfer_out(Uuid::new_v4(), dec!(300), "c").unwrap();

        let replayed =
            Account::load_from_history(None, account.uncommitted_events().to_vec()).unwrap();

        assert_eq!(replayed.id(), account.id());
        assert_eq!(replayed.balance(), account.balance());
        assert_eq!(replayed.version(), account.version());
        assert_eq!(replayed.history(), account.history());
        assert!(replayed.uncommitted_events().is_empty());
        assert_eq!(replayed.events_since_snapshot(), 0);
    }

    #[test]
    fn test_replay_from_any_snapshot_is_deterministic() {
        let mut account = open("Alice", dec!(50));
        for i in 1..=6 {
            account.deposit(Decimal::from(i * 10), "in").unwrap();
            account.withdraw(dec!(5), "out").unwrap();
        }
        let events = account.uncommitted_events().to_vec();
        let full = Account::load_from_history(None, events.clone()).unwrap();

        for k in 0..events.len() - 1 {
            let prefix = Account::load_from_history(None, events[..=k].to_vec()).unwrap();
            let snapshot = prefix.to_snapshot();
            let rebuilt =
                Account::load_from_history(Some(&snapshot), events[k + 1..].to_vec()).unwrap();

            assert_eq!(rebuilt.id(), full.id());
            assert_eq!(rebuilt.holder(), full.holder());
            assert_eq!(rebuilt.balance(), full.balance());
            assert_eq!(rebuilt.currency(), full.currency());
            assert_eq!(rebuilt.is_active(), full.is_active());
            assert_eq!(rebuilt.version(), full.version());
        }

        // 50 + (10+20+...+60) - 6*5
        assert_eq!(full.balance().value(), dec!(230));
    }

    #[test]
    fn test_replay_rejects_gap() {
        let mut account = open("Alice", dec!(10));
        account.deposit(dec!(1), "a").unwrap();
        account.deposit(dec!(1), "b").unwrap();

        let mut events = account.uncommitted_events().to_vec();
        events.remove(1);

        let err = Account::load_from_history(None, events).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionGap { expected: 1, found: 2, .. }
        ));
    }

    #[test]
    fn test_replay_rejects_overflowing_balance() {
        let mut account = open("Alice", Decimal::MAX);
        let id = account.id();
        let mut events = account.uncommitted_events().to_vec();
        events.push(AccountEvent::Deposited(MoneyDeposited {
            aggregate_id: id,
            version: 1,
            amount: dec!(1),
            description: "tampered".to_string(),
            occurred_at: Utc::now(),
        }));

        let err = Account::load_from_history(None, events).unwrap_err();
        assert!(matches!(
            err,
            StoreError::BalanceOverflow { version: 1, aggregate_id } if aggregate_id == id
        ));

        // The command path refuses the same deposit
        assert!(account.deposit(dec!(1), "more").is_err());
    }

    #[tokio::test]
    async fn test_save_clears_buffer() {
        let stores = Stores::in_memory(Arc::new(NoopTelemetry));
        let mut account = open("Alice", dec!(10));
        account.deposit(dec!(5), "a").unwrap();

        let snapshotted = account.save(&stores).await.unwrap();

        assert!(!snapshotted);
        assert!(account.uncommitted_events().is_empty());
        assert_eq!(account.events_since_snapshot(), 2);
        assert_eq!(stores.events.get_events(account.id()).await.unwrap().len(), 2);

        // Nothing new to save
        assert!(!account.save(&stores).await.unwrap());
        assert_eq!(stores.events.get_events(account.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_snapshots_at_threshold() {
        let stores = Stores::in_memory(Arc::new(NoopTelemetry));
        let mut account = open("Alice", dec!(0));
        for _ in 0..9 {
            account.deposit(dec!(1), "in").unwrap();
        }
        assert_eq!(account.uncommitted_events().len(), SNAPSHOT_THRESHOLD);

        assert!(account.save(&stores).await.unwrap());
        assert_eq!(account.events_since_snapshot(), 0);

        let snapshot = stores
            .snapshots
            .get_snapshot(account.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.version, 9);
        assert_eq!(snapshot.balance, dec!(9));
    }

    #[tokio::test]
    async fn test_load_unknown_is_not_found() {
        let stores = Stores::in_memory(Arc::new(NoopTelemetry));
        let id = Uuid::new_v4();

        let err = Account::load(id, &stores).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_load_round_trip() {
        let stores = Stores::in_memory(Arc::new(NoopTelemetry));
        let mut account = open("Alice", dec!(1000));
        account.deposit(dec!(500), "a").unwrap();
        account.save(&stores).await.unwrap();
        account.withdraw(dec!(200), "b").unwrap();
        account.save(&stores).await.unwrap();

        let loaded = Account::load(account.id(), &stores).await.unwrap();
        assert_eq!(loaded.balance().value(), dec!(1300));
        assert_eq!(loaded.version(), Some(2));
        assert_eq!(loaded.holder(), "Alice");
    }

    #[derive(Default)]
    struct RejectionCounter {
        rejected: AtomicUsize,
    }

    impl Telemetry for RejectionCounter {
        fn command_rejected(&self, _aggregate_id: Uuid, _error: &DomainError) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_execute_reports_rejections_only() {
        let telemetry = Arc::new(RejectionCounter::default());
        let stores = Stores::in_memory(telemetry.clone());
        let mut account = open("Alice", dec!(10));

        account
            .execute(&stores, |a| a.deposit(dec!(5), "ok"))
            .unwrap();
        let err = account
            .execute(&stores, |a| a.withdraw(dec!(100), "too much"))
            .unwrap_err();

        assert!(matches!(err, DomainError::InsufficientFunds { .. }));
        assert_eq!(telemetry.rejected.load(Ordering::SeqCst), 1);
        assert_eq!(account.balance().value(), dec!(15));
        assert_eq!(account.uncommitted_events().len(), 2);
    }

    /// Snapshot store whose first write fails
    #[derive(Default)]
    struct FailingOnceSnapshots {
        failed: AtomicBool,
        inner: InMemorySnapshotStore,
    }

    #[async_trait]
    impl SnapshotStore for FailingOnceSnapshots {
        async fn save_snapshot(
            &self,
            aggregate_id: Uuid,
            snapshot: &Snapshot,
        ) -> Result<(), StoreError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.inner.save_snapshot(aggregate_id, snapshot).await
        }

        async fn get_snapshot(&self, aggregate_id: Uuid) -> Result<Option<Snapshot>, StoreError> {
            self.inner.get_snapshot(aggregate_id).await
        }
    }

    #[tokio::test]
    async fn test_failed_snapshot_is_retried_on_next_save() {
        let stores = Stores::new(
            Arc::new(InMemoryEventStore::new()),
            Arc::new(FailingOnceSnapshots::default()),
            Arc::new(NoopTelemetry),
        );
        let mut account = open("Alice", dec!(0));
        for _ in 0..9 {
            account.deposit(dec!(1), "in").unwrap();
        }

        let err = account.save(&stores).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(StoreError::Io(_))));
        assert!(account.uncommitted_events().is_empty());
        assert_eq!(stores.events.get_events(account.id()).await.unwrap().len(), 10);
        assert_eq!(account.events_since_snapshot(), SNAPSHOT_THRESHOLD);

        // Nothing new to persist, so nothing is retried yet
        assert!(!account.save(&stores).await.unwrap());

        account.deposit(dec!(1), "in").unwrap();
        assert!(account.save(&stores).await.unwrap());
        assert_eq!(account.events_since_snapshot(), 0);

        let snapshot = stores.snapshots.get_snapshot(account.id()).await.unwrap().unwrap();
        assert_eq!(snapshot.version, 10);
    }

    #[tokio::test]
    async fn test_replayed_events_do_not_count_towards_snapshot() {
        let stores = Stores::in_memory(Arc::new(NoopTelemetry));
        let mut account = open("Alice", dec!(0));
        for _ in 0..11 {
            account.deposit(dec!(1), "in").unwrap();
        }
        stores
            .events
            .save_events(account.id(), account.uncommitted_events())
            .await
            .unwrap();

        let mut loaded = Account::load(account.id(), &stores).await.unwrap();
        assert_eq!(loaded.events_since_snapshot(), 0);

        loaded.deposit(dec!(1), "in").unwrap();
        assert!(!loaded.save(&stores).await.unwrap());
        assert_eq!(loaded.events_since_snapshot(), 1);
        assert!(stores
            .snapshots
            .get_snapshot(account.id())
            .await
            .unwrap()
            .is_none());
    }
}
