//! ledger_es - account overview
//!
//! Prints every account and the ledger-wide totals for the configured stores.

use std::sync::Arc;

use ledger_es::projection::{ledger_statistics, list_accounts};
use ledger_es::{Config, Stores, TracingTelemetry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledger_es=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(
        backend = ?config.backend,
        event_log = %config.event_log_path.display(),
        snapshots = %config.snapshot_dir.display(),
        "Opening ledger"
    );

    let stores = Stores::from_config(&config, Arc::new(TracingTelemetry));

    let accounts = list_accounts(&stores).await?;
    for account in &accounts {
        println!(
            "{}  {:<20} {:>14} {}  v{}{}",
            account.id,
            account.holder,
            account.balance,
            account.currency,
            account.version,
            if account.active { "" } else { "  (closed)" }
        );
    }

    let stats = ledger_statistics(&stores).await?;
    println!();
    println!("Accounts: {} ({} active)", stats.opened.count, stats.active_accounts());
    println!("Opening:     {:>6} {:>14}", stats.opened.count, stats.opened.amount);
    println!("Deposits:    {:>6} {:>14}", stats.deposited.count, stats.deposited.amount);
    println!("Withdrawals: {:>6} {:>14}", stats.withdrawn.count, stats.withdrawn.amount);
    println!("Transfers:   {:>6} {:>14}", stats.transferred.count, stats.transferred.amount);
    println!("Net flow:           {:>14}", stats.net_flow());

    Ok(())
}
