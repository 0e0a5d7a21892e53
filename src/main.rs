use atm_engine::application::engine::AtmEngine;
use atm_engine::domain::account::Account;
use atm_engine::domain::ports::{AccountStoreBox, NotificationSinkBox};
use atm_engine::infrastructure::in_memory::InMemoryAccountStore;
use atm_engine::infrastructure::notification::ChannelNotificationSink;
use atm_engine::interfaces::http;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cash loaded into the dispenser at startup
    #[arg(long)]
    cash: Decimal,

    /// JSON file with the account records to seed the store
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Address to serve the API on
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let store = InMemoryAccountStore::new();
    if let Some(path) = &cli.accounts {
        let raw = std::fs::read_to_string(path).into_diagnostic()?;
        let accounts: Vec<Account> = serde_json::from_str(&raw).into_diagnostic()?;
        for account in accounts {
            store.insert(account).await;
        }
    }

    let (sink, mut completions) = ChannelNotificationSink::unbounded();
    let account_store: AccountStoreBox = Box::new(store);
    let notification_sink: NotificationSinkBox = Box::new(sink);
    let engine = Arc::new(AtmEngine::new(account_store, notification_sink, cli.cash).into_diagnostic()?);

    // Downstream bookkeeping stand-in: log each settled withdrawal.
    tokio::spawn(async move {
        while let Some(event) = completions.recv().await {
            tracing::info!(amount = %event.amount, "withdrawal completed");
        }
    });

    let app = http::router(Arc::clone(&engine));
    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .into_diagnostic()?;
    tracing::info!(listen = %cli.listen, cash = %engine.cash_available(), "ATM API listening");
    axum::serve(listener, app).await.into_diagnostic()?;

    Ok(())
}
