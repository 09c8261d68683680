//! Session walkthrough
//!
//! Generates a secret phrase, derives two wallets per chain, reveals one
//! private key and deletes a wallet. Balance endpoints come from the
//! `SEEDWALLET_*` environment variables; unreachable nodes just show 0.

use seedwallet::account::VisibilityTarget;
use seedwallet::balance::OracleSet;
use seedwallet::config::OracleConfig;
use seedwallet::{Chain, SessionHandle, WalletSession};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,seedwallet=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let oracles = OracleSet::from_config(&OracleConfig::from_env())?;
    let handle = SessionHandle::new(WalletSession::new(), oracles);

    handle.generate_mnemonic().await?;

    let mut refreshes = Vec::new();
    for chain in Chain::ALL {
        for _ in 0..2 {
            refreshes.push(handle.generate_wallet(chain).await?);
        }
    }
    for refresh in refreshes {
        refresh.applied().await;
    }

    handle
        .toggle_visibility(VisibilityTarget::Wallet { chain: Chain::Ethereum, index: 0 })
        .await?;
    handle.delete_wallet(Chain::Solana, 0).await?;

    let snapshot = handle.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
