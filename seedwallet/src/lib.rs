//! Seedwallet - deterministic multi-chain wallets from one secret phrase
//!
//! This library derives Solana and Ethereum keypairs from a single BIP-39
//! mnemonic, keeps them in an in-memory session with per-wallet reveal
//! state, and looks up their balances without letting provider failures
//! interrupt wallet generation.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod balance;
pub mod session;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use crypto::keys::Chain;
pub use session::{SessionHandle, WalletSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
