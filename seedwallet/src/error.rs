//! Error types for the seedwallet library

use thiserror::Error;

use crate::crypto::keys::Chain;

/// Custom error type for seedwallet operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// An operation needs state the session does not have yet
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Index {index} is out of range for {chain} wallets (len {len})")]
    OutOfRange {
        chain: Chain,
        index: usize,
        len: usize,
    },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for seedwallet operations
pub type Result<T> = std::result::Result<T, Error>;
