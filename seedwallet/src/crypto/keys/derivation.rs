//! Common key derivation functionality

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::mnemonic::Seed;
use crate::error::Result;

/// Supported chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Solana
    Solana,
    /// Ethereum and EVM compatible chains
    Ethereum,
}

impl Chain {
    /// Every supported chain, in display order
    pub const ALL: [Chain; 2] = [Chain::Solana, Chain::Ethereum];

    /// Ticker of the chain's native asset
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Solana => "SOL",
            Self::Ethereum => "ETH",
        }
    }

    /// Decimals between the base unit (lamports, wei) and the native unit
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Solana => 9,
            Self::Ethereum => 18,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solana => f.write_str("solana"),
            Self::Ethereum => f.write_str("ethereum"),
        }
    }
}

/// How a chain picks the index for its next wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Number of wallets currently held for the chain. Deleting a wallet
    /// makes an already issued index come around again.
    RegistryLength,
    /// Counter bumped on every successful derivation, never reused.
    MonotonicCounter,
}

/// A keypair derived for one chain at one index
pub struct DerivedKeypair {
    /// Base58 public key or checksummed hex address
    pub public_id: String,
    /// Hex encoded private key
    pub private_key: Zeroizing<String>,
    /// Index the keypair was derived at
    pub index: u32,
}

impl fmt::Debug for DerivedKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKeypair")
            .field("public_id", &self.public_id)
            .field("private_key", &"[REDACTED]")
            .field("index", &self.index)
            .finish()
    }
}

/// Deterministic per-chain key derivation
pub trait ChainDeriver: Send + Sync {
    /// Chain this deriver produces keys for
    fn chain(&self) -> Chain;

    /// Where the next index comes from
    fn index_policy(&self) -> IndexPolicy;

    /// Derive the keypair at `index`. Pure given `(seed, index)`.
    fn derive(&self, seed: &Seed, index: u32) -> Result<DerivedKeypair>;
}

/// Get the deriver for a chain
pub fn deriver_for(chain: Chain) -> &'static dyn ChainDeriver {
    match chain {
        Chain::Solana => &super::solana::SolanaDeriver,
        Chain::Ethereum => &super::ethereum::EthereumDeriver,
    }
}

/// Derive a keypair from a seed for a specific chain
pub fn derive_keypair(seed: &Seed, chain: Chain, index: u32) -> Result<DerivedKeypair> {
    deriver_for(chain).derive(seed, index)
}
