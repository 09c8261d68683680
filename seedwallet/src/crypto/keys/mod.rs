//! Key derivation and management
//!
//! Each chain has its own [`ChainDeriver`]: Solana offsets the raw seed,
//! Ethereum walks a BIP-32 path.

pub mod ethereum;
pub mod solana;
mod derivation;

pub use derivation::*;
pub use ethereum::EthereumDeriver;
pub use solana::SolanaDeriver;
