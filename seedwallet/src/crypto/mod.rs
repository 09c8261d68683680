//! Cryptographic primitives and operations
//!
//! This module provides mnemonic generation, seed derivation and the
//! per-chain key derivation used by the wallet session.

pub mod mnemonic;
pub mod keys;

pub use mnemonic::*;
pub use keys::*;
