//! Derived wallet

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::balance::Balance;
use crate::crypto::keys::{Chain, DerivedKeypair};

/// Identity of a registry slot.
///
/// Unlike a position, a slot id survives deletions of other wallets, so late
/// balance results can find their wallet again (or notice it is gone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotId(pub(crate) u64);

/// A wallet derived in this session
#[derive(Clone)]
pub struct Wallet {
    id: SlotId,
    chain: Chain,
    index: u32,
    public_id: String,
    private_key: Zeroizing<String>,
    balance: Balance,
}

impl Wallet {
    pub(crate) fn new(id: SlotId, chain: Chain, keypair: DerivedKeypair) -> Self {
        Self {
            id,
            chain,
            index: keypair.index,
            public_id: keypair.public_id,
            private_key: keypair.private_key,
            balance: Balance::ZERO,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Derivation index the keypair came from
    pub fn derivation_index(&self) -> u32 {
        self.index
    }

    /// Base58 public key (Solana) or checksummed address (Ethereum)
    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    /// Hex encoded private key
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Last known balance; zero until a lookup lands
    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("id", &self.id)
            .field("chain", &self.chain)
            .field("index", &self.index)
            .field("public_id", &self.public_id)
            .field("private_key", &"[REDACTED]")
            .field("balance", &self.balance)
            .finish()
    }
}
