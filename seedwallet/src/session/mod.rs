//! Wallet session
//!
//! A [`WalletSession`] owns everything derived from one secret phrase: the
//! mnemonic, the per-chain wallet lists with their reveal flags, and the
//! per-chain derivation counters. Nothing in it is ever written to disk.
//!
//! Generating a wallet is two-phase. [`WalletSession::derive_wallet`]
//! appends the wallet with a zero balance and returns a [`PendingBalance`];
//! once the lookup resolves, [`WalletSession::apply_balance`] patches the
//! wallet by slot identity. A result for a wallet deleted in between is
//! dropped.

mod shared;
mod snapshot;

pub use shared::{BalanceRefresh, SessionHandle};
pub use snapshot::{MnemonicView, SessionSnapshot, WalletView};

use serde::Serialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::account::{SecretVisibilityController, SlotId, VisibilityTarget, Wallet, WalletRegistry};
use crate::balance::{Balance, BalanceOracle};
use crate::crypto::keys::{deriver_for, Chain, IndexPolicy};
use crate::crypto::mnemonic::Mnemonic;
use crate::error::{Error, Result};

/// What to hand to the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CopyTarget {
    Mnemonic,
    PublicId { chain: Chain, index: usize },
    PrivateKey { chain: Chain, index: usize },
}

/// A wallet whose balance lookup has not landed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBalance {
    pub chain: Chain,
    pub slot: SlotId,
    /// Position at the time of derivation
    pub index: usize,
    pub public_id: String,
}

/// Successful derivations per chain since the current mnemonic was set
#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    solana: u32,
    ethereum: u32,
}

impl Counters {
    fn get(&self, chain: Chain) -> u32 {
        match chain {
            Chain::Solana => self.solana,
            Chain::Ethereum => self.ethereum,
        }
    }

    fn bump(&mut self, chain: Chain) {
        let counter = match chain {
            Chain::Solana => &mut self.solana,
            Chain::Ethereum => &mut self.ethereum,
        };
        *counter = counter.saturating_add(1);
    }
}

/// All wallet state of one user session
#[derive(Debug, Default)]
pub struct WalletSession {
    mnemonic: Option<Mnemonic>,
    registry: WalletRegistry,
    visibility: SecretVisibilityController,
    counters: Counters,
}

impl WalletSession {
    /// An empty session with no mnemonic
    pub fn new() -> Self {
        Self::default()
    }

    /// A session restored from an existing phrase
    pub fn with_mnemonic(phrase: &str) -> Result<Self> {
        Ok(Self {
            mnemonic: Some(Mnemonic::parse(phrase)?),
            ..Self::default()
        })
    }

    /// Generate a secret phrase if the session has none.
    ///
    /// Returns `true` when a new phrase was produced. With a phrase already
    /// present this is a no-op and returns `false`, so derived wallets keep
    /// their continuity.
    pub fn generate_mnemonic(&mut self) -> Result<bool> {
        if self.mnemonic.is_some() {
            debug!("mnemonic already present, keeping it");
            return Ok(false);
        }

        let mnemonic = Mnemonic::generate()?;

        self.clear_wallets();
        self.mnemonic = Some(mnemonic);

        info!("generated new mnemonic");
        Ok(true)
    }

    /// Forget the mnemonic and every wallet derived from it.
    ///
    /// Slot ids keep counting, so a lookup started before the reset can
    /// never land on a wallet derived after it.
    pub fn reset(&mut self) {
        self.mnemonic = None;
        self.clear_wallets();
        info!("session reset");
    }

    fn clear_wallets(&mut self) {
        for chain in Chain::ALL {
            self.registry.clear(chain);
        }
        self.counters = Counters::default();
        self.visibility.reset();
    }

    pub fn mnemonic(&self) -> Option<&Mnemonic> {
        self.mnemonic.as_ref()
    }

    pub fn has_mnemonic(&self) -> bool {
        self.mnemonic.is_some()
    }

    /// Successful derivations for a chain since the mnemonic was set
    pub fn derivation_counter(&self, chain: Chain) -> u32 {
        self.counters.get(chain)
    }

    /// Index the next wallet of `chain` will be derived at
    pub fn next_derivation_index(&self, chain: Chain) -> Result<u32> {
        match deriver_for(chain).index_policy() {
            IndexPolicy::RegistryLength => u32::try_from(self.registry.len(chain))
                .map_err(|_| Error::KeyDerivation(format!("Too many {} wallets", chain))),
            IndexPolicy::MonotonicCounter => Ok(self.counters.get(chain)),
        }
    }

    /// Phase one of wallet generation: derive and append with a zero balance.
    ///
    /// Fails with [`Error::InvalidState`] when there is no mnemonic. A
    /// derivation failure leaves the registry and counters untouched.
    pub fn derive_wallet(&mut self, chain: Chain) -> Result<PendingBalance> {
        let mnemonic = self.mnemonic.as_ref().ok_or_else(|| {
            Error::InvalidState("No secret phrase; generate one before creating wallets".to_string())
        })?;

        let seed = mnemonic.to_seed()?;
        let index = self.next_derivation_index(chain)?;
        let keypair = deriver_for(chain).derive(&seed, index)?;
        let public_id = keypair.public_id.clone();

        let position = self.registry.append(chain, keypair);
        self.counters.bump(chain);
        let slot = self.registry.get(chain, position)?.id();

        info!(%chain, position, derivation_index = index, public_id = %public_id, "derived wallet");

        Ok(PendingBalance {
            chain,
            slot,
            index: position,
            public_id,
        })
    }

    /// Phase two of wallet generation: store a resolved balance.
    ///
    /// Returns `false` when the wallet was deleted while the lookup ran.
    pub fn apply_balance(&mut self, pending: &PendingBalance, balance: Balance) -> bool {
        let applied = self.registry.set_balance(pending.chain, pending.slot, balance);
        if !applied {
            debug!(chain = %pending.chain, public_id = %pending.public_id, "wallet gone, discarding balance");
        }
        applied
    }

    /// Derive a wallet, look up its balance and store it.
    ///
    /// Returns the wallet's position. Balance failures never surface here;
    /// the wallet keeps a zero balance instead.
    pub async fn generate_wallet(&mut self, chain: Chain, oracle: &dyn BalanceOracle) -> Result<usize> {
        let pending = self.derive_wallet(chain)?;
        let balance = oracle.lookup(&pending.public_id).await;
        self.apply_balance(&pending, balance);

        Ok(self.registry.position_of(chain, pending.slot).unwrap_or(pending.index))
    }

    /// Delete the wallet at `index`. Later wallets move down one position.
    pub fn delete_wallet(&mut self, chain: Chain, index: usize) -> Result<()> {
        let wallet = self.registry.remove(chain, index)?;
        info!(%chain, index, public_id = %wallet.public_id(), "deleted wallet");
        Ok(())
    }

    /// Flip a reveal flag and return its new value
    pub fn toggle_visibility(&mut self, target: VisibilityTarget) -> Result<bool> {
        match target {
            VisibilityTarget::Mnemonic => Ok(self.visibility.toggle_mnemonic()),
            VisibilityTarget::Wallet { chain, index } => {
                self.visibility.toggle_wallet(&mut self.registry, chain, index)
            }
        }
    }

    /// Wallet at a position
    pub fn wallet(&self, chain: Chain, index: usize) -> Result<&Wallet> {
        self.registry.get(chain, index)
    }

    /// Wallets of a chain, in display order
    pub fn wallets(&self, chain: Chain) -> impl Iterator<Item = &Wallet> + '_ {
        self.registry.wallets(chain)
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    /// Plain text for the clipboard, regardless of reveal state.
    ///
    /// The buffer is wiped on drop, whichever target was copied.
    pub fn copy_text(&self, target: CopyTarget) -> Result<Zeroizing<String>> {
        let text = match target {
            CopyTarget::Mnemonic => self
                .mnemonic
                .as_ref()
                .map(|mnemonic| mnemonic.phrase())
                .ok_or_else(|| Error::InvalidState("No secret phrase to copy".to_string()))?,
            CopyTarget::PublicId { chain, index } => self.registry.get(chain, index)?.public_id(),
            CopyTarget::PrivateKey { chain, index } => self.registry.get(chain, index)?.private_key(),
        };
        Ok(Zeroizing::new(text.to_string()))
    }

    /// Read-only view with hidden secrets masked
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self.mnemonic.as_ref(), &self.registry, &self.visibility)
    }
}
