//! Ordered per-chain wallet registry

use tracing::debug;

use crate::balance::Balance;
use crate::crypto::keys::{Chain, DerivedKeypair};
use crate::error::{Error, Result};
use super::wallet::{SlotId, Wallet};

/// A wallet and its reveal flag. Keeping them in one entry means every
/// mutation of the list moves both together.
#[derive(Debug, Clone)]
struct Entry {
    wallet: Wallet,
    revealed: bool,
}

#[derive(Debug, Default, Clone)]
struct ChainList {
    entries: Vec<Entry>,
}

/// Wallets derived in this session, in insertion order per chain
#[derive(Debug, Default, Clone)]
pub struct WalletRegistry {
    solana: ChainList,
    ethereum: ChainList,
    next_slot: u64,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, chain: Chain) -> &ChainList {
        match chain {
            Chain::Solana => &self.solana,
            Chain::Ethereum => &self.ethereum,
        }
    }

    fn list_mut(&mut self, chain: Chain) -> &mut ChainList {
        match chain {
            Chain::Solana => &mut self.solana,
            Chain::Ethereum => &mut self.ethereum,
        }
    }

    fn check_index(&self, chain: Chain, index: usize) -> Result<()> {
        let len = self.len(chain);
        if index >= len {
            return Err(Error::OutOfRange { chain, index, len });
        }
        Ok(())
    }

    /// Append a freshly derived wallet, hidden, and return its position
    pub fn append(&mut self, chain: Chain, keypair: DerivedKeypair) -> usize {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;

        let list = self.list_mut(chain);
        list.entries.push(Entry {
            wallet: Wallet::new(id, chain, keypair),
            revealed: false,
        });
        list.entries.len() - 1
    }

    /// Remove the wallet at `index`, shifting later wallets down by one
    pub fn remove(&mut self, chain: Chain, index: usize) -> Result<Wallet> {
        self.check_index(chain, index)?;
        let entry = self.list_mut(chain).entries.remove(index);
        debug!(%chain, index, slot = entry.wallet.id().0, "removed wallet");
        Ok(entry.wallet)
    }

    /// Drop every wallet of a chain
    pub fn clear(&mut self, chain: Chain) {
        self.list_mut(chain).entries.clear();
    }

    pub fn len(&self, chain: Chain) -> usize {
        self.list(chain).entries.len()
    }

    pub fn is_empty(&self, chain: Chain) -> bool {
        self.list(chain).entries.is_empty()
    }

    /// Wallet at a position
    pub fn get(&self, chain: Chain, index: usize) -> Result<&Wallet> {
        self.check_index(chain, index)?;
        Ok(&self.list(chain).entries[index].wallet)
    }

    /// Wallets of a chain, in display order
    pub fn wallets(&self, chain: Chain) -> impl Iterator<Item = &Wallet> + '_ {
        self.list(chain).entries.iter().map(|entry| &entry.wallet)
    }

    /// Current position of a slot, if it is still present
    pub fn position_of(&self, chain: Chain, id: SlotId) -> Option<usize> {
        self.list(chain)
            .entries
            .iter()
            .position(|entry| entry.wallet.id() == id)
    }

    /// Patch the balance of a slot. Returns `false` when the slot is gone.
    pub fn set_balance(&mut self, chain: Chain, id: SlotId, balance: Balance) -> bool {
        match self.list_mut(chain).entries.iter_mut().find(|entry| entry.wallet.id() == id) {
            Some(entry) => {
                entry.wallet.set_balance(balance);
                true
            }
            None => false,
        }
    }

    /// Whether the private key at `index` is revealed
    pub fn is_revealed(&self, chain: Chain, index: usize) -> Result<bool> {
        self.check_index(chain, index)?;
        Ok(self.list(chain).entries[index].revealed)
    }

    /// Reveal flags, parallel to [`Self::wallets`]
    pub fn visibility_flags(&self, chain: Chain) -> Vec<bool> {
        self.list(chain).entries.iter().map(|entry| entry.revealed).collect()
    }

    /// Flip the reveal flag at `index` and return the new value
    pub(crate) fn toggle_revealed(&mut self, chain: Chain, index: usize) -> Result<bool> {
        self.check_index(chain, index)?;
        let entry = &mut self.list_mut(chain).entries[index];
        entry.revealed = !entry.revealed;
        Ok(entry.revealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    fn keypair(id: &str) -> DerivedKeypair {
        DerivedKeypair {
            public_id: id.to_string(),
            private_key: Zeroizing::new(format!("secret-{}", id)),
            index: 0,
        }
    }

    fn ids(registry: &WalletRegistry, chain: Chain) -> Vec<String> {
        registry.wallets(chain).map(|w| w.public_id().to_string()).collect()
    }

    #[test]
    fn test_append_returns_position_and_hides() {
        let mut registry = WalletRegistry::new();
        assert_eq!(registry.append(Chain::Solana, keypair("a")), 0);
        assert_eq!(registry.append(Chain::Solana, keypair("b")), 1);
        assert_eq!(registry.append(Chain::Ethereum, keypair("c")), 0);

        assert_eq!(registry.len(Chain::Solana), 2);
        assert_eq!(registry.len(Chain::Ethereum), 1);
        assert_eq!(registry.visibility_flags(Chain::Solana), vec![false, false]);
        assert_eq!(registry.get(Chain::Solana, 1).unwrap().balance(), Balance::ZERO);
    }

    #[test]
    fn test_remove_shifts_later_wallets() {
        let mut registry = WalletRegistry::new();
        for id in ["a", "b", "c"] {
            registry.append(Chain::Ethereum, keypair(id));
        }
        registry.toggle_revealed(Chain::Ethereum, 2).unwrap();

        let removed = registry.remove(Chain::Ethereum, 1).unwrap();
        assert_eq!(removed.public_id(), "b");
        assert_eq!(ids(&registry, Chain::Ethereum), vec!["a", "c"]);
        assert_eq!(registry.visibility_flags(Chain::Ethereum), vec![false, true]);
    }

    #[test]
    fn test_remove_out_of_range_leaves_registry_untouched() {
        let mut registry = WalletRegistry::new();
        assert!(matches!(
            registry.remove(Chain::Solana, 0),
            Err(Error::OutOfRange { index: 0, len: 0, .. })
        ));

        registry.append(Chain::Solana, keypair("a"));
        assert!(matches!(
            registry.remove(Chain::Solana, 1),
            Err(Error::OutOfRange { index: 1, len: 1, .. })
        ));
        assert_eq!(ids(&registry, Chain::Solana), vec!["a"]);
        assert_eq!(registry.visibility_flags(Chain::Solana), vec![false]);
    }

    #[test]
    fn test_slot_ids_survive_deletes() {
        let mut registry = WalletRegistry::new();
        registry.append(Chain::Solana, keypair("a"));
        registry.append(Chain::Solana, keypair("b"));
        let b = registry.get(Chain::Solana, 1).unwrap().id();

        registry.remove(Chain::Solana, 0).unwrap();
        assert_eq!(registry.position_of(Chain::Solana, b), Some(0));

        let fresh = registry.append(Chain::Solana, keypair("c"));
        assert_ne!(registry.get(Chain::Solana, fresh).unwrap().id(), b);
    }

    #[test]
    fn test_set_balance_by_slot() {
        let mut registry = WalletRegistry::new();
        registry.append(Chain::Solana, keypair("a"));
        let a = registry.get(Chain::Solana, 0).unwrap().id();
        let balance = Balance::from_base_units(5, 0).unwrap();

        assert!(registry.set_balance(Chain::Solana, a, balance));
        assert_eq!(registry.get(Chain::Solana, 0).unwrap().balance(), balance);

        registry.remove(Chain::Solana, 0).unwrap();
        assert!(!registry.set_balance(Chain::Solana, a, balance));
    }

    #[test]
    fn test_clear_only_touches_one_chain() {
        let mut registry = WalletRegistry::new();
        registry.append(Chain::Solana, keypair("a"));
        registry.append(Chain::Ethereum, keypair("b"));

        registry.clear(Chain::Solana);
        assert!(registry.is_empty(Chain::Solana));
        assert!(registry.visibility_flags(Chain::Solana).is_empty());
        assert_eq!(registry.len(Chain::Ethereum), 1);
    }
}
