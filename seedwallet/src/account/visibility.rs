//! Show/hide state for secret material
//!
//! Everything starts hidden. A secret is only rendered in clear after an
//! explicit toggle of that exact item.

use serde::Serialize;

use crate::crypto::keys::Chain;
use crate::error::Result;
use super::registry::WalletRegistry;

/// Placeholder for one hidden mnemonic word
pub const MASKED_WORD: &str = "••••";

/// Placeholder for a hidden private key
pub const MASKED_KEY: &str = "••••••••••••••••••••••••";

/// What a visibility toggle applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibilityTarget {
    Mnemonic,
    Wallet { chain: Chain, index: usize },
}

/// Reveal state for the mnemonic; wallet flags live in the registry
#[derive(Debug, Default, Clone)]
pub struct SecretVisibilityController {
    mnemonic_revealed: bool,
}

impl SecretVisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mnemonic_revealed(&self) -> bool {
        self.mnemonic_revealed
    }

    /// Flip the mnemonic flag and return the new value
    pub fn toggle_mnemonic(&mut self) -> bool {
        self.mnemonic_revealed = !self.mnemonic_revealed;
        self.mnemonic_revealed
    }

    /// Flip the flag of one wallet and return the new value
    pub fn toggle_wallet(&mut self, registry: &mut WalletRegistry, chain: Chain, index: usize) -> Result<bool> {
        registry.toggle_revealed(chain, index)
    }

    /// Hide the mnemonic again
    pub fn reset(&mut self) {
        self.mnemonic_revealed = false;
    }

    /// Mnemonic words as they should be displayed, one cell per word
    pub fn mnemonic_words(&self, words: &[&str]) -> Vec<String> {
        if self.mnemonic_revealed {
            words.iter().map(|word| word.to_string()).collect()
        } else {
            vec![MASKED_WORD.to_string(); words.len()]
        }
    }
}

/// A private key as it should be displayed
pub fn mask_private_key(private_key: &str, revealed: bool) -> String {
    if revealed {
        private_key.to_string()
    } else {
        MASKED_KEY.to_string()
    }
}
