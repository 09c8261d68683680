//! Read-only views handed to the presentation layer

use serde::Serialize;

use crate::account::{mask_private_key, SecretVisibilityController, WalletRegistry};
use crate::crypto::keys::Chain;
use crate::crypto::mnemonic::Mnemonic;

/// The mnemonic as it should be displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MnemonicView {
    pub words: Vec<String>,
    pub revealed: bool,
}

/// One wallet as it should be displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletView {
    /// "Wallet N", numbered from the current position
    pub label: String,
    pub chain: Chain,
    pub public_id: String,
    /// Private key, or a mask when hidden
    pub private_key: String,
    pub revealed: bool,
    /// Balance with the native unit, e.g. "1.5 SOL"
    pub balance: String,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub mnemonic: Option<MnemonicView>,
    pub solana: Vec<WalletView>,
    pub ethereum: Vec<WalletView>,
}

impl SessionSnapshot {
    pub(crate) fn capture(
        mnemonic: Option<&Mnemonic>,
        registry: &WalletRegistry,
        visibility: &SecretVisibilityController,
    ) -> Self {
        let mnemonic = mnemonic.map(|mnemonic| MnemonicView {
            words: visibility.mnemonic_words(&mnemonic.words()),
            revealed: visibility.is_mnemonic_revealed(),
        });

        Self {
            mnemonic,
            solana: wallet_views(registry, Chain::Solana),
            ethereum: wallet_views(registry, Chain::Ethereum),
        }
    }

    /// Wallet views of one chain
    pub fn wallets(&self, chain: Chain) -> &[WalletView] {
        match chain {
            Chain::Solana => &self.solana,
            Chain::Ethereum => &self.ethereum,
        }
    }
}

fn wallet_views(registry: &WalletRegistry, chain: Chain) -> Vec<WalletView> {
    registry
        .wallets(chain)
        .zip(registry.visibility_flags(chain))
        .enumerate()
        .map(|(position, (wallet, revealed))| WalletView {
            label: format!("Wallet {}", position + 1),
            chain,
            public_id: wallet.public_id().to_string(),
            private_key: mask_private_key(wallet.private_key(), revealed),
            revealed,
            balance: format!("{} {}", wallet.balance(), chain.symbol()),
        })
        .collect()
}
