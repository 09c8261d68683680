//! Mnemonic phrase generation and seed derivation

use std::fmt;

use bip39::Mnemonic as Bip39Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Entropy for a 12 word phrase (128 bits)
const ENTROPY_BYTES: usize = 16;

/// Number of words in a session phrase
pub const WORD_COUNT: usize = 12;

/// Length of a BIP-39 seed in bytes
pub const SEED_LEN: usize = 64;

/// A BIP-39 mnemonic sentence.
///
/// The phrase is wiped from memory on drop and never shows up in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: Zeroizing<String>,
}

impl Mnemonic {
    /// Generate a fresh 12 word mnemonic from OS entropy
    pub fn generate() -> Result<Self> {
        let mut entropy = Zeroizing::new([0u8; ENTROPY_BYTES]);
        OsRng.fill_bytes(&mut entropy[..]);

        let mnemonic = Bip39Mnemonic::from_entropy(&entropy[..])
            .map_err(|e| Error::Mnemonic(e.to_string()))?;

        Ok(Self {
            phrase: Zeroizing::new(mnemonic.to_string()),
        })
    }

    /// Parse and validate an existing phrase
    pub fn parse(phrase: &str) -> Result<Self> {
        let mnemonic = Bip39Mnemonic::parse_normalized(phrase)
            .map_err(|e| Error::Mnemonic(e.to_string()))?;

        Ok(Self {
            phrase: Zeroizing::new(mnemonic.to_string()),
        })
    }

    /// The phrase as a single space separated string
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The individual words, in order
    pub fn words(&self) -> Vec<&str> {
        self.phrase.split_whitespace().collect()
    }

    /// Derive the 64 byte seed with an empty passphrase.
    ///
    /// Pure: the same phrase always yields the same bytes.
    pub fn to_seed(&self) -> Result<Seed> {
        let mnemonic = Bip39Mnemonic::parse_normalized(&self.phrase)
            .map_err(|e| Error::Mnemonic(e.to_string()))?;

        Ok(Seed(Zeroizing::new(mnemonic.to_seed(""))))
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.words().len())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

/// Binary seed derived from a [`Mnemonic`]
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    /// Wrap raw seed bytes
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get the raw seed bytes
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<bool> {
    match Bip39Mnemonic::parse_normalized(phrase) {
        Ok(_) => Ok(true),
        Err(e) => Err(Error::Mnemonic(e.to_string())),
    }
}
