//! Solana key derivation
//!
//! Solana wallets are not derived along an HD path. The first 32 bytes of the
//! seed are taken as an ed25519 secret, and the wallet index is added to the
//! last byte of that buffer (wrapping at 256).

use ed25519_dalek::SigningKey;
use zeroize::Zeroizing;

use crate::crypto::mnemonic::Seed;
use crate::error::Result;
use super::derivation::{Chain, ChainDeriver, DerivedKeypair, IndexPolicy};

/// Length of an ed25519 secret seed
const SECRET_LEN: usize = 32;

/// Seed-offset deriver for Solana keypairs
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaDeriver;

impl ChainDeriver for SolanaDeriver {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    fn index_policy(&self) -> IndexPolicy {
        IndexPolicy::RegistryLength
    }

    fn derive(&self, seed: &Seed, index: u32) -> Result<DerivedKeypair> {
        let secret = offset_secret(seed, index);
        let signing_key = SigningKey::from_bytes(&secret);

        let public_id = bs58::encode(signing_key.verifying_key().to_bytes()).into_string();
        // secret seed followed by public key, as Solana keypair files store it
        let keypair_bytes = Zeroizing::new(signing_key.to_keypair_bytes());
        let private_key = Zeroizing::new(hex::encode(&keypair_bytes[..]));

        Ok(DerivedKeypair {
            public_id,
            private_key,
            index,
        })
    }
}

/// Build the ed25519 secret for `index` from the seed's first 32 bytes
fn offset_secret(seed: &Seed, index: u32) -> Zeroizing<[u8; SECRET_LEN]> {
    let mut secret = Zeroizing::new([0u8; SECRET_LEN]);
    secret.copy_from_slice(&seed.as_bytes()[..SECRET_LEN]);
    secret[SECRET_LEN - 1] = secret[SECRET_LEN - 1].wrapping_add(index as u8);
    secret
}

/// Check that a string is a base58 encoded 32 byte public key
pub fn is_valid_public_key(public_id: &str) -> bool {
    matches!(bs58::decode(public_id).into_vec(), Ok(bytes) if bytes.len() == 32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mnemonic::Mnemonic;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn seed() -> Seed {
        Mnemonic::parse(PHRASE).unwrap().to_seed().unwrap()
    }

    #[test]
    fn test_solana_key_derivation() {
        let keypair = SolanaDeriver.derive(&seed(), 0).unwrap();

        assert!(is_valid_public_key(&keypair.public_id));
        assert_eq!(keypair.private_key.len(), 128);
        assert_eq!(keypair.index, 0);
    }

    #[test]
    fn test_index_zero_uses_seed_prefix() {
        let seed = seed();
        let keypair = SolanaDeriver.derive(&seed, 0).unwrap();

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed.as_bytes()[..32]);
        assert_eq!(&keypair.private_key[..64], hex::encode(secret));

        let expected = SigningKey::from_bytes(&secret).verifying_key().to_bytes();
        assert_eq!(keypair.public_id, bs58::encode(expected).into_string());
        assert_eq!(&keypair.private_key[64..], hex::encode(expected));
    }

    #[test]
    fn test_offset_is_added_to_last_byte() {
        let seed = seed();
        let base = seed.as_bytes()[31];

        let secret = offset_secret(&seed, 3);
        assert_eq!(secret[31], base.wrapping_add(3));
        assert_eq!(&secret[..31], &seed.as_bytes()[..31]);
    }

    #[test]
    fn test_offset_wraps_at_256() {
        let mut bytes = [7u8; 64];
        bytes[31] = 0xff;
        let seed = Seed::from_bytes(bytes);

        assert_eq!(offset_secret(&seed, 1)[31], 0x00);
        assert_eq!(offset_secret(&seed, 2)[31], 0x01);

        let wrapped = SolanaDeriver.derive(&seed, 256).unwrap();
        let first = SolanaDeriver.derive(&seed, 0).unwrap();
        assert_eq!(wrapped.public_id, first.public_id);
    }

    #[test]
    fn test_distinct_indices_give_distinct_keys() {
        let seed = seed();
        let ids: Vec<String> = (0..5)
            .map(|i| SolanaDeriver.derive(&seed, i).unwrap().public_id)
            .collect();

        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_derivation_is_reproducible() {
        let a = SolanaDeriver.derive(&seed(), 2).unwrap();
        let b = SolanaDeriver.derive(&seed(), 2).unwrap();
        assert_eq!(a.public_id, b.public_id);
        assert_eq!(*a.private_key, *b.private_key);
    }
}
