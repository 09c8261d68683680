//! Ethereum key derivation

use ethers_core::types::Address;
use ethers_core::utils::to_checksum;
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::crypto::mnemonic::Seed;
use crate::error::{Error, Result};
use super::derivation::{Chain, ChainDeriver, DerivedKeypair, IndexPolicy};

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Derivation path for the Ethereum wallet at `index`
pub fn derivation_path(index: u32) -> String {
    format!("m/44'/60'/{}'/0'", index)
}

/// BIP-32 deriver for Ethereum keypairs along `m/44'/60'/{index}'/0'`
#[derive(Debug, Clone, Copy, Default)]
pub struct EthereumDeriver;

impl EthereumDeriver {
    /// Derive the keypair at an arbitrary BIP-32 path
    pub fn derive_path(&self, seed: &Seed, path: &str) -> Result<(String, Zeroizing<String>)> {
        let secret_key = derive_secret_key(seed.as_bytes(), path)?;

        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        let address = public_key_to_address(&public_key);
        let private_key = Zeroizing::new(format!("0x{}", hex::encode(secret_key.secret_bytes())));

        Ok((address, private_key))
    }
}

impl ChainDeriver for EthereumDeriver {
    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    fn index_policy(&self) -> IndexPolicy {
        IndexPolicy::MonotonicCounter
    }

    fn derive(&self, seed: &Seed, index: u32) -> Result<DerivedKeypair> {
        let (public_id, private_key) = self.derive_path(seed, &derivation_path(index))?;

        Ok(DerivedKeypair {
            public_id,
            private_key,
            index,
        })
    }
}

/// Walk a BIP-32 path from the master key
fn derive_secret_key(seed: &[u8], path: &str) -> Result<SecretKey> {
    let path_components = parse_derivation_path(path)?;

    let (mut secret_key, mut chain_code) = derive_master_key(seed)?;

    for component in path_components {
        (secret_key, chain_code) = derive_child_key(&secret_key, &chain_code, component)?;
    }

    SecretKey::from_slice(&secret_key[..])
        .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))
}

/// Parse a BIP-32 derivation path
fn parse_derivation_path(path: &str) -> Result<Vec<u32>> {
    if !path.starts_with("m/") {
        return Err(Error::KeyDerivation(format!("Invalid derivation path: {}", path)));
    }

    let mut result = Vec::new();

    for component in path.trim_start_matches("m/").split('/') {
        if component.is_empty() {
            continue;
        }

        let invalid = || Error::KeyDerivation(format!("Invalid derivation path component: {}", component));
        let index = match component.strip_suffix('\'') {
            Some(hardened) => {
                let index = hardened.parse::<u32>().map_err(|_| invalid())?;
                if index >= HARDENED_OFFSET {
                    return Err(invalid());
                }
                HARDENED_OFFSET + index
            }
            None => component.parse::<u32>().map_err(|_| invalid())?,
        };

        result.push(index);
    }

    Ok(result)
}

type KeyAndChainCode = (Zeroizing<[u8; 32]>, [u8; 32]);

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<KeyAndChainCode> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(seed);
    let mut result = Zeroizing::new([0u8; 64]);
    result.copy_from_slice(&hmac.finalize().into_bytes());

    let mut secret_key = Zeroizing::new([0u8; 32]);
    let mut chain_code = [0u8; 32];

    secret_key.copy_from_slice(&result[0..32]);
    chain_code.copy_from_slice(&result[32..64]);

    Ok((secret_key, chain_code))
}

/// Derive a child key from a parent key
fn derive_child_key(parent_key: &[u8; 32], parent_chain_code: &[u8; 32], index: u32) -> Result<KeyAndChainCode> {
    let secp = Secp256k1::new();
    let parent_secret_key = SecretKey::from_slice(parent_key)
        .map_err(|e| Error::KeyDerivation(format!("Invalid parent key: {}", e)))?;

    let mut data = Zeroizing::new(Vec::<u8>::with_capacity(37));

    if index >= HARDENED_OFFSET {
        data.push(0);
        data.extend_from_slice(parent_key);
    } else {
        let parent_public_key = PublicKey::from_secret_key(&secp, &parent_secret_key);
        data.extend_from_slice(&parent_public_key.serialize());
    }

    data.extend_from_slice(&index.to_be_bytes());

    let mut hmac = Hmac::<Sha512>::new_from_slice(parent_chain_code)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(&data);
    let mut result = Zeroizing::new([0u8; 64]);
    result.copy_from_slice(&hmac.finalize().into_bytes());

    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(&result[32..64]);

    // child = IL + parent (mod n); an IL outside the curve order is rejected
    let child_secret_key = SecretKey::from_slice(&result[0..32])
        .map_err(|e| Error::KeyDerivation(format!("Invalid child key: {}", e)))?
        .add_tweak(&Scalar::from(parent_secret_key))
        .map_err(|e| Error::KeyDerivation(format!("Key addition error: {}", e)))?;

    Ok((Zeroizing::new(child_secret_key.secret_bytes()), child_chain_code))
}

/// Get the EIP-55 checksummed address for a public key
fn public_key_to_address(public_key: &PublicKey) -> String {
    // skip the 0x04 prefix of the uncompressed encoding
    let key_hash = keccak256(&public_key.serialize_uncompressed()[1..]);
    let address = Address::from_slice(&key_hash[12..]);

    to_checksum(&address, None)
}

/// Calculate the Keccak-256 hash of data
fn keccak256(data: &[u8]) -> [u8; 32] {
    use sha3::{Digest, Keccak256};
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Check that a string is a `0x` prefixed 20 byte hex address
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(body) => matches!(hex::decode(body), Ok(bytes) if bytes.len() == 20),
        None => false,
    }
}
