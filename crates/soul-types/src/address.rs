use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Material used to derive an [`Address`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressMaterial {
    /// An externally owned account identified by its ed25519 public key.
    PublicKey([u8; 32]),
    /// A registry or badge container deployed under a label.
    Contract { deployer: [u8; 32], label: String },
    /// Raw seed bytes (fixtures and demos).
    Seed([u8; 32]),
}

/// A 32-byte account or registry address.
///
/// Wallets, identity registries, badge containers, and claim agents are all
/// named by an `Address`. Addresses are derived deterministically from
/// [`AddressMaterial`] with BLAKE3, so the same material always yields the
/// same address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    hash: [u8; 32],
}

impl Address {
    /// Derive an address from address material.
    pub fn derive(material: &AddressMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"soul-address-v1:");
        match material {
            AddressMaterial::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
            AddressMaterial::Contract { deployer, label } => {
                hasher.update(b"contract:");
                hasher.update(deployer);
                hasher.update(b":");
                hasher.update(label.as_bytes());
            }
            AddressMaterial::Seed(seed) => {
                hasher.update(b"seed:");
                hasher.update(seed);
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Address of a contract-like component deployed by `deployer`.
    pub fn contract(deployer: &Address, label: &str) -> Self {
        Self::derive(&AddressMaterial::Contract {
            deployer: deployer.hash,
            label: label.to_string(),
        })
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("0s{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `0s` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("0s").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }

    /// Create from a raw 32-byte hash. Use `derive()` for production code.
    pub const fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short_id())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let material = AddressMaterial::Seed([42u8; 32]);
        assert_eq!(Address::derive(&material), Address::derive(&material));
    }

    #[test]
    fn material_kinds_do_not_collide() {
        let bytes = [7u8; 32];
        let seed = Address::derive(&AddressMaterial::Seed(bytes));
        let pubkey = Address::derive(&AddressMaterial::PublicKey(bytes));
        assert_ne!(seed, pubkey);
    }

    #[test]
    fn contract_address_depends_on_label() {
        let deployer = Address::from_raw([5u8; 32]);
        let a = Address::contract(&deployer, "soul-registry");
        let b = Address::contract(&deployer, "soul-badge");
        assert_ne!(a, b);
        assert_eq!(a, Address::contract(&deployer, "soul-registry"));
    }

    #[test]
    fn short_id_format() {
        let short = Address::from_raw([0; 32]).short_id();
        assert!(short.starts_with("0s"));
        assert_eq!(short.len(), 10);
    }

    #[test]
    fn hex_parse_accepts_prefix() {
        let addr = Address::derive(&AddressMaterial::Seed([99; 32]));
        let prefixed = format!("0s{}", addr.to_hex());
        assert_eq!(Address::from_hex(&prefixed).unwrap(), addr);
        assert_eq!(Address::from_hex(&addr.to_hex()).unwrap(), addr);
    }

    #[test]
    fn hex_parse_rejects_short_input() {
        let err = Address::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }
}
