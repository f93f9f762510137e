//! Whitelist authorizations.
//!
//! An off-chain issuer signs a structured `Minter { wallet }` message under a
//! domain tuple `(name, version, chain id, verifying contract)`. A registry
//! accepts the authorization only if it verifies against the signer the
//! registry currently has configured.
//!
//! The message carries no nonce and no expiry. Replay is stopped only by the
//! registry's one-mint-per-holder rules.

use serde::{Deserialize, Serialize};
use soul_types::Address;

use crate::hasher::ContentHasher;
use crate::signer::{Signature, SigningKey, VerifyingKey};

/// Schema name shared by every Soul whitelist domain.
pub const DOMAIN_NAME: &str = "WhitelistToken";
/// Schema version shared by every Soul whitelist domain.
pub const DOMAIN_VERSION: &str = "1";
/// Type string of the signed message body.
const MINTER_TYPE: &[u8] = b"Minter(address wallet)";

/// The domain tuple a whitelist signature is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl WhitelistDomain {
    /// The standard domain for a registry deployed at `verifying_contract`.
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: DOMAIN_NAME.into(),
            version: DOMAIN_VERSION.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// Hash of the domain tuple.
    pub fn separator(&self) -> [u8; 32] {
        ContentHasher::WHITELIST_DOMAIN.hash_parts(&[
            self.name.as_bytes(),
            self.version.as_bytes(),
            &self.chain_id.to_le_bytes(),
            self.verifying_contract.as_bytes(),
        ])
    }

    /// The digest a signer signs to authorize `wallet`.
    pub fn digest(&self, wallet: &Address) -> [u8; 32] {
        let body = ContentHasher::WHITELIST_MESSAGE.hash_parts(&[MINTER_TYPE, wallet.as_bytes()]);
        ContentHasher::WHITELIST_DIGEST.hash_parts(&[&self.separator(), &body])
    }
}

/// Issue a whitelist authorization for `wallet`.
pub fn sign_whitelist(key: &SigningKey, domain: &WhitelistDomain, wallet: &Address) -> Signature {
    key.sign(&domain.digest(wallet))
}

/// Returns `true` only if `signature` authorizes `wallet` under `domain` and
/// was produced by `signer`. With no signer configured nothing verifies.
pub fn verify_whitelist(
    domain: &WhitelistDomain,
    signer: Option<&VerifyingKey>,
    wallet: &Address,
    signature: &Signature,
) -> bool {
    match signer {
        Some(signer) => signer.verify(&domain.digest(wallet), signature).is_ok(),
        None => false,
    }
}
