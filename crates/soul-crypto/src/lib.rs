//! Cryptographic primitives for the Soul registry.
//!
//! Provides domain-separated BLAKE3 hashing, Ed25519 signing/verification,
//! and the structured whitelist authorization that binds a wallet to a
//! minting permission.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod hasher;
pub mod signer;
pub mod whitelist;

pub use hasher::ContentHasher;
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
pub use whitelist::{sign_whitelist, verify_whitelist, WhitelistDomain};
