/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag (e.g., `"soul-whitelist-domain-v1"`)
/// that is prepended to every hash computation, so the same bytes hashed
/// under two domains never produce the same digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for whitelist domain separators.
    pub const WHITELIST_DOMAIN: Self = Self {
        domain: "soul-whitelist-domain-v1",
    };
    /// Hasher for whitelist message bodies.
    pub const WHITELIST_MESSAGE: Self = Self {
        domain: "soul-whitelist-message-v1",
    };
    /// Hasher for the final signed whitelist digest.
    pub const WHITELIST_DIGEST: Self = Self {
        domain: "soul-whitelist-digest-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        self.hash_parts(&[data])
    }

    /// Hash a sequence of fields. Each field is length-prefixed so that
    /// `["ab", "c"]` and `["a", "bc"]` hash differently.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }
}
