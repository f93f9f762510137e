use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Dense integer handle of a soul inside one identity registry.
///
/// Ids are assigned in mint order starting at 0 and are never reassigned,
/// even after the soul is burned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityId(pub u64);

impl IdentityId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityId({})", self.0)
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for IdentityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A soul named by the registry that issued it and its id there.
///
/// Badge containers bind credentials to a `SoulRef` rather than to a wallet,
/// so a credential follows the soul through a recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoulRef {
    pub registry: Address,
    pub id: IdentityId,
}

impl SoulRef {
    pub fn new(registry: Address, id: IdentityId) -> Self {
        Self { registry, id }
    }
}

impl fmt::Display for SoulRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.registry, self.id)
    }
}
