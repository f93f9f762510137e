use std::sync::Arc;

use serde::{Deserialize, Serialize};
use soul_badge::{BadgeKind, BadgeResult, BadgeSource};
use soul_types::{Address, SoulRef};

/// One slot of the append-only link table.
///
/// Slots are never removed or reordered; disabling a link keeps its index.
#[derive(Clone)]
pub struct BadgeLink {
    pub index: usize,
    pub source: Arc<dyn BadgeSource>,
    pub address: Address,
    pub kind: BadgeKind,
    pub weight: u64,
    pub enabled: bool,
}

impl BadgeLink {
    /// Units the identity `soul`, currently owned by `owner`, holds in this
    /// link's source.
    pub fn balance(&self, soul: &SoulRef, owner: &Address) -> BadgeResult<u64> {
        match self.kind {
            BadgeKind::Soul => self.source.balance_of_soul(soul),
            BadgeKind::Collectible => self.source.balance_of(owner),
        }
    }

    pub fn info(&self) -> LinkInfo {
        LinkInfo {
            index: self.index,
            address: self.address,
            name: self.source.name(),
            kind: self.kind,
            weight: self.weight,
            enabled: self.enabled,
        }
    }
}

impl std::fmt::Debug for BadgeLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeLink")
            .field("index", &self.index)
            .field("address", &self.address)
            .field("kind", &self.kind)
            .field("weight", &self.weight)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Read-only view of a link, without the source handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub index: usize,
    pub address: Address,
    pub name: String,
    pub kind: BadgeKind,
    pub weight: u64,
    pub enabled: bool,
}

/// One credential an identity holds, as reported by
/// `ReputationRegistry::describe_badges`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeFact {
    pub index: usize,
    /// Kind label, e.g. `"soul-badge"`.
    pub label: String,
    /// Name of the source.
    pub source: String,
    pub balance: u64,
}
