//! Composite reputation over linked badge sources.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use soul_badge::BadgeSource;
use soul_registry::{RegistryError, SoulDirectory};
use soul_types::{AccessControl, Address, CallContext, IdentityId, SoulRef};

use crate::error::{ReputationError, ReputationResult};
use crate::link::{BadgeFact, BadgeLink, LinkInfo};

/// Default score every live identity gets before any badge is counted.
pub const BASE_SCORE: u64 = 1;

/// Scores identities of one directory by the badges they hold.
///
/// `score = base + Σ weight × balance` over enabled links. Scores are
/// recomputed on every call; nothing is cached.
pub struct ReputationRegistry {
    address: Address,
    base: u64,
    directory: Arc<dyn SoulDirectory>,
    inner: RwLock<ReputationState>,
}

struct ReputationState {
    access: AccessControl,
    links: Vec<BadgeLink>,
}

/// Lazy sequence of the badges an identity holds.
///
/// Each step queries one source. Call
/// [`ReputationRegistry::describe_badges`] again to start over.
pub struct BadgeFacts {
    links: std::vec::IntoIter<BadgeLink>,
    holder: Option<(SoulRef, Address)>,
}

impl Iterator for BadgeFacts {
    type Item = ReputationResult<BadgeFact>;

    fn next(&mut self) -> Option<Self::Item> {
        let (soul, owner) = self.holder?;
        for link in self.links.by_ref() {
            if !link.enabled {
                continue;
            }
            let balance = match link.balance(&soul, &owner) {
                Ok(balance) => balance,
                Err(e) => return Some(Err(e.into())),
            };
            if balance > 0 {
                return Some(Ok(BadgeFact {
                    index: link.index,
                    label: link.kind.label().to_string(),
                    source: link.source.name(),
                    balance,
                }));
            }
        }
        None
    }
}

impl ReputationRegistry {
    pub fn new(address: Address, operator: Address, directory: Arc<dyn SoulDirectory>) -> Self {
        Self {
            address,
            base: BASE_SCORE,
            directory,
            inner: RwLock::new(ReputationState {
                access: AccessControl::new(operator),
                links: Vec::new(),
            }),
        }
    }

    fn read(&self) -> ReputationResult<RwLockReadGuard<'_, ReputationState>> {
        self.inner.read().map_err(|_| ReputationError::LockPoisoned)
    }

    fn write(&self) -> ReputationResult<RwLockWriteGuard<'_, ReputationState>> {
        self.inner.write().map_err(|_| ReputationError::LockPoisoned)
    }

    pub fn with_base_score(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_admin(&self, ctx: &CallContext, who: Address, is_admin: bool) -> ReputationResult<()> {
        self.write()?.access.set_admin(ctx, who, is_admin)?;
        Ok(())
    }

    /// Link `source` with `weight`, or update the existing link for the
    /// same address in place. An update also swaps in the new handle and
    /// its kind; the index never changes. Returns the link's index.
    pub fn link_source(
        &self,
        ctx: &CallContext,
        source: Arc<dyn BadgeSource>,
        weight: u64,
        enabled: bool,
    ) -> ReputationResult<usize> {
        let address = source.address();
        let kind = source.kind();

        let mut state = self.write()?;
        if let Err(e) = state.access.ensure_admin(ctx) {
            tracing::warn!(reputation = %self.address, caller = %ctx.caller, "rejected link change from non-admin");
            return Err(e.into());
        }

        let index = match state.links.iter_mut().find(|l| l.address == address) {
            Some(link) => {
                link.source = source;
                link.kind = kind;
                link.weight = weight;
                link.enabled = enabled;
                link.index
            }
            None => {
                let index = state.links.len();
                state.links.push(BadgeLink {
                    index,
                    source,
                    address,
                    kind,
                    weight,
                    enabled,
                });
                index
            }
        };

        tracing::info!(
            reputation = %self.address,
            index,
            source = %address,
            weight,
            enabled,
            "badge link updated"
        );
        Ok(index)
    }

    pub fn links(&self) -> ReputationResult<Vec<LinkInfo>> {
        Ok(self.read()?.links.iter().map(BadgeLink::info).collect())
    }

    pub fn link_count(&self) -> ReputationResult<usize> {
        Ok(self.read()?.links.len())
    }

    pub fn base_score(&self) -> u64 {
        self.base
    }

    fn snapshot_links(&self) -> ReputationResult<Vec<BadgeLink>> {
        Ok(self.read()?.links.clone())
    }

    /// Current owner of `id`, or `None` if it does not exist.
    fn holder(&self, id: IdentityId) -> ReputationResult<Option<(SoulRef, Address)>> {
        match self.directory.owner_of(id) {
            Ok(owner) => Ok(Some((SoulRef::new(self.directory.address(), id), owner))),
            Err(RegistryError::UnknownIdentity(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Zero for an identity that does not exist.
    pub fn score_by_identity(&self, id: IdentityId) -> ReputationResult<u64> {
        let Some((soul, owner)) = self.holder(id)? else {
            return Ok(0);
        };

        let mut score = self.base_score();
        for link in self.snapshot_links()?.iter().filter(|l| l.enabled) {
            let balance = link.balance(&soul, &owner)?;
            score = score.saturating_add(link.weight.saturating_mul(balance));
        }
        tracing::debug!(reputation = %self.address, id = %id, score, "identity scored");
        Ok(score)
    }

    /// Zero for an address that holds no identity.
    pub fn score_by_address(&self, owner: &Address) -> ReputationResult<u64> {
        match self.directory.resolve(owner) {
            Ok(id) => self.score_by_identity(id),
            Err(RegistryError::NoIdentity(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// The enabled, non-empty links of `id` in link order.
    pub fn describe_badges(&self, id: IdentityId) -> ReputationResult<BadgeFacts> {
        let holder = self.holder(id)?;
        Ok(BadgeFacts {
            links: self.snapshot_links()?.into_iter(),
            holder,
        })
    }
}
