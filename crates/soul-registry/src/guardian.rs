//! Guardian sets and the renewal vote.
//!
//! Each identity carries its own guardian set. A renewal moves an identity
//! to a new owner once a strict majority of `owner + guardians` approves a
//! live request.

use std::collections::BTreeSet;

use soul_types::{Address, CallContext, IdentityId, Timestamp};

use crate::error::{RegistryError, RegistryResult};
use crate::record::{approval_quorum, RenewalRequest, RenewalStatus};
use crate::registry::{IdentityRegistry, RegistryState};

impl RegistryState {
    fn guardian_count(&self, id: IdentityId) -> usize {
        self.guardians.get(&id).map_or(0, BTreeSet::len)
    }

    fn is_voter(&self, id: IdentityId, who: &Address) -> RegistryResult<bool> {
        let owner = self.record(id)?.owner;
        Ok(*who == owner
            || self
                .guardians
                .get(&id)
                .is_some_and(|set| set.contains(who)))
    }

    fn ensure_owner(&self, ctx: &CallContext, id: IdentityId) -> RegistryResult<Address> {
        let owner = self.record(id)?.owner;
        if owner != ctx.caller {
            return Err(RegistryError::NotOwner {
                id,
                caller: ctx.caller,
            });
        }
        Ok(owner)
    }

    fn ensure_voter(&self, ctx: &CallContext, id: IdentityId) -> RegistryResult<()> {
        if self.is_voter(id, &ctx.caller)? {
            Ok(())
        } else {
            Err(RegistryError::NotOwnerOrGuardian {
                id,
                caller: ctx.caller,
            })
        }
    }

    fn quorum(&self, id: IdentityId) -> RegistryResult<u64> {
        approval_quorum(self.guardian_count(id)).ok_or(RegistryError::InsufficientGuardians(id))
    }

    /// Approvals cast by addresses that can still vote. A guardian removed
    /// after approving no longer counts.
    fn approval_count(&self, id: IdentityId) -> RegistryResult<u64> {
        let Some(request) = self.requests.get(&id) else {
            return Ok(0);
        };
        let mut count = 0;
        for voter in &request.approvals {
            if self.is_voter(id, voter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn status(&self, id: IdentityId, now: Timestamp) -> RegistryResult<RenewalStatus> {
        self.record(id)?;
        let Some(request) = self.requests.get(&id) else {
            return Ok(RenewalStatus::NoRequest);
        };
        let quorum = self.quorum(id)?;
        if request.is_expired(now) {
            return Ok(RenewalStatus::Expired);
        }
        Ok(if self.approval_count(id)? >= quorum {
            RenewalStatus::Approved
        } else {
            RenewalStatus::Pending
        })
    }
}

impl IdentityRegistry {
    // ---- Guardian set ----

    pub fn add_guardian(
        &self,
        ctx: &CallContext,
        id: IdentityId,
        guardian: Address,
    ) -> RegistryResult<()> {
        let mut state = self.write()?;
        let owner = state.ensure_owner(ctx, id)?;
        if guardian == owner {
            return Err(RegistryError::GuardianIsOwner(id));
        }
        if !state.guardians.entry(id).or_default().insert(guardian) {
            return Err(RegistryError::GuardianExists { id, guardian });
        }
        tracing::info!(registry = %self.address(), id = %id, guardian = %guardian, "guardian added");
        Ok(())
    }

    pub fn remove_guardian(
        &self,
        ctx: &CallContext,
        id: IdentityId,
        guardian: Address,
    ) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.ensure_owner(ctx, id)?;
        let removed = state
            .guardians
            .get_mut(&id)
            .is_some_and(|set| set.remove(&guardian));
        if !removed {
            return Err(RegistryError::GuardianNotFound { id, guardian });
        }
        tracing::info!(registry = %self.address(), id = %id, guardian = %guardian, "guardian removed");
        Ok(())
    }

    pub fn guardians(&self, id: IdentityId) -> RegistryResult<Vec<Address>> {
        let state = self.read()?;
        state.record(id)?;
        Ok(state
            .guardians
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    pub fn guardian_count(&self, id: IdentityId) -> RegistryResult<usize> {
        let state = self.read()?;
        state.record(id)?;
        Ok(state.guardian_count(id))
    }

    pub fn is_guardian(&self, who: &Address, id: IdentityId) -> RegistryResult<bool> {
        let state = self.read()?;
        state.record(id)?;
        Ok(state.guardians.get(&id).is_some_and(|set| set.contains(who)))
    }

    // ---- Renewal vote ----

    /// Open a renewal request that expires `ttl` seconds from now. The
    /// requester's approval is recorded immediately. Any earlier request for
    /// the identity is discarded.
    pub fn request_renew(&self, ctx: &CallContext, id: IdentityId, ttl: u64) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.ensure_voter(ctx, id)?;
        state.quorum(id)?;

        let expiry = ctx.now.saturating_add(ttl);
        state
            .requests
            .insert(id, RenewalRequest::new(ctx.caller, expiry));
        tracing::info!(
            registry = %self.address(),
            id = %id,
            requested_by = %ctx.caller,
            expiry = %expiry,
            "renewal requested"
        );
        Ok(())
    }

    /// Set or clear the caller's approval on the open request.
    pub fn approve_renew(&self, ctx: &CallContext, id: IdentityId, approve: bool) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.ensure_voter(ctx, id)?;
        state.quorum(id)?;

        let request = state
            .requests
            .get_mut(&id)
            .ok_or(RegistryError::NoRequest(id))?;
        if request.is_expired(ctx.now) {
            return Err(RegistryError::RequestExpired {
                id,
                expiry: request.expiry,
            });
        }
        if approve {
            request.approvals.insert(ctx.caller);
        } else {
            request.approvals.remove(&ctx.caller);
        }

        let approvals = state.approval_count(id)?;
        tracing::info!(
            registry = %self.address(),
            id = %id,
            voter = %ctx.caller,
            approve,
            approvals,
            "renewal vote recorded"
        );
        Ok(())
    }

    /// Move the identity to `new_owner` under an approved, unexpired
    /// request. The id and guardian set stay with the identity; `new_owner`
    /// stops being a guardian.
    pub fn renew(&self, ctx: &CallContext, id: IdentityId, new_owner: Address) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.ensure_voter(ctx, id)?;
        let quorum = state.quorum(id)?;

        let request = state.requests.get(&id).ok_or(RegistryError::NoRequest(id))?;
        if request.is_expired(ctx.now) {
            return Err(RegistryError::RequestExpired {
                id,
                expiry: request.expiry,
            });
        }
        let approvals = state.approval_count(id)?;
        if approvals < quorum {
            return Err(RegistryError::NotApproved {
                id,
                approvals,
                quorum,
            });
        }

        let old_owner = state.record(id)?.owner;
        if new_owner != old_owner && state.by_owner.contains_key(&new_owner) {
            return Err(RegistryError::AlreadyHasIdentity(new_owner));
        }

        state.by_owner.remove(&old_owner);
        state.by_owner.insert(new_owner, id);
        if let Some(record) = state.records.get_mut(&id) {
            record.owner = new_owner;
        }
        if let Some(set) = state.guardians.get_mut(&id) {
            set.remove(&new_owner);
        }
        state.requests.remove(&id);

        tracing::info!(
            registry = %self.address(),
            id = %id,
            from = %old_owner,
            to = %new_owner,
            "identity renewed"
        );
        Ok(())
    }

    // ---- Vote queries ----

    /// Approvals needed for a renewal of `id`.
    pub fn quorum(&self, id: IdentityId) -> RegistryResult<u64> {
        let state = self.read()?;
        state.record(id)?;
        state.quorum(id)
    }

    pub fn approval_count(&self, id: IdentityId) -> RegistryResult<u64> {
        let state = self.read()?;
        state.record(id)?;
        state.approval_count(id)
    }

    /// Fails `InsufficientGuardians` when a request is open but the last
    /// guardian has since been removed.
    pub fn renewal_status(&self, id: IdentityId, now: Timestamp) -> RegistryResult<RenewalStatus> {
        self.read()?.status(id, now)
    }

    pub fn is_approved(&self, id: IdentityId, now: Timestamp) -> RegistryResult<bool> {
        Ok(self.renewal_status(id, now)? == RenewalStatus::Approved)
    }

    /// False when there is no request. Only compares the expiry, so it
    /// answers even when the guardian set is empty.
    pub fn is_expired(&self, id: IdentityId, now: Timestamp) -> RegistryResult<bool> {
        let state = self.read()?;
        state.record(id)?;
        Ok(state.requests.get(&id).is_some_and(|r| r.is_expired(now)))
    }

    pub fn renewal_request(&self, id: IdentityId) -> RegistryResult<Option<RenewalRequest>> {
        let state = self.read()?;
        state.record(id)?;
        Ok(state.requests.get(&id).cloned())
    }
}
