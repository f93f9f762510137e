//! The identity registry.
//!
//! [`IdentityRegistry`] keeps its whole state behind one `RwLock`. Every
//! mutating operation commits under a single write guard, so it takes
//! effect completely or not at all. No lock is held while the registry
//! calls out to a collaborator (the restriction source), so a collaborator
//! that calls back into the registry sees committed state only.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use soul_crypto::{verify_whitelist, Signature, VerifyingKey, WhitelistDomain};
use soul_gate::{GateContext, GatingError, MintConfig, MintGate, MintRequest, TokenHolder};
use soul_types::{AccessControl, Address, CallContext, IdentityId, Timestamp};

use crate::error::{RegistryError, RegistryResult};
use crate::record::{IdentityRecord, RenewalRequest};
use crate::snapshot::SCHEMA_VERSION;
use crate::traits::SoulDirectory;

/// Chain id used when none is configured.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// In-memory identity registry: one soul per address.
pub struct IdentityRegistry {
    address: Address,
    domain: WhitelistDomain,
    gate: MintGate,
    inner: RwLock<RegistryState>,
}

pub(crate) struct RegistryState {
    pub(crate) access: AccessControl,
    pub(crate) config: MintConfig,
    pub(crate) signer: Option<VerifyingKey>,
    pub(crate) restriction: Option<Arc<dyn TokenHolder>>,
    pub(crate) next_id: IdentityId,
    pub(crate) records: HashMap<IdentityId, IdentityRecord>,
    pub(crate) by_owner: HashMap<Address, IdentityId>,
    pub(crate) guardians: HashMap<IdentityId, BTreeSet<Address>>,
    pub(crate) requests: HashMap<IdentityId, RenewalRequest>,
}

impl RegistryState {
    pub(crate) fn new(operator: Address) -> Self {
        Self {
            access: AccessControl::new(operator),
            config: MintConfig::default(),
            signer: None,
            restriction: None,
            next_id: IdentityId(0),
            records: HashMap::new(),
            by_owner: HashMap::new(),
            guardians: HashMap::new(),
            requests: HashMap::new(),
        }
    }

    pub(crate) fn record(&self, id: IdentityId) -> RegistryResult<&IdentityRecord> {
        self.records
            .get(&id)
            .ok_or(RegistryError::UnknownIdentity(id))
    }

    pub(crate) fn supply(&self) -> u64 {
        self.records.len() as u64
    }
}

/// Inputs the gate needs, copied out so no lock is held while it runs.
struct GateInputs {
    config: MintConfig,
    supply: u64,
    restriction: Option<Arc<dyn TokenHolder>>,
}

impl IdentityRegistry {
    /// Create an empty registry deployed at `address`, operated by
    /// `operator`. Minting starts disabled.
    pub fn new(address: Address, operator: Address) -> Self {
        Self::with_chain_id(address, operator, DEFAULT_CHAIN_ID)
    }

    pub fn with_chain_id(address: Address, operator: Address, chain_id: u64) -> Self {
        Self::from_state(address, chain_id, RegistryState::new(operator))
    }

    pub(crate) fn from_state(address: Address, chain_id: u64, state: RegistryState) -> Self {
        Self {
            address,
            domain: WhitelistDomain::new(chain_id, address),
            gate: MintGate::with_default_stages(),
            inner: RwLock::new(state),
        }
    }

    pub(crate) fn read(&self) -> RegistryResult<RwLockReadGuard<'_, RegistryState>> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    pub(crate) fn write(&self) -> RegistryResult<RwLockWriteGuard<'_, RegistryState>> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    // ---- Minting ----

    /// Administrative mint. Skips the mode and window rules; the supply cap
    /// and one-identity-per-address still hold.
    pub fn mint_direct(&self, ctx: &CallContext, to: Address) -> RegistryResult<IdentityId> {
        let mut state = self.write()?;
        if let Err(e) = state.access.ensure_admin(ctx) {
            tracing::warn!(caller = %ctx.caller, "rejected direct mint from non-admin");
            return Err(e.into());
        }
        self.commit_mint(&mut state, ctx.now, to)
    }

    /// Mint for the caller through the mint gate.
    pub fn mint_public(&self, ctx: &CallContext) -> RegistryResult<IdentityId> {
        self.run_gate(ctx)?;
        let mut state = self.write()?;
        self.commit_mint(&mut state, ctx.now, ctx.caller)
    }

    /// Mint for the caller through the mint gate, authorized by an
    /// off-chain whitelist signature bound to the caller's wallet.
    pub fn mint_whitelisted(
        &self,
        ctx: &CallContext,
        signature: &Signature,
    ) -> RegistryResult<IdentityId> {
        self.run_gate(ctx)?;
        if !self.verify_signature(&ctx.caller, signature)? {
            return Err(RegistryError::InvalidSignature);
        }
        let mut state = self.write()?;
        self.commit_mint(&mut state, ctx.now, ctx.caller)
    }

    /// Whether `signature` authorizes `wallet` under the current signer.
    pub fn verify_signature(&self, wallet: &Address, signature: &Signature) -> RegistryResult<bool> {
        let signer = self.read()?.signer.clone();
        Ok(verify_whitelist(&self.domain, signer.as_ref(), wallet, signature))
    }

    fn gate_inputs(&self) -> RegistryResult<GateInputs> {
        let state = self.read()?;
        Ok(GateInputs {
            config: state.config.clone(),
            supply: state.supply(),
            restriction: state.restriction.clone(),
        })
    }

    fn run_gate(&self, ctx: &CallContext) -> RegistryResult<()> {
        let inputs = self.gate_inputs()?;
        let gate_ctx = GateContext::new(ctx.now).with_restriction(inputs.restriction.as_deref());
        let request = MintRequest::public(ctx.caller, inputs.supply);
        self.gate.check(&inputs.config, &request, &gate_ctx)?;
        Ok(())
    }

    fn commit_mint(
        &self,
        state: &mut RegistryState,
        now: Timestamp,
        to: Address,
    ) -> RegistryResult<IdentityId> {
        if state.by_owner.contains_key(&to) {
            return Err(RegistryError::AlreadyHasIdentity(to));
        }
        if state.supply() >= state.config.supply_cap {
            return Err(GatingError::SupplyExhausted {
                cap: state.config.supply_cap,
            }
            .into());
        }

        let id = state.next_id;
        state.next_id = id.next();
        state.records.insert(
            id,
            IdentityRecord {
                id,
                owner: to,
                created_at: now,
            },
        );
        state.by_owner.insert(to, id);

        tracing::info!(registry = %self.address, id = %id, owner = %to, "identity minted");
        Ok(id)
    }

    /// Destroy the caller's identity. The id is never reassigned.
    pub fn burn(&self, ctx: &CallContext, id: IdentityId) -> RegistryResult<()> {
        let mut state = self.write()?;
        let owner = state.record(id)?.owner;
        if owner != ctx.caller {
            return Err(RegistryError::NotOwner {
                id,
                caller: ctx.caller,
            });
        }
        state.records.remove(&id);
        state.by_owner.remove(&owner);
        state.guardians.remove(&id);
        state.requests.remove(&id);

        tracing::info!(registry = %self.address, id = %id, owner = %owner, "identity burned");
        Ok(())
    }

    // ---- Administration ----

    pub fn set_mint_config(&self, ctx: &CallContext, config: MintConfig) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        config.validate(state.supply())?;
        tracing::info!(
            registry = %self.address,
            mode = %config.mode,
            supply_cap = config.supply_cap,
            "mint config updated"
        );
        state.config = config;
        Ok(())
    }

    pub fn set_admin(&self, ctx: &CallContext, who: Address, is_admin: bool) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.access.set_admin(ctx, who, is_admin)?;
        tracing::info!(registry = %self.address, admin = %who, is_admin, "admin updated");
        Ok(())
    }

    /// Install (or clear) the whitelist signer.
    pub fn set_signer(&self, ctx: &CallContext, signer: Option<VerifyingKey>) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        state.signer = signer;
        tracing::info!(registry = %self.address, set = state.signer.is_some(), "whitelist signer updated");
        Ok(())
    }

    /// Install (or clear) the source consulted in restricted mode.
    pub fn set_restriction_source(
        &self,
        ctx: &CallContext,
        source: Option<Arc<dyn TokenHolder>>,
    ) -> RegistryResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        state.restriction = source;
        tracing::info!(registry = %self.address, set = state.restriction.is_some(), "restriction source updated");
        Ok(())
    }

    // ---- Queries ----

    /// Storage schema version.
    pub fn version(&self) -> u32 {
        SCHEMA_VERSION
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn domain(&self) -> &WhitelistDomain {
        &self.domain
    }

    pub fn mint_config(&self) -> RegistryResult<MintConfig> {
        Ok(self.read()?.config.clone())
    }

    /// Number of live identities.
    pub fn total_supply(&self) -> RegistryResult<u64> {
        Ok(self.read()?.supply())
    }

    /// 1 if `owner` holds an identity, otherwise 0.
    pub fn balance_of(&self, owner: &Address) -> RegistryResult<u64> {
        Ok(u64::from(self.read()?.by_owner.contains_key(owner)))
    }

    pub fn owner_of(&self, id: IdentityId) -> RegistryResult<Address> {
        Ok(self.read()?.record(id)?.owner)
    }

    pub fn resolve(&self, owner: &Address) -> RegistryResult<IdentityId> {
        self.read()?
            .by_owner
            .get(owner)
            .copied()
            .ok_or(RegistryError::NoIdentity(*owner))
    }

    pub fn identity(&self, id: IdentityId) -> RegistryResult<IdentityRecord> {
        Ok(self.read()?.record(id)?.clone())
    }

    pub fn is_admin(&self, who: &Address) -> RegistryResult<bool> {
        Ok(self.read()?.access.is_admin(who))
    }
}

impl SoulDirectory for IdentityRegistry {
    fn address(&self) -> Address {
        self.address
    }

    fn owner_of(&self, id: IdentityId) -> RegistryResult<Address> {
        IdentityRegistry::owner_of(self, id)
    }

    fn resolve(&self, owner: &Address) -> RegistryResult<IdentityId> {
        IdentityRegistry::resolve(self, owner)
    }
}

impl TokenHolder for IdentityRegistry {
    fn balance_of(&self, owner: &Address) -> Result<u64, GatingError> {
        IdentityRegistry::balance_of(self, owner)
            .map_err(|e| GatingError::SourceUnavailable(e.to_string()))
    }
}
