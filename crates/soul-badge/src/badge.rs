//! The soul-indexed badge container.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use soul_crypto::{verify_whitelist, Signature, VerifyingKey, WhitelistDomain};
use soul_gate::{GateContext, GatingError, MintConfig, MintGate, MintRequest, TokenHolder};
use soul_registry::{RegistryError, SoulDirectory, DEFAULT_CHAIN_ID};
use soul_types::{AccessControl, Address, CallContext, SoulRef};

use crate::error::{BadgeError, BadgeResult};
use crate::source::{BadgeKind, BadgeSource, TokenId};

/// Score contributed by each badge a soul holds.
pub const BADGE_BASE_SCORE: u64 = 1;

/// Schema label reported by [`SoulBadge::version`].
pub const BADGE_VERSION: &str = "1.1";

/// A credential container whose tokens are bound to souls rather than
/// wallets.
///
/// Minting goes through the container's own mint gate with a per-soul
/// holding cap. Tokens are never transferred; [`SoulBadge::owner_soul_of`]
/// follows the soul to whichever wallet currently owns it.
pub struct SoulBadge {
    address: Address,
    name: String,
    domain: WhitelistDomain,
    gate: MintGate,
    inner: RwLock<BadgeState>,
}

struct BadgeState {
    access: AccessControl,
    config: MintConfig,
    signer: Option<VerifyingKey>,
    restriction: Option<Arc<dyn TokenHolder>>,
    claim_agent: Option<Address>,
    directories: HashMap<Address, Arc<dyn SoulDirectory>>,
    tokens: Vec<SoulRef>,
    balances: HashMap<SoulRef, u64>,
}

/// Which path a mint came through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MintPath {
    Owner,
    Public,
    Whitelist,
    Claim,
}

impl MintPath {
    fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Public => "public",
            Self::Whitelist => "whitelist",
            Self::Claim => "claim",
        }
    }
}

struct MintInputs {
    directory: Arc<dyn SoulDirectory>,
    config: MintConfig,
    supply: u64,
    held: u64,
    restriction: Option<Arc<dyn TokenHolder>>,
}

impl SoulBadge {
    pub fn new(address: Address, name: impl Into<String>, operator: Address) -> Self {
        Self::with_chain_id(address, name, operator, DEFAULT_CHAIN_ID)
    }

    pub fn with_chain_id(
        address: Address,
        name: impl Into<String>,
        operator: Address,
        chain_id: u64,
    ) -> Self {
        Self {
            address,
            name: name.into(),
            domain: WhitelistDomain::new(chain_id, address),
            gate: MintGate::with_default_stages(),
            inner: RwLock::new(BadgeState {
                access: AccessControl::new(operator),
                config: MintConfig::default(),
                signer: None,
                restriction: None,
                claim_agent: None,
                directories: HashMap::new(),
                tokens: Vec::new(),
                balances: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> BadgeResult<RwLockReadGuard<'_, BadgeState>> {
        self.inner.read().map_err(|_| BadgeError::LockPoisoned)
    }

    fn write(&self) -> BadgeResult<RwLockWriteGuard<'_, BadgeState>> {
        self.inner.write().map_err(|_| BadgeError::LockPoisoned)
    }

    // ---- Minting ----

    /// Administrative mint. Skips the mode rule only.
    pub fn owner_mint(&self, ctx: &CallContext, soul: SoulRef) -> BadgeResult<TokenId> {
        if let Err(e) = self.read()?.access.ensure_admin(ctx) {
            tracing::warn!(badge = %self.address, caller = %ctx.caller, "rejected owner mint from non-admin");
            return Err(e.into());
        }
        self.mint(ctx, soul, MintPath::Owner, None)
    }

    /// Mint for a soul the caller owns.
    pub fn public_mint(&self, ctx: &CallContext, soul: SoulRef) -> BadgeResult<TokenId> {
        self.mint(ctx, soul, MintPath::Public, Some(ctx.caller))
    }

    /// Mint for a soul the caller owns, authorized by a whitelist signature
    /// bound to the caller's wallet.
    pub fn whitelist_mint(
        &self,
        ctx: &CallContext,
        signature: &Signature,
        soul: SoulRef,
    ) -> BadgeResult<TokenId> {
        let inputs = self.mint_inputs(&soul)?;
        let owner = Self::soul_owner(inputs.directory.as_ref(), soul)?;
        if owner != ctx.caller {
            return Err(BadgeError::NotSoulOwner {
                soul,
                caller: ctx.caller,
            });
        }
        if !self.verify_signature(&ctx.caller, signature)? {
            return Err(BadgeError::InvalidSignature);
        }
        self.mint(ctx, soul, MintPath::Whitelist, Some(ctx.caller))
    }

    /// Mint on behalf of `claimant`. Only the linked claim agent may call
    /// this; the agent vouches that `claimant` owns `soul`.
    pub fn claim_mint(
        &self,
        ctx: &CallContext,
        soul: SoulRef,
        claimant: Address,
    ) -> BadgeResult<TokenId> {
        let agent = self.read()?.claim_agent;
        match agent {
            None => return Err(BadgeError::ClaimAgentNotSet),
            Some(agent) if agent != ctx.caller => {
                tracing::warn!(badge = %self.address, caller = %ctx.caller, "rejected claim mint from non-agent");
                return Err(BadgeError::NotClaimAgent(ctx.caller));
            }
            Some(_) => {}
        }
        self.mint(&ctx.as_caller(claimant), soul, MintPath::Claim, Some(claimant))
    }

    pub fn verify_signature(&self, wallet: &Address, signature: &Signature) -> BadgeResult<bool> {
        let signer = self.read()?.signer.clone();
        Ok(verify_whitelist(&self.domain, signer.as_ref(), wallet, signature))
    }

    fn mint_inputs(&self, soul: &SoulRef) -> BadgeResult<MintInputs> {
        let state = self.read()?;
        let directory = state
            .directories
            .get(&soul.registry)
            .cloned()
            .ok_or(BadgeError::UnknownRegistry(soul.registry))?;
        Ok(MintInputs {
            directory,
            config: state.config.clone(),
            supply: state.tokens.len() as u64,
            held: state.balances.get(soul).copied().unwrap_or(0),
            restriction: state.restriction.clone(),
        })
    }

    fn soul_owner(directory: &dyn SoulDirectory, soul: SoulRef) -> BadgeResult<Address> {
        match directory.owner_of(soul.id) {
            Ok(owner) => Ok(owner),
            Err(RegistryError::UnknownIdentity(_)) => Err(BadgeError::SourceOwnerNotFound(soul)),
            Err(e) => Err(e.into()),
        }
    }

    /// Shared mint path. `required_owner` is the wallet that must own the
    /// soul, if any; the gate sees the soul's owner as the requester.
    ///
    /// No lock is held while the directory or restriction source is
    /// queried. Supply and the per-soul cap are re-checked at commit.
    fn mint(
        &self,
        ctx: &CallContext,
        soul: SoulRef,
        path: MintPath,
        required_owner: Option<Address>,
    ) -> BadgeResult<TokenId> {
        let inputs = self.mint_inputs(&soul)?;
        let owner = Self::soul_owner(inputs.directory.as_ref(), soul)?;
        if let Some(required) = required_owner {
            if owner != required {
                return Err(BadgeError::NotSoulOwner {
                    soul,
                    caller: ctx.caller,
                });
            }
        }

        let request = match path {
            MintPath::Owner => MintRequest::privileged(owner, inputs.supply),
            _ => MintRequest::public(owner, inputs.supply),
        };
        let request = request.with_source_balance(inputs.held);
        let gate_ctx = GateContext::new(ctx.now).with_restriction(inputs.restriction.as_deref());
        self.gate.check(&inputs.config, &request, &gate_ctx)?;

        let mut state = self.write()?;
        let supply = state.tokens.len() as u64;
        if supply >= state.config.supply_cap {
            return Err(GatingError::SupplyExhausted {
                cap: state.config.supply_cap,
            }
            .into());
        }
        let max = state.config.max_per_source;
        let held = state.balances.entry(soul).or_insert(0);
        if max != 0 && *held >= max {
            return Err(GatingError::PerSourceCapReached { max }.into());
        }
        *held += 1;

        let token = TokenId(supply);
        state.tokens.push(soul);

        tracing::info!(
            badge = %self.address,
            token = %token,
            soul = %soul,
            path = path.as_str(),
            "badge minted"
        );
        Ok(token)
    }

    // ---- Administration ----

    pub fn set_mint_config(&self, ctx: &CallContext, config: MintConfig) -> BadgeResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        config.validate(state.tokens.len() as u64)?;
        tracing::info!(badge = %self.address, mode = %config.mode, supply_cap = config.supply_cap, "mint config updated");
        state.config = config;
        Ok(())
    }

    pub fn set_admin(&self, ctx: &CallContext, who: Address, is_admin: bool) -> BadgeResult<()> {
        self.write()?.access.set_admin(ctx, who, is_admin)?;
        tracing::info!(badge = %self.address, admin = %who, is_admin, "admin updated");
        Ok(())
    }

    pub fn set_signer(&self, ctx: &CallContext, signer: Option<VerifyingKey>) -> BadgeResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        state.signer = signer;
        Ok(())
    }

    pub fn set_restriction_source(
        &self,
        ctx: &CallContext,
        source: Option<Arc<dyn TokenHolder>>,
    ) -> BadgeResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        state.restriction = source;
        Ok(())
    }

    pub fn set_claim_agent(&self, ctx: &CallContext, agent: Option<Address>) -> BadgeResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        state.claim_agent = agent;
        tracing::info!(badge = %self.address, agent = ?agent, "claim agent updated");
        Ok(())
    }

    /// Accept souls issued by `directory`.
    pub fn register_directory(
        &self,
        ctx: &CallContext,
        directory: Arc<dyn SoulDirectory>,
    ) -> BadgeResult<()> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        let registry = directory.address();
        state.directories.insert(registry, directory);
        tracing::info!(badge = %self.address, registry = %registry, "identity registry registered");
        Ok(())
    }

    // ---- Queries ----

    pub fn version(&self) -> &'static str {
        BADGE_VERSION
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &WhitelistDomain {
        &self.domain
    }

    pub fn mint_config(&self) -> BadgeResult<MintConfig> {
        Ok(self.read()?.config.clone())
    }

    pub fn claim_agent(&self) -> BadgeResult<Option<Address>> {
        Ok(self.read()?.claim_agent)
    }

    pub fn total_supply(&self) -> BadgeResult<u64> {
        Ok(self.read()?.tokens.len() as u64)
    }

    pub fn balance_of_soul(&self, soul: &SoulRef) -> BadgeResult<u64> {
        Ok(self.read()?.balances.get(soul).copied().unwrap_or(0))
    }

    /// The soul `token` is bound to.
    pub fn owner_of(&self, token: TokenId) -> BadgeResult<SoulRef> {
        let state = self.read()?;
        usize::try_from(token.0)
            .ok()
            .and_then(|i| state.tokens.get(i))
            .copied()
            .ok_or(BadgeError::UnknownToken(token))
    }

    /// Wallet that currently owns the soul `token` is bound to.
    pub fn owner_soul_of(&self, token: TokenId) -> BadgeResult<Address> {
        let soul = self.owner_of(token)?;
        self.soul_owner_of(soul)
    }

    /// Current owner of `soul` according to its registered directory.
    pub fn soul_owner_of(&self, soul: SoulRef) -> BadgeResult<Address> {
        let directory = self
            .read()?
            .directories
            .get(&soul.registry)
            .cloned()
            .ok_or(BadgeError::UnknownRegistry(soul.registry))?;
        Self::soul_owner(directory.as_ref(), soul)
    }

    pub fn base_score(&self) -> u64 {
        BADGE_BASE_SCORE
    }

    pub fn score_by_soul(&self, soul: &SoulRef) -> BadgeResult<u64> {
        Ok(self.base_score().saturating_mul(self.balance_of_soul(soul)?))
    }
}

impl BadgeSource for SoulBadge {
    fn address(&self) -> Address {
        self.address
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> BadgeKind {
        BadgeKind::Soul
    }

    fn balance_of_soul(&self, soul: &SoulRef) -> BadgeResult<u64> {
        SoulBadge::balance_of_soul(self, soul)
    }

    fn balance_of(&self, _wallet: &Address) -> BadgeResult<u64> {
        Ok(0)
    }

    fn owner_soul_of(&self, token: TokenId) -> BadgeResult<Address> {
        SoulBadge::owner_soul_of(self, token)
    }
}
