use std::collections::BTreeMap;
use std::sync::Arc;

use soul_badge::{SoulBadge, TokenId};
use soul_crypto::Signature;
use soul_registry::IdentityRegistry;
use soul_reputation::{BadgeFact, ReputationRegistry};
use soul_types::{Address, CallContext, IdentityId, SoulRef, Timestamp};

use crate::config::SoulConfig;
use crate::error::{SdkError, SdkResult};

/// A wired Soul deployment: one identity registry, a reputation registry
/// over it, and the configured badge containers linked for scoring.
pub struct SoulSystem {
    operator: Address,
    identity: Arc<IdentityRegistry>,
    reputation: ReputationRegistry,
    badges: BTreeMap<String, Arc<SoulBadge>>,
}

impl SoulSystem {
    /// Deploy every component under `operator` as described by `config`.
    /// Component addresses are derived from the operator and a fixed label.
    pub fn deploy(config: &SoulConfig, operator: Address, now: Timestamp) -> SdkResult<Self> {
        config.validate()?;
        let ctx = CallContext::new(operator, now);
        let signer = config.signer_key()?;

        let identity = Arc::new(IdentityRegistry::with_chain_id(
            Address::contract(&operator, "soul/identity"),
            operator,
            config.chain_id,
        ));
        identity.set_mint_config(&ctx, config.identity.clone())?;
        identity.set_signer(&ctx, signer.clone())?;

        let reputation = ReputationRegistry::new(
            Address::contract(&operator, "soul/reputation"),
            operator,
            identity.clone(),
        )
        .with_base_score(config.base_score);

        let mut badges = BTreeMap::new();
        for preset in &config.badges {
            let label = format!("soul/badge/{}", preset.name);
            let badge = Arc::new(SoulBadge::with_chain_id(
                Address::contract(&operator, &label),
                preset.name.clone(),
                operator,
                config.chain_id,
            ));
            badge.register_directory(&ctx, identity.clone())?;
            badge.set_mint_config(&ctx, preset.mint.clone())?;
            badge.set_signer(&ctx, signer.clone())?;
            reputation.link_source(&ctx, badge.clone(), preset.weight, preset.enabled)?;
            badges.insert(preset.name.clone(), badge);
        }

        tracing::info!(
            operator = %operator,
            identity = %identity.address(),
            badges = badges.len(),
            "soul system deployed"
        );
        Ok(Self {
            operator,
            identity,
            reputation,
            badges,
        })
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    pub fn identity(&self) -> &Arc<IdentityRegistry> {
        &self.identity
    }

    pub fn reputation(&self) -> &ReputationRegistry {
        &self.reputation
    }

    pub fn badge(&self, name: &str) -> SdkResult<&Arc<SoulBadge>> {
        self.badges
            .get(name)
            .ok_or_else(|| SdkError::UnknownBadge(name.to_string()))
    }

    pub fn badge_names(&self) -> impl Iterator<Item = &str> {
        self.badges.keys().map(String::as_str)
    }

    // ---- Convenience paths ----

    /// Mint an identity for the caller through the public path.
    pub fn join(&self, ctx: &CallContext) -> SdkResult<IdentityId> {
        Ok(self.identity.mint_public(ctx)?)
    }

    /// Mint an identity for the caller with a whitelist authorization.
    pub fn join_whitelisted(&self, ctx: &CallContext, signature: &Signature) -> SdkResult<IdentityId> {
        Ok(self.identity.mint_whitelisted(ctx, signature)?)
    }

    /// Publicly mint the named badge for the caller's own identity.
    pub fn earn(&self, ctx: &CallContext, badge: &str) -> SdkResult<TokenId> {
        let badge = self.badge(badge)?;
        let id = self.identity.resolve(&ctx.caller)?;
        let soul = SoulRef::new(self.identity.address(), id);
        Ok(badge.public_mint(ctx, soul)?)
    }

    pub fn score(&self, owner: &Address) -> SdkResult<u64> {
        Ok(self.reputation.score_by_address(owner)?)
    }

    pub fn badges_of(&self, owner: &Address) -> SdkResult<Vec<BadgeFact>> {
        let id = self.identity.resolve(owner)?;
        let facts = self
            .reputation
            .describe_badges(id)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(facts)
    }
}
