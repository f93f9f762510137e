use std::sync::{Arc, RwLock};

use soul_types::{AccessControl, Address, CallContext, SoulRef};

use crate::badge::SoulBadge;
use crate::error::{BadgeError, BadgeResult};
use crate::source::TokenId;

/// Delegated minter for a [`SoulBadge`].
///
/// The agent checks that its caller owns the soul being claimed, then mints
/// through the badge's claim path under its own address. The badge trusts
/// the agent to have done that check.
pub struct ClaimAgent {
    address: Address,
    inner: RwLock<AgentState>,
}

struct AgentState {
    access: AccessControl,
    target: Option<Arc<SoulBadge>>,
}

impl ClaimAgent {
    pub fn new(address: Address, operator: Address) -> Self {
        Self {
            address,
            inner: RwLock::new(AgentState {
                access: AccessControl::new(operator),
                target: None,
            }),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_target(&self, ctx: &CallContext, target: Arc<SoulBadge>) -> BadgeResult<()> {
        let mut state = self.inner.write().map_err(|_| BadgeError::LockPoisoned)?;
        state.access.ensure_admin(ctx)?;
        tracing::info!(agent = %self.address, badge = %target.address(), "claim target set");
        state.target = Some(target);
        Ok(())
    }

    /// Claim a badge for `soul`, which the caller must own.
    pub fn claim(&self, ctx: &CallContext, soul: SoulRef) -> BadgeResult<TokenId> {
        let target = self
            .inner
            .read()
            .map_err(|_| BadgeError::LockPoisoned)?
            .target
            .clone()
            .ok_or(BadgeError::ClaimTargetNotSet)?;

        if target.soul_owner_of(soul)? != ctx.caller {
            return Err(BadgeError::NotSoulOwner {
                soul,
                caller: ctx.caller,
            });
        }
        target.claim_mint(&ctx.as_caller(self.address), soul, ctx.caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_gate::MintConfig;
    use soul_registry::IdentityRegistry;
    use soul_types::{IdentityId, Timestamp};

    fn wallet(seed: u8) -> Address {
        Address::from_raw([seed; 32])
    }

    fn ctx(caller: Address) -> CallContext {
        CallContext::new(caller, Timestamp(10))
    }

    #[test]
    fn claim_flow() {
        let op = wallet(0xAA);
        let souls = Arc::new(IdentityRegistry::new(wallet(0x50), op));
        for w in 1..=3 {
            souls.mint_direct(&ctx(op), wallet(w)).unwrap();
        }
        let badge = Arc::new(SoulBadge::new(wallet(0x60), "Claimable", op));
        badge.register_directory(&ctx(op), souls.clone()).unwrap();
        badge.set_mint_config(&ctx(op), MintConfig::open(10_000, 1)).unwrap();

        let agent = ClaimAgent::new(wallet(0x61), op);
        let soul = |id| SoulRef::new(souls.address(), IdentityId(id));
        assert_eq!(
            agent.claim(&ctx(wallet(1)), soul(0)),
            Err(BadgeError::ClaimTargetNotSet)
        );

        agent.set_target(&ctx(op), badge.clone()).unwrap();
        assert_eq!(
            agent.claim(&ctx(wallet(1)), soul(0)),
            Err(BadgeError::ClaimAgentNotSet)
        );

        badge
            .set_claim_agent(&ctx(op), Some(agent.address()))
            .unwrap();
        assert!(matches!(
            agent.claim(&ctx(wallet(2)), soul(0)),
            Err(BadgeError::NotSoulOwner { .. })
        ));
        assert_eq!(badge.total_supply().unwrap(), 0);

        for w in 1..=3u8 {
            agent.claim(&ctx(wallet(w)), soul(u64::from(w) - 1)).unwrap();
        }
        assert_eq!(badge.total_supply().unwrap(), 3);
        assert_eq!(
            agent.claim(&ctx(wallet(1)), soul(0)),
            Err(BadgeError::Gating(soul_gate::GatingError::PerSourceCapReached { max: 1 }))
        );
    }
}
