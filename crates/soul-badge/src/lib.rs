//! Badge sources for the Soul system.
//!
//! - [`SoulBadge`]: credentials bound to souls, each container with its own
//!   mint gate, per-soul cap, whitelist signer and optional claim agent
//! - [`ClaimAgent`]: delegated minter that checks soul ownership itself
//! - [`Collectible`]: ordinary wallet-held tokens
//!
//! All three answer the [`BadgeSource`] read capability the reputation
//! registry consumes.

pub mod badge;
pub mod claim;
pub mod collectible;
pub mod error;
pub mod source;

pub use badge::{SoulBadge, BADGE_BASE_SCORE, BADGE_VERSION};
pub use claim::ClaimAgent;
pub use collectible::{Collectible, MAX_MINT_BATCH};
pub use error::{BadgeError, BadgeResult};
pub use source::{BadgeKind, BadgeSource, TokenId};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use proptest::prelude::*;
    use soul_gate::{GatingError, MintConfig};
    use soul_registry::IdentityRegistry;
    use soul_types::{Address, CallContext, IdentityId, SoulRef, Timestamp};

    fn operator() -> Address {
        Address::from_raw([0xAA; 32])
    }

    fn ctx(caller: Address) -> CallContext {
        CallContext::new(caller, Timestamp(1_000))
    }

    fn registry_with_souls(n: u8) -> Arc<IdentityRegistry> {
        let souls = Arc::new(IdentityRegistry::new(Address::from_raw([0x50; 32]), operator()));
        for w in 1..=n {
            souls
                .mint_direct(&ctx(operator()), Address::from_raw([w; 32]))
                .unwrap();
        }
        souls
    }

    #[test]
    fn per_source_scenario() {
        let souls = registry_with_souls(2);
        let badge = SoulBadge::new(Address::from_raw([0x60; 32]), "Scenario", operator());
        badge.register_directory(&ctx(operator()), souls.clone()).unwrap();
        badge
            .set_mint_config(&ctx(operator()), MintConfig::open(10_000, 1))
            .unwrap();

        let token0 = SoulRef::new(souls.address(), IdentityId(0));
        let token1 = SoulRef::new(souls.address(), IdentityId(1));

        badge.owner_mint(&ctx(operator()), token0).unwrap();
        assert_eq!(badge.total_supply().unwrap(), 1);
        assert_eq!(
            badge.owner_mint(&ctx(operator()), token0),
            Err(BadgeError::Gating(GatingError::PerSourceCapReached { max: 1 }))
        );
        badge.owner_mint(&ctx(operator()), token1).unwrap();
        assert_eq!(badge.total_supply().unwrap(), 2);
    }

    #[test]
    fn badge_is_a_source() {
        let souls = registry_with_souls(1);
        let badge = Arc::new(SoulBadge::new(Address::from_raw([0x60; 32]), "Src", operator()));
        badge.register_directory(&ctx(operator()), souls.clone()).unwrap();
        badge.owner_mint(&ctx(operator()), SoulRef::new(souls.address(), IdentityId(0))).unwrap();

        let source: Arc<dyn BadgeSource> = badge;
        let soul = SoulRef::new(souls.address(), IdentityId(0));
        assert_eq!(source.kind(), BadgeKind::Soul);
        assert_eq!(source.balance_of_soul(&soul).unwrap(), 1);
        assert_eq!(source.balance_of(&Address::from_raw([1; 32])).unwrap(), 0);
        assert_eq!(source.owner_soul_of(TokenId(0)).unwrap(), Address::from_raw([1; 32]));
    }

    #[test]
    fn errors_are_classified() {
        assert!(!BadgeError::InvalidSignature.is_retryable());
        assert!(BadgeError::Gating(GatingError::MintingDisabled).is_retryable());
    }

    proptest! {
        #[test]
        fn per_soul_cap_is_never_exceeded(max in 1u64..4, attempts in 1usize..10) {
            let souls = registry_with_souls(1);
            let badge = SoulBadge::new(Address::from_raw([0x60; 32]), "Cap", operator());
            badge.register_directory(&ctx(operator()), souls.clone()).unwrap();
            badge.set_mint_config(&ctx(operator()), MintConfig::open(10_000, max)).unwrap();

            let soul = SoulRef::new(souls.address(), IdentityId(0));
            let minted = (0..attempts)
                .filter(|_| badge.owner_mint(&ctx(operator()), soul).is_ok())
                .count();
            prop_assert_eq!(minted as u64, max.min(attempts as u64));
            prop_assert_eq!(badge.balance_of_soul(&soul).unwrap(), minted as u64);
        }
    }
}
