//! Badge-weighted reputation for Soul identities.
//!
//! A [`ReputationRegistry`] keeps an append-only table of badge links over
//! one identity directory and scores identities on demand:
//!
//! ```text
//! score(id) = base + Σ weight_i × balance_i(id)   over enabled links
//! ```

pub mod error;
pub mod link;
pub mod registry;

pub use error::{ReputationError, ReputationResult};
pub use link::{BadgeFact, BadgeLink, LinkInfo};
pub use registry::{BadgeFacts, ReputationRegistry, BASE_SCORE};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use proptest::prelude::*;
    use soul_badge::SoulBadge;
    use soul_gate::MintConfig;
    use soul_registry::IdentityRegistry;
    use soul_types::{Address, CallContext, IdentityId, SoulRef, Timestamp};

    fn operator() -> Address {
        Address::from_raw([0xAA; 32])
    }

    fn op() -> CallContext {
        CallContext::new(operator(), Timestamp(1))
    }

    proptest! {
        #[test]
        fn score_is_base_plus_weighted_balances(
            links in proptest::collection::vec((0u64..1_000, 0u64..4, any::<bool>()), 0..6)
        ) {
            let souls = Arc::new(IdentityRegistry::new(Address::from_raw([0x50; 32]), operator()));
            souls.mint_direct(&op(), Address::from_raw([1; 32])).unwrap();
            let soul = SoulRef::new(souls.address(), IdentityId(0));
            let rep = ReputationRegistry::new(Address::from_raw([0x40; 32]), operator(), souls.clone());

            let mut expected = BASE_SCORE;
            for (i, (weight, balance, enabled)) in links.iter().enumerate() {
                let badge = Arc::new(SoulBadge::new(
                    Address::from_raw([0x60 + i as u8; 32]),
                    format!("b{i}"),
                    operator(),
                ));
                badge.register_directory(&op(), souls.clone()).unwrap();
                badge.set_mint_config(&op(), MintConfig::default()).unwrap();
                for _ in 0..*balance {
                    badge.owner_mint(&op(), soul).unwrap();
                }
                rep.link_source(&op(), badge, *weight, *enabled).unwrap();
                if *enabled {
                    expected += weight * balance;
                }
            }

            prop_assert_eq!(rep.score_by_identity(IdentityId(0)).unwrap(), expected);
            let facts = rep.describe_badges(IdentityId(0)).unwrap().count();
            let nonzero = links.iter().filter(|(_, b, e)| *e && *b > 0).count();
            prop_assert_eq!(facts, nonzero);
        }
    }

    #[test]
    fn disabling_one_link_leaves_others() {
        let souls = Arc::new(IdentityRegistry::new(Address::from_raw([0x50; 32]), operator()));
        souls.mint_direct(&op(), Address::from_raw([1; 32])).unwrap();
        let soul = SoulRef::new(souls.address(), IdentityId(0));
        let rep = ReputationRegistry::new(Address::from_raw([0x40; 32]), operator(), souls.clone());

        let mut badges = Vec::new();
        for (i, weight) in [10u64, 20, 30].into_iter().enumerate() {
            let badge = Arc::new(SoulBadge::new(Address::from_raw([0x60 + i as u8; 32]), "b", operator()));
            badge.register_directory(&op(), souls.clone()).unwrap();
            badge.owner_mint(&op(), soul).unwrap();
            rep.link_source(&op(), badge.clone(), weight, true).unwrap();
            badges.push(badge);
        }
        assert_eq!(rep.score_by_identity(IdentityId(0)).unwrap(), 61);

        rep.link_source(&op(), badges[1].clone(), 20, false).unwrap();
        assert_eq!(rep.score_by_identity(IdentityId(0)).unwrap(), 41);
        let indexes: Vec<_> = rep.links().unwrap().iter().map(|l| l.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }
}
