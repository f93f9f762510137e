//! High-level SDK for the Soul system.
//!
//! Wires an identity registry, badge containers and a reputation registry
//! together from one [`SoulConfig`], and sets up `tracing` output.
//!
//! ```rust
//! use soul_sdk::{Address, CallContext, SoulConfig, SoulSystem, Timestamp};
//!
//! let config = SoulConfig::from_toml_str(r#"
//!     [identity]
//!     mode = "Open"
//!     supply_cap = 100
//! "#).unwrap();
//! let operator = Address::from_raw([0xAA; 32]);
//! let system = SoulSystem::deploy(&config, operator, Timestamp(1)).unwrap();
//!
//! let alice = Address::from_raw([1; 32]);
//! system.join(&CallContext::new(alice, Timestamp(2))).unwrap();
//! assert_eq!(system.score(&alice).unwrap(), 1);
//! ```

pub mod config;
pub mod error;
pub mod system;
pub mod telemetry;

pub use config::{BadgePreset, SoulConfig};
pub use error::{SdkError, SdkResult};
pub use system::SoulSystem;
pub use telemetry::init_tracing;

// Re-export the component crates' key types
pub use soul_badge::{BadgeKind, BadgeSource, ClaimAgent, Collectible, SoulBadge, TokenId};
pub use soul_gate::{MintConfig, MintMode};
pub use soul_registry::{IdentityRegistry, RenewalStatus, SoulDirectory};
pub use soul_reputation::{BadgeFact, ReputationRegistry};
pub use soul_types::{Address, CallContext, IdentityId, SoulRef, Timestamp};

#[cfg(test)]
mod tests {
    use super::*;
    use soul_crypto::{sign_whitelist, SigningKey};

    const CONFIG: &str = r#"
        chain_id = 7
        log_filter = "debug"

        [identity]
        mode = "Open"
        supply_cap = 10000

        [[badges]]
        name = "genesis"
        weight = 100
        mint = { mode = "Open", supply_cap = 10000, max_per_source = 1 }

        [[badges]]
        name = "helper"
        weight = 3
        mint = { mode = "Open", max_per_source = 1 }
    "#;

    fn operator() -> Address {
        Address::from_raw([0xAA; 32])
    }

    fn wallet(seed: u8) -> Address {
        Address::from_raw([seed; 32])
    }

    fn at(caller: Address, now: u64) -> CallContext {
        CallContext::new(caller, Timestamp(now))
    }

    fn system() -> SoulSystem {
        let config = SoulConfig::from_toml_str(CONFIG).unwrap();
        SoulSystem::deploy(&config, operator(), Timestamp(1)).unwrap()
    }

    #[test]
    fn deploy_links_presets() {
        let sys = system();
        assert_eq!(sys.badge_names().collect::<Vec<_>>(), vec!["genesis", "helper"]);
        assert_eq!(sys.reputation().link_count().unwrap(), 2);
        assert_eq!(sys.identity().domain().chain_id, 7);
        assert!(matches!(sys.badge("nope"), Err(SdkError::UnknownBadge(_))));
    }

    #[test]
    fn score_grows_with_badges() {
        let sys = system();
        let alice = wallet(1);
        assert_eq!(sys.score(&alice).unwrap(), 0);

        sys.join(&at(alice, 2)).unwrap();
        assert_eq!(sys.score(&alice).unwrap(), 1);

        sys.earn(&at(alice, 3), "genesis").unwrap();
        assert_eq!(sys.score(&alice).unwrap(), 101);
        sys.earn(&at(alice, 3), "helper").unwrap();
        assert_eq!(sys.score(&alice).unwrap(), 104);

        assert!(matches!(
            sys.earn(&at(alice, 4), "genesis"),
            Err(SdkError::Badge(_))
        ));

        let facts = sys.badges_of(&alice).unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].source, "genesis");
    }

    #[test]
    fn score_survives_recovery() {
        let sys = system();
        let (alice, guardian, fresh) = (wallet(1), wallet(2), wallet(3));
        let id = sys.join(&at(alice, 2)).unwrap();
        sys.earn(&at(alice, 2), "genesis").unwrap();

        let reg = sys.identity();
        reg.add_guardian(&at(alice, 3), id, guardian).unwrap();
        reg.request_renew(&at(guardian, 4), id, 600).unwrap();
        reg.approve_renew(&at(alice, 5), id, true).unwrap();
        reg.renew(&at(guardian, 6), id, fresh).unwrap();

        assert_eq!(sys.score(&alice).unwrap(), 0);
        assert_eq!(sys.score(&fresh).unwrap(), 101);
    }

    #[test]
    fn whitelisted_join_with_configured_signer() {
        let issuer = SigningKey::from_bytes([4; 32]);
        let mut config = SoulConfig::from_toml_str(CONFIG).unwrap();
        config.signer = Some(issuer.verifying_key().to_hex());
        let sys = SoulSystem::deploy(&config, operator(), Timestamp(1)).unwrap();

        let sig = sign_whitelist(&issuer, sys.identity().domain(), &wallet(1));
        assert!(sys.join_whitelisted(&at(wallet(1), 2), &sig).is_ok());
        assert!(matches!(
            sys.join_whitelisted(&at(wallet(2), 2), &sig),
            Err(SdkError::Registry(_))
        ));
    }
}
