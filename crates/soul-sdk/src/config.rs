use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use soul_crypto::VerifyingKey;
use soul_gate::MintConfig;
use soul_registry::DEFAULT_CHAIN_ID;
use soul_reputation::BASE_SCORE;

use crate::error::{SdkError, SdkResult};
use crate::telemetry;

/// Deployment configuration of a [`SoulSystem`](crate::SoulSystem).
///
/// ```toml
/// chain_id = 1
/// base_score = 1
///
/// [identity]
/// mode = "Open"
/// supply_cap = 10000
///
/// [[badges]]
/// name = "genesis"
/// weight = 100
/// mint = { mode = "Open", max_per_source = 1 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoulConfig {
    pub chain_id: u64,
    pub base_score: u64,
    /// `tracing` filter directive applied by [`SoulConfig::init_tracing`].
    pub log_filter: String,
    pub identity: MintConfig,
    /// Hex-encoded whitelist signer key shared by the identity registry and
    /// every badge.
    pub signer: Option<String>,
    pub badges: Vec<BadgePreset>,
}

impl Default for SoulConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            base_score: BASE_SCORE,
            log_filter: "info".into(),
            identity: MintConfig::default(),
            signer: None,
            badges: Vec::new(),
        }
    }
}

/// A badge container created at startup and linked for scoring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgePreset {
    pub name: String,
    pub weight: u64,
    pub enabled: bool,
    pub mint: MintConfig,
}

impl Default for BadgePreset {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: 1,
            enabled: true,
            mint: MintConfig::default(),
        }
    }
}

impl SoulConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading soul config");
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> SdkResult<()> {
        self.identity.validate(0)?;
        self.signer_key()?;
        telemetry::parse_filter(&self.log_filter)?;

        let mut names = HashSet::new();
        for preset in &self.badges {
            if preset.name.is_empty() {
                return Err(SdkError::Config("badge preset without a name".into()));
            }
            if !names.insert(preset.name.as_str()) {
                return Err(SdkError::Config(format!("duplicate badge preset {}", preset.name)));
            }
            preset.mint.validate(0)?;
        }
        Ok(())
    }

    /// Install the global subscriber with this config's `log_filter`.
    pub fn init_tracing(&self) -> SdkResult<bool> {
        telemetry::init_tracing(&self.log_filter)
    }

    pub fn signer_key(&self) -> SdkResult<Option<VerifyingKey>> {
        Ok(self
            .signer
            .as_deref()
            .map(VerifyingKey::from_hex)
            .transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_gate::MintMode;
    use soul_types::Timestamp;

    #[test]
    fn default_config() {
        let c = SoulConfig::default();
        assert_eq!(c.chain_id, 1);
        assert_eq!(c.base_score, 1);
        assert_eq!(c.identity.mode, MintMode::Disabled);
        assert!(c.badges.is_empty());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let c = SoulConfig::from_toml_str(
            r#"
            chain_id = 5
            log_filter = "warn,soul_registry=debug"

            [identity]
            mode = "Open"
            supply_cap = 10000
            start_time = 100

            [[badges]]
            name = "genesis"
            weight = 100
            mint = { mode = "RestrictedToExternalHolder", max_per_source = 1 }

            [[badges]]
            name = "attendee"
            "#,
        )
        .unwrap();

        assert_eq!(c.chain_id, 5);
        assert_eq!(c.log_filter, "warn,soul_registry=debug");
        assert!(c.init_tracing().is_ok());
        assert_eq!(c.base_score, 1);
        assert_eq!(c.identity.mode, MintMode::Open);
        assert_eq!(c.identity.start_time, Timestamp(100));
        assert_eq!(c.badges[0].mint.max_per_source, 1);
        assert_eq!(c.badges[0].mint.supply_cap, u64::MAX);
        assert_eq!(c.badges[1].weight, 1);
        assert!(c.badges[1].enabled);
    }

    #[test]
    fn rejects_bad_config() {
        let dup = "[[badges]]\nname = \"a\"\n[[badges]]\nname = \"a\"\n";
        assert!(matches!(SoulConfig::from_toml_str(dup), Err(SdkError::Config(_))));

        let window = "[identity]\nstart_time = 10\nend_time = 5\n";
        assert!(matches!(SoulConfig::from_toml_str(window), Err(SdkError::Gating(_))));

        let filter = "log_filter = \"soul_registry=notalevel\"\n";
        assert!(matches!(SoulConfig::from_toml_str(filter), Err(SdkError::Telemetry(_))));

        let signer = "signer = \"nothex\"\n";
        assert!(matches!(SoulConfig::from_toml_str(signer), Err(SdkError::Signer(_))));

        assert!(matches!(SoulConfig::from_toml_str("chain_id = \"x\""), Err(SdkError::Config(_))));
    }
}
