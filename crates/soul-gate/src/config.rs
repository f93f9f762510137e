use std::fmt;

use serde::{Deserialize, Serialize};
use soul_types::Timestamp;

use crate::error::GatingError;

/// Who may mint through the public paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MintMode {
    /// Only privileged minters.
    #[default]
    Disabled,
    /// Anyone.
    Open,
    /// Only holders of at least one unit of the configured restriction source.
    RestrictedToExternalHolder,
}

impl fmt::Display for MintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Disabled => "disabled",
            Self::Open => "open",
            Self::RestrictedToExternalHolder => "restricted",
        };
        f.write_str(label)
    }
}

/// Gating policy of one registry. Missing fields deserialize to their
/// defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    pub mode: MintMode,
    /// Maximum number of live tokens.
    pub supply_cap: u64,
    /// Zero means "no start bound".
    pub start_time: Timestamp,
    /// Zero means "no end bound".
    pub end_time: Timestamp,
    /// Maximum tokens one source may hold. Zero means no per-source cap.
    pub max_per_source: u64,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            mode: MintMode::Disabled,
            supply_cap: u64::MAX,
            start_time: Timestamp::ZERO,
            end_time: Timestamp::ZERO,
            max_per_source: 0,
        }
    }
}

impl MintConfig {
    /// Open minting with no window and the given cap and per-source limit.
    pub fn open(supply_cap: u64, max_per_source: u64) -> Self {
        Self {
            mode: MintMode::Open,
            supply_cap,
            max_per_source,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: MintMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_window(mut self, start_time: Timestamp, end_time: Timestamp) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Check the invariants a config must satisfy before it is installed.
    pub fn validate(&self, current_supply: u64) -> Result<(), GatingError> {
        if !self.start_time.is_zero()
            && !self.end_time.is_zero()
            && self.start_time > self.end_time
        {
            return Err(GatingError::InvalidConfig(format!(
                "start time {} is after end time {}",
                self.start_time, self.end_time
            )));
        }
        if self.supply_cap < current_supply {
            return Err(GatingError::InvalidConfig(format!(
                "supply cap {} is below current supply {current_supply}",
                self.supply_cap
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disabled_and_unbounded() {
        let c = MintConfig::default();
        assert_eq!(c.mode, MintMode::Disabled);
        assert_eq!(c.supply_cap, u64::MAX);
        assert!(c.start_time.is_zero() && c.end_time.is_zero());
        assert_eq!(c.max_per_source, 0);
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let c = MintConfig::open(10, 1).with_window(Timestamp(50), Timestamp(10));
        assert!(matches!(c.validate(0), Err(GatingError::InvalidConfig(_))));
    }

    #[test]
    fn validate_allows_open_ended_window() {
        let c = MintConfig::open(10, 1).with_window(Timestamp(50), Timestamp::ZERO);
        assert!(c.validate(0).is_ok());
    }

    #[test]
    fn validate_rejects_cap_below_supply() {
        let c = MintConfig::open(1, 1);
        assert!(c.validate(1).is_ok());
        assert!(matches!(c.validate(2), Err(GatingError::InvalidConfig(_))));
    }

    #[test]
    fn serde_roundtrip() {
        let c = MintConfig::open(10_000, 1);
        let json = serde_json::to_string(&c).unwrap();
        let parsed: MintConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, parsed);
    }
}
