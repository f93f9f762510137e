use soul_types::{ErrorClass, Timestamp};

/// Reasons a mint request is not eligible.
///
/// Every variant except [`GatingError::InvalidConfig`] and
/// [`GatingError::SourceUnavailable`] is a gating failure: the same request
/// may succeed later or under a different configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatingError {
    #[error("minting disabled")]
    MintingDisabled,

    #[error("restricted minting requires a restriction source, none is configured")]
    NoRestrictionSource,

    #[error("caller is not a holder of the restriction source")]
    NotTargetHolder,

    #[error("minting has not started (starts at {start}, now {now})")]
    NotStarted { start: Timestamp, now: Timestamp },

    #[error("minting ended (ended at {end}, now {now})")]
    Ended { end: Timestamp, now: Timestamp },

    #[error("max minting supply reached ({cap})")]
    SupplyExhausted { cap: u64 },

    #[error("per-source mint cap reached ({max})")]
    PerSourceCapReached { max: u64 },

    #[error("invalid mint configuration: {0}")]
    InvalidConfig(String),

    #[error("restriction source unavailable: {0}")]
    SourceUnavailable(String),
}

impl GatingError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidConfig(_) | Self::SourceUnavailable(_) => ErrorClass::State,
            _ => ErrorClass::Gating,
        }
    }
}
