use soul_gate::GatingError;
use soul_registry::RegistryError;
use soul_types::{AccessError, Address, ErrorClass, SoulRef};

use crate::source::TokenId;

/// Errors produced by badge containers and their helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BadgeError {
    #[error(transparent)]
    Gating(#[from] GatingError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("no identity registry is registered at {0}")]
    UnknownRegistry(Address),

    #[error("soul {0} has no owner")]
    SourceOwnerNotFound(SoulRef),

    #[error("caller {caller} does not own soul {soul}")]
    NotSoulOwner { soul: SoulRef, caller: Address },

    #[error("whitelist signature is not valid for this wallet")]
    InvalidSignature,

    #[error("no claim agent is linked")]
    ClaimAgentNotSet,

    #[error("caller {0} is not the claim agent")]
    NotClaimAgent(Address),

    #[error("claim agent has no target badge")]
    ClaimTargetNotSet,

    #[error("token {0} does not exist")]
    UnknownToken(TokenId),

    #[error("mint quantity {quantity} is outside 1..={max}")]
    InvalidQuantity { quantity: u64, max: u64 },

    #[error("badge lock poisoned")]
    LockPoisoned,
}

impl BadgeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Gating(e) => e.class(),
            Self::Registry(e) => e.class(),
            Self::Access(_)
            | Self::NotSoulOwner { .. }
            | Self::InvalidSignature
            | Self::NotClaimAgent(_) => ErrorClass::Authorization,
            Self::UnknownRegistry(_)
            | Self::SourceOwnerNotFound(_)
            | Self::ClaimAgentNotSet
            | Self::ClaimTargetNotSet
            | Self::UnknownToken(_)
            | Self::InvalidQuantity { .. }
            | Self::LockPoisoned => ErrorClass::State,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}

pub type BadgeResult<T> = Result<T, BadgeError>;
