use soul_gate::GatingError;
use soul_types::{AccessError, Address, ErrorClass, IdentityId, Timestamp};

/// Errors produced by identity registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Gating(#[from] GatingError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("caller {caller} does not own identity {id}")]
    NotOwner { id: IdentityId, caller: Address },

    #[error("caller {caller} is neither owner nor guardian of identity {id}")]
    NotOwnerOrGuardian { id: IdentityId, caller: Address },

    #[error("whitelist signature is not valid for this wallet")]
    InvalidSignature,

    #[error("{0} already holds an identity")]
    AlreadyHasIdentity(Address),

    #[error("{0} holds no identity")]
    NoIdentity(Address),

    #[error("identity {0} does not exist")]
    UnknownIdentity(IdentityId),

    #[error("{guardian} is already a guardian of identity {id}")]
    GuardianExists { id: IdentityId, guardian: Address },

    #[error("{guardian} is not a guardian of identity {id}")]
    GuardianNotFound { id: IdentityId, guardian: Address },

    #[error("the owner of identity {0} cannot be its guardian")]
    GuardianIsOwner(IdentityId),

    #[error("approval quorum requires at least one guardian for identity {0}")]
    InsufficientGuardians(IdentityId),

    #[error("identity {0} has no renewal request")]
    NoRequest(IdentityId),

    #[error("renewal request for identity {id} expired at {expiry}")]
    RequestExpired { id: IdentityId, expiry: Timestamp },

    #[error("renewal of identity {id} has {approvals} approvals, quorum is {quorum}")]
    NotApproved {
        id: IdentityId,
        approvals: u64,
        quorum: u64,
    },

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("registry lock poisoned")]
    LockPoisoned,
}

impl RegistryError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Gating(e) => e.class(),
            Self::Access(_)
            | Self::NotOwner { .. }
            | Self::NotOwnerOrGuardian { .. }
            | Self::InvalidSignature => ErrorClass::Authorization,
            Self::InsufficientGuardians(_)
            | Self::NoRequest(_)
            | Self::RequestExpired { .. }
            | Self::NotApproved { .. } => ErrorClass::Recovery,
            Self::AlreadyHasIdentity(_)
            | Self::NoIdentity(_)
            | Self::UnknownIdentity(_)
            | Self::GuardianExists { .. }
            | Self::GuardianNotFound { .. }
            | Self::GuardianIsOwner(_)
            | Self::UnsupportedVersion(_)
            | Self::Snapshot(_)
            | Self::LockPoisoned => ErrorClass::State,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
