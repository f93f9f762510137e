use soul_badge::BadgeError;
use soul_registry::RegistryError;
use soul_types::{AccessError, ErrorClass};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReputationError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Badge(#[from] BadgeError),

    #[error("reputation lock poisoned")]
    LockPoisoned,
}

impl ReputationError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Access(_) => ErrorClass::Authorization,
            Self::Registry(e) => e.class(),
            Self::Badge(e) => e.class(),
            Self::LockPoisoned => ErrorClass::State,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}

pub type ReputationResult<T> = Result<T, ReputationError>;
