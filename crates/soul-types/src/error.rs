use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failure taxonomy shared by every Soul component.
///
/// - `Gating`: the request may succeed later or under another configuration.
/// - `Authorization`: wrong caller or bad signature; never retried.
/// - `State`: the caller asked for something the current state forbids.
/// - `Recovery`: the social-recovery vote is not (or no longer) in a state
///   that allows the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    Gating,
    Authorization,
    State,
    Recovery,
}

impl ErrorClass {
    /// Whether the caller can reasonably try the same call again later.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Gating | Self::Recovery)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Gating => "gating",
            Self::Authorization => "authorization",
            Self::State => "state",
            Self::Recovery => "recovery",
        };
        f.write_str(label)
    }
}

/// Errors from the central access-control check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("caller {caller} is not the operator")]
    NotOperator { caller: Address },

    #[error("caller {caller} is not an admin")]
    NotAdmin { caller: Address },
}

impl AccessError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Authorization
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gating_and_recovery_are_retryable() {
        assert!(ErrorClass::Gating.is_retryable());
        assert!(ErrorClass::Recovery.is_retryable());
        assert!(!ErrorClass::Authorization.is_retryable());
        assert!(!ErrorClass::State.is_retryable());
    }

    #[test]
    fn display_labels() {
        assert_eq!(ErrorClass::Authorization.to_string(), "authorization");
    }
}
