use std::fmt;

use serde::{Deserialize, Serialize};
use soul_types::{Address, SoulRef};

use crate::error::BadgeResult;

/// Sequential token handle inside one badge source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token#{}", self.0)
    }
}

/// How a source indexes its holdings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeKind {
    /// Tokens are bound to a soul `(registry, id)` and follow it through
    /// a renewal.
    Soul,
    /// Tokens are held by a wallet; an identity counts the holdings of its
    /// current owner.
    Collectible,
}

impl BadgeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Soul => "soul-badge",
            Self::Collectible => "collectible",
        }
    }
}

impl fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read capability of an external credential container.
///
/// The reputation registry holds `Arc<dyn BadgeSource>` handles and only
/// ever queries them. Implementations must not call back into a registry
/// to mutate it while answering.
pub trait BadgeSource: Send + Sync {
    fn address(&self) -> Address;

    fn name(&self) -> String;

    fn kind(&self) -> BadgeKind;

    /// Units bound to `soul`. Wallet-indexed sources report 0.
    fn balance_of_soul(&self, soul: &SoulRef) -> BadgeResult<u64>;

    /// Units held by `wallet`. Soul-indexed sources report 0.
    fn balance_of(&self, wallet: &Address) -> BadgeResult<u64>;

    /// Wallet currently in control of `token`.
    fn owner_soul_of(&self, token: TokenId) -> BadgeResult<Address>;
}
