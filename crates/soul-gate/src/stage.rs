use soul_types::{Address, Timestamp};

use crate::config::MintConfig;
use crate::error::GatingError;

// ---------------------------------------------------------------------------
// TokenHolder
// ---------------------------------------------------------------------------

/// Anything that can report how many units a wallet holds.
///
/// Used as the restriction source of `RestrictedToExternalHolder` mode.
/// A source that cannot answer returns [`GatingError::SourceUnavailable`].
pub trait TokenHolder: Send + Sync {
    fn balance_of(&self, owner: &Address) -> Result<u64, GatingError>;
}

// ---------------------------------------------------------------------------
// MintRequest
// ---------------------------------------------------------------------------

/// A single request to mint, as seen by the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintRequest {
    /// The wallet on whose behalf the mint happens.
    pub requester: Address,
    /// Administrative mints skip the mode check.
    pub privileged: bool,
    /// Live supply before this mint.
    pub current_supply: u64,
    /// Units the receiving source already holds, if the registry tracks a
    /// per-source dimension.
    pub source_balance: Option<u64>,
}

impl MintRequest {
    pub fn public(requester: Address, current_supply: u64) -> Self {
        Self {
            requester,
            privileged: false,
            current_supply,
            source_balance: None,
        }
    }

    pub fn privileged(requester: Address, current_supply: u64) -> Self {
        Self {
            privileged: true,
            ..Self::public(requester, current_supply)
        }
    }

    pub fn with_source_balance(mut self, balance: u64) -> Self {
        self.source_balance = Some(balance);
        self
    }
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// Environment available to every stage.
pub struct GateContext<'a> {
    pub now: Timestamp,
    pub restriction: Option<&'a dyn TokenHolder>,
}

impl<'a> GateContext<'a> {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now,
            restriction: None,
        }
    }

    pub fn with_restriction(mut self, restriction: Option<&'a dyn TokenHolder>) -> Self {
        self.restriction = restriction;
        self
    }
}

// ---------------------------------------------------------------------------
// StageDecision / StageResult
// ---------------------------------------------------------------------------

/// The outcome of a single stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    Pass,
    Fail(GatingError),
}

impl StageDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Recorded result of a completed stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single rule in the mint gate.
///
/// The trait is object-safe and `Send + Sync` so stages can be stored in
/// a `Vec<Box<dyn GateStage>>`.
pub trait GateStage: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        config: &MintConfig,
        request: &MintRequest,
        context: &GateContext<'_>,
    ) -> StageDecision;
}
