use crate::config::{MintConfig, MintMode};
use crate::error::GatingError;
use crate::stage::{GateContext, GateStage, MintRequest, StageDecision};

/// Rejects public mints while minting is disabled.
///
/// Privileged requests always pass this stage and only this stage.
pub struct ModeStage;

impl GateStage for ModeStage {
    fn name(&self) -> &str {
        "mode"
    }

    fn evaluate(
        &self,
        config: &MintConfig,
        request: &MintRequest,
        _context: &GateContext<'_>,
    ) -> StageDecision {
        if config.mode == MintMode::Disabled && !request.privileged {
            return StageDecision::Fail(GatingError::MintingDisabled);
        }
        StageDecision::Pass
    }
}
