use crate::config::{MintConfig, MintMode};
use crate::error::GatingError;
use crate::stage::{GateContext, GateStage, MintRequest, StageDecision};

/// In restricted mode, the requester must hold the restriction source.
pub struct RestrictionStage;

impl GateStage for RestrictionStage {
    fn name(&self) -> &str {
        "restriction"
    }

    fn evaluate(
        &self,
        config: &MintConfig,
        request: &MintRequest,
        context: &GateContext<'_>,
    ) -> StageDecision {
        if config.mode != MintMode::RestrictedToExternalHolder {
            return StageDecision::Pass;
        }
        let Some(source) = context.restriction else {
            return StageDecision::Fail(GatingError::NoRestrictionSource);
        };
        match source.balance_of(&request.requester) {
            Ok(0) => StageDecision::Fail(GatingError::NotTargetHolder),
            Ok(_) => StageDecision::Pass,
            Err(e) => StageDecision::Fail(e),
        }
    }
}
