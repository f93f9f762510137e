use crate::config::MintConfig;
use crate::error::GatingError;
use crate::stage::{GateContext, GateStage, MintRequest, StageDecision};

/// Rejects mints once the live supply has reached the cap.
pub struct SupplyStage;

impl GateStage for SupplyStage {
    fn name(&self) -> &str {
        "supply"
    }

    fn evaluate(
        &self,
        config: &MintConfig,
        request: &MintRequest,
        _context: &GateContext<'_>,
    ) -> StageDecision {
        if request.current_supply >= config.supply_cap {
            return StageDecision::Fail(GatingError::SupplyExhausted {
                cap: config.supply_cap,
            });
        }
        StageDecision::Pass
    }
}
