use crate::config::MintConfig;
use crate::error::GatingError;
use crate::stage::{GateContext, GateStage, MintRequest, StageDecision};

/// Caps how many tokens a single source may hold.
///
/// Passes when the config has no cap (`max_per_source == 0`) or the
/// registry does not track a per-source balance for this request.
pub struct PerSourceCapStage;

impl GateStage for PerSourceCapStage {
    fn name(&self) -> &str {
        "per-source"
    }

    fn evaluate(
        &self,
        config: &MintConfig,
        request: &MintRequest,
        _context: &GateContext<'_>,
    ) -> StageDecision {
        match request.source_balance {
            Some(held) if config.max_per_source != 0 && held >= config.max_per_source => {
                StageDecision::Fail(GatingError::PerSourceCapReached {
                    max: config.max_per_source,
                })
            }
            _ => StageDecision::Pass,
        }
    }
}
