use crate::config::MintConfig;
use crate::error::GatingError;
use crate::stage::{GateContext, GateStage, MintRequest, StageDecision};

/// Enforces the `[start, end]` mint window. Zero bounds are open.
pub struct WindowStage;

impl GateStage for WindowStage {
    fn name(&self) -> &str {
        "window"
    }

    fn evaluate(
        &self,
        config: &MintConfig,
        _request: &MintRequest,
        context: &GateContext<'_>,
    ) -> StageDecision {
        let now = context.now;
        if !config.start_time.is_zero() && now < config.start_time {
            return StageDecision::Fail(GatingError::NotStarted {
                start: config.start_time,
                now,
            });
        }
        if !config.end_time.is_zero() && now > config.end_time {
            return StageDecision::Fail(GatingError::Ended {
                end: config.end_time,
                now,
            });
        }
        StageDecision::Pass
    }
}
