use crate::config::MintConfig;
use crate::error::GatingError;
use crate::stage::{GateContext, GateStage, MintRequest, StageDecision, StageResult};
use crate::stages::{ModeStage, PerSourceCapStage, RestrictionStage, SupplyStage, WindowStage};

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

/// The outcome of running a request through the full pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    /// `Ok` if every stage passed, otherwise the first failure.
    pub outcome: Result<(), GatingError>,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
}

impl GateResult {
    pub fn is_eligible(&self) -> bool {
        self.outcome.is_ok()
    }
}

// ---------------------------------------------------------------------------
// MintGate
// ---------------------------------------------------------------------------

/// The mint gate: an ordered pipeline of eligibility stages every mint
/// request passes through before a registry creates a token.
pub struct MintGate {
    stages: Vec<Box<dyn GateStage>>,
}

impl MintGate {
    /// Create a gate with an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard pipeline:
    /// Mode -> Restriction -> Window -> Supply -> PerSource
    pub fn with_default_stages() -> Self {
        let mut gate = Self::new();
        gate.add_stage(Box::new(ModeStage));
        gate.add_stage(Box::new(RestrictionStage));
        gate.add_stage(Box::new(WindowStage));
        gate.add_stage(Box::new(SupplyStage));
        gate.add_stage(Box::new(PerSourceCapStage));
        gate
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate a request through the full pipeline.
    ///
    /// The pipeline is **fail-fast**: the first failing stage stops
    /// evaluation and its error is the outcome.
    pub fn evaluate(
        &self,
        config: &MintConfig,
        request: &MintRequest,
        context: &GateContext<'_>,
    ) -> GateResult {
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let decision = stage.evaluate(config, request, context);
            tracing::debug!(
                stage = stage.name(),
                requester = %request.requester,
                passed = decision.is_pass(),
                "mint gate stage evaluated"
            );

            match decision {
                StageDecision::Pass => stage_results.push(StageResult {
                    stage_name: stage.name().to_string(),
                    passed: true,
                    reason: None,
                }),
                StageDecision::Fail(error) => {
                    stage_results.push(StageResult {
                        stage_name: stage.name().to_string(),
                        passed: false,
                        reason: Some(error.to_string()),
                    });
                    return GateResult {
                        outcome: Err(error),
                        stage_results,
                    };
                }
            }
        }

        GateResult {
            outcome: Ok(()),
            stage_results,
        }
    }

    /// Evaluate and keep only the outcome.
    pub fn check(
        &self,
        config: &MintConfig,
        request: &MintRequest,
        context: &GateContext<'_>,
    ) -> Result<(), GatingError> {
        self.evaluate(config, request, context).outcome
    }
}

impl Default for MintGate {
    fn default() -> Self {
        Self::with_default_stages()
    }
}
