mod config;
mod policy;
mod rules;

pub use config::EvaluationThresholds;
pub use policy::{
    PriorityRule, RecommendationRule, RuleContext, PRIORITY_FALLBACK, PRIORITY_RULES,
    RECOMMENDATION_FALLBACK, RECOMMENDATION_RULES,
};
pub use rules::RiskSignals;

use super::domain::{DecisionTrail, EvaluationInput, EvaluationResult};
use policy::{decide_priority, decide_recommendation};
use tracing::debug;

/// Stateless evaluator mapping one donor/recipient pair to its risk classifications.
#[derive(Debug, Clone, Default)]
pub struct DonorRiskEvaluator {
    thresholds: EvaluationThresholds,
}

impl DonorRiskEvaluator {
    pub fn new(thresholds: EvaluationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &EvaluationThresholds {
        &self.thresholds
    }

    /// Classify risks, then run the priority and recommendation tables in order.
    pub fn evaluate(&self, input: &EvaluationInput) -> EvaluationResult {
        let signals = rules::assess(input, &self.thresholds);
        let ctx = RuleContext {
            input,
            signals: &signals,
            thresholds: &self.thresholds,
        };

        let priority = decide_priority(&ctx);
        let recommendation = decide_recommendation(&ctx);

        debug!(
            patient = input.patient_code.as_str(),
            gvhd = ?signals.gvhd_risk,
            tier = priority.tier.rank(),
            priority_rule = priority.key,
            recommendation_rule = recommendation.key,
            "donor evaluated"
        );

        EvaluationResult {
            patient_code: input.patient_code.clone(),
            gvhd_risk: signals.gvhd_risk,
            relapse_risk: signals.relapse_risk,
            engraftment_failure_risk: signals.engraftment_failure_risk,
            dsa_status: signals.dsa_status,
            abo_compatibility: signals.abo_compatibility,
            priority_tier: priority.tier,
            recommendation: recommendation.kind,
            decision_trail: DecisionTrail {
                priority_rule: priority.key.to_string(),
                recommendation_rule: recommendation.key.to_string(),
            },
        }
    }

    /// Risk classifications only, without running the decision tables.
    pub fn assess(&self, input: &EvaluationInput) -> RiskSignals {
        rules::assess(input, &self.thresholds)
    }
}
