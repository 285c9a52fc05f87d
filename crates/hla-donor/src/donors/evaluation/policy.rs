//! First-match-wins decision tables for the priority tier and the clinical
//! recommendation. Order inside each table is significant.

use super::super::domain::{
    AboCompatibility, DonorSex, EvaluationInput, PriorityTier, RecommendationKind, RiskLevel,
};
use super::config::EvaluationThresholds;
use super::rules::RiskSignals;

/// Everything a rule predicate may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub input: &'a EvaluationInput,
    pub signals: &'a RiskSignals,
    pub thresholds: &'a EvaluationThresholds,
}

impl RuleContext<'_> {
    fn dsa_above_avoid_threshold(&self) -> bool {
        self.input.dsa_level > self.thresholds.dsa_avoid_mfi
    }
}

pub struct PriorityRule {
    pub key: &'static str,
    pub tier: PriorityTier,
    applies: fn(&RuleContext<'_>) -> bool,
}

impl PriorityRule {
    pub fn matches(&self, ctx: &RuleContext<'_>) -> bool {
        (self.applies)(ctx)
    }
}

pub struct RecommendationRule {
    pub key: &'static str,
    pub kind: RecommendationKind,
    applies: fn(&RuleContext<'_>) -> bool,
}

impl RecommendationRule {
    pub fn matches(&self, ctx: &RuleContext<'_>) -> bool {
        (self.applies)(ctx)
    }
}

pub static PRIORITY_RULES: [PriorityRule; 3] = [
    PriorityRule {
        key: "dsa_above_avoid_threshold",
        tier: PriorityTier::Suboptimal,
        applies: dsa_above_avoid_threshold,
    },
    PriorityRule {
        key: "optimal_donor_profile",
        tier: PriorityTier::Optimal,
        applies: optimal_donor_profile,
    },
    PriorityRule {
        key: "acceptable_gvhd_or_age",
        tier: PriorityTier::Acceptable,
        applies: acceptable_gvhd_or_age,
    },
];

/// Applied when no entry of `PRIORITY_RULES` matches.
pub static PRIORITY_FALLBACK: PriorityRule = PriorityRule {
    key: "suboptimal_otherwise",
    tier: PriorityTier::Suboptimal,
    applies: always,
};

pub static RECOMMENDATION_RULES: [RecommendationRule; 3] = [
    RecommendationRule {
        key: "avoid_engraftment_failure_with_dsa",
        kind: RecommendationKind::AvoidDonor,
        applies: engraftment_failure_with_dsa,
    },
    RecommendationRule {
        key: "seek_alternatives_high_gvhd",
        kind: RecommendationKind::SeekAlternatives,
        applies: high_gvhd,
    },
    RecommendationRule {
        key: "committee_review_intermediate_gvhd",
        kind: RecommendationKind::CommitteeReview,
        applies: intermediate_gvhd,
    },
];

/// Applied when no entry of `RECOMMENDATION_RULES` matches.
pub static RECOMMENDATION_FALLBACK: RecommendationRule = RecommendationRule {
    key: "proceed_without_contraindications",
    kind: RecommendationKind::Proceed,
    applies: always,
};

fn dsa_above_avoid_threshold(ctx: &RuleContext<'_>) -> bool {
    ctx.dsa_above_avoid_threshold()
}

/// All five conditions must hold together.
fn optimal_donor_profile(ctx: &RuleContext<'_>) -> bool {
    ctx.signals.gvhd_risk == RiskLevel::Low
        && ctx.input.donor_age <= ctx.thresholds.optimal_max_age
        && !ctx.input.mismatches.b_leader_tt
        && ctx.signals.abo_compatibility == AboCompatibility::Compatible
        && ctx.input.donor_sex == DonorSex::Male
}

fn acceptable_gvhd_or_age(ctx: &RuleContext<'_>) -> bool {
    ctx.signals.gvhd_risk == RiskLevel::Intermediate
        || ctx.input.donor_age <= ctx.thresholds.acceptable_max_age
}

fn engraftment_failure_with_dsa(ctx: &RuleContext<'_>) -> bool {
    ctx.signals.engraftment_failure_risk == RiskLevel::High && ctx.dsa_above_avoid_threshold()
}

fn high_gvhd(ctx: &RuleContext<'_>) -> bool {
    ctx.signals.gvhd_risk == RiskLevel::High
}

fn intermediate_gvhd(ctx: &RuleContext<'_>) -> bool {
    ctx.signals.gvhd_risk == RiskLevel::Intermediate
}

fn always(_: &RuleContext<'_>) -> bool {
    true
}

pub(crate) fn decide_priority(ctx: &RuleContext<'_>) -> &'static PriorityRule {
    PRIORITY_RULES
        .iter()
        .find(|rule| rule.matches(ctx))
        .unwrap_or(&PRIORITY_FALLBACK)
}

pub(crate) fn decide_recommendation(ctx: &RuleContext<'_>) -> &'static RecommendationRule {
    RECOMMENDATION_RULES
        .iter()
        .find(|rule| rule.matches(ctx))
        .unwrap_or(&RECOMMENDATION_FALLBACK)
}
