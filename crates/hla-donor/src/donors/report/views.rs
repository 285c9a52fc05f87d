use super::super::domain::{
    AboCompatibility, DsaStatus, PriorityTier, RecommendationKind, RiskLevel,
};
use serde::Serialize;

/// One localized line of the patient summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientSummaryRow {
    pub patient_code: String,
    pub donor_age: u8,
    pub dsa_level: u32,
    pub gvhd_risk: RiskLevel,
    pub gvhd_risk_label: &'static str,
    pub gvhd_risk_color: String,
    pub relapse_risk: RiskLevel,
    pub relapse_risk_label: &'static str,
    pub relapse_risk_color: String,
    pub engraftment_failure_risk: RiskLevel,
    pub engraftment_failure_risk_label: &'static str,
    pub engraftment_failure_risk_color: String,
    pub dsa_status: DsaStatus,
    pub dsa_status_label: String,
    pub abo_compatibility: AboCompatibility,
    pub abo_compatibility_label: &'static str,
    pub priority_tier: u8,
    pub priority_label: &'static str,
    pub recommendation: RecommendationKind,
    pub recommendation_text: &'static str,
}

/// Submission that never reached the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecordView {
    pub position: usize,
    pub patient_code: String,
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierCount {
    pub tier: PriorityTier,
    pub label: &'static str,
    pub count: usize,
}
