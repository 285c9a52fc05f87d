use super::super::domain::{PriorityTier, RiskLevel};
use super::super::localization::Locale;
use super::views::{PatientSummaryRow, TierCount};
use serde::Serialize;

/// Headline counts for a report: patients per tier and high-risk totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTally {
    pub evaluated: usize,
    pub tiers: Vec<TierCount>,
    pub high_gvhd_risk: usize,
    pub high_engraftment_failure_risk: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optimal_candidates: Vec<String>,
}

impl ReportTally {
    pub(crate) fn from_rows(rows: &[PatientSummaryRow], locale: Locale) -> Self {
        let tiers = [
            PriorityTier::Optimal,
            PriorityTier::Acceptable,
            PriorityTier::Suboptimal,
        ]
        .into_iter()
        .map(|tier| TierCount {
            tier,
            label: tier.label(locale),
            count: rows
                .iter()
                .filter(|row| row.priority_tier == tier.rank())
                .count(),
        })
        .collect();

        let high_gvhd_risk = rows
            .iter()
            .filter(|row| row.gvhd_risk == RiskLevel::High)
            .count();
        let high_engraftment_failure_risk = rows
            .iter()
            .filter(|row| row.engraftment_failure_risk == RiskLevel::High)
            .count();

        let optimal_candidates = rows
            .iter()
            .filter(|row| row.priority_tier == PriorityTier::Optimal.rank())
            .map(|row| row.patient_code.clone())
            .collect();

        Self {
            evaluated: rows.len(),
            tiers,
            high_gvhd_risk,
            high_engraftment_failure_risk,
            optimal_candidates,
        }
    }
}
