use super::super::domain::{AboCompatibility, DsaStatus, EvaluationInput, HlaMismatches, RiskLevel};
use super::config::EvaluationThresholds;

/// Per-patient risk classifications that feed the priority and recommendation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskSignals {
    pub gvhd_risk: RiskLevel,
    pub relapse_risk: RiskLevel,
    pub engraftment_failure_risk: RiskLevel,
    pub dsa_status: DsaStatus,
    pub abo_compatibility: AboCompatibility,
}

pub(crate) fn assess(input: &EvaluationInput, thresholds: &EvaluationThresholds) -> RiskSignals {
    let gvhd_risk = gvhd_risk(&input.mismatches);

    RiskSignals {
        gvhd_risk,
        relapse_risk: relapse_risk(gvhd_risk, input.donor_age, thresholds),
        engraftment_failure_risk: engraftment_failure_risk(input, thresholds),
        dsa_status: dsa_status(input.dsa_level, thresholds),
        abo_compatibility: abo_compatibility(input),
    }
}

/// DRB1, B, non-permissive DPB1 and B-leader T/T each escalate to high on their own;
/// two or more counted loci do as well.
pub(crate) fn gvhd_risk(mismatches: &HlaMismatches) -> RiskLevel {
    let count = mismatches.locus_count();

    if mismatches.hla_drb1
        || mismatches.hla_b
        || mismatches.dpb1_nonpermissive
        || mismatches.b_leader_tt
        || count >= 2
    {
        RiskLevel::High
    } else if count == 1 {
        RiskLevel::Intermediate
    } else {
        RiskLevel::Low
    }
}

pub(crate) fn relapse_risk(
    gvhd_risk: RiskLevel,
    donor_age: u8,
    thresholds: &EvaluationThresholds,
) -> RiskLevel {
    if gvhd_risk == RiskLevel::Low {
        RiskLevel::Low
    } else if donor_age < thresholds.relapse_age_cutoff {
        RiskLevel::Intermediate
    } else {
        RiskLevel::High
    }
}

/// The DSA branch is checked before ABO concordance.
pub(crate) fn engraftment_failure_risk(
    input: &EvaluationInput,
    thresholds: &EvaluationThresholds,
) -> RiskLevel {
    if input.dsa_level > thresholds.dsa_avoid_mfi {
        return RiskLevel::High;
    }

    if input.abo_matched() {
        RiskLevel::Low
    } else if input.donor_age > thresholds.abo_mismatch_age_cutoff {
        RiskLevel::High
    } else {
        RiskLevel::Intermediate
    }
}

pub(crate) fn dsa_status(dsa_level: u32, thresholds: &EvaluationThresholds) -> DsaStatus {
    if dsa_level > thresholds.dsa_positive_mfi {
        DsaStatus::Positive
    } else {
        DsaStatus::Negative
    }
}

pub(crate) fn abo_compatibility(input: &EvaluationInput) -> AboCompatibility {
    if input.abo_matched() {
        AboCompatibility::Compatible
    } else {
        AboCompatibility::Incompatible
    }
}
