use serde::{Deserialize, Serialize};

/// Clinical cut-offs driving the decision rules.
///
/// `Default` reproduces the program's published heuristics; every comparison in the
/// rules is strict or inclusive exactly as documented on each field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationThresholds {
    /// DSA above this MFI is reported as positive.
    pub dsa_positive_mfi: u32,
    /// DSA above this MFI forces tier 3 and high engraftment-failure risk.
    pub dsa_avoid_mfi: u32,
    /// Donors younger than this carry intermediate rather than high relapse risk.
    pub relapse_age_cutoff: u8,
    /// ABO-mismatched donors older than this carry high engraftment-failure risk.
    pub abo_mismatch_age_cutoff: u8,
    /// Inclusive maximum donor age for tier 1.
    pub optimal_max_age: u8,
    /// Inclusive maximum donor age for tier 2.
    pub acceptable_max_age: u8,
}

impl Default for EvaluationThresholds {
    fn default() -> Self {
        Self {
            dsa_positive_mfi: 2000,
            dsa_avoid_mfi: 5000,
            relapse_age_cutoff: 40,
            abo_mismatch_age_cutoff: 45,
            optimal_max_age: 35,
            acceptable_max_age: 50,
        }
    }
}
