use serde::{Deserialize, Serialize};

/// Identifier wrapper for the patient a donor is being evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientCode(pub String);

impl PatientCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ABO blood group of a donor or recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    A,
    B,
    AB,
    O,
}

impl BloodGroup {
    pub const fn ordered() -> [Self; 4] {
        [Self::A, Self::B, Self::AB, Self::O]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::AB => "AB",
            Self::O => "O",
        }
    }

    /// Case-insensitive parse of the four ABO groups; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|group| group.label() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorSex {
    Male,
    Female,
}

impl DonorSex {
    /// Accepts the English and Spanish spellings collected by intake forms.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" | "m" | "masculino" => Some(Self::Male),
            "female" | "f" | "femenino" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Locus-level mismatch flags reported by the HLA typing lab.
///
/// The first five loci count towards the mismatch total. Non-permissive DPB1 and the
/// HLA-B leader T/T polymorphism are tracked separately because they escalate risk on
/// their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HlaMismatches {
    pub hla_a: bool,
    pub hla_b: bool,
    pub hla_c: bool,
    pub hla_drb1: bool,
    pub hla_dqb1: bool,
    pub dpb1_nonpermissive: bool,
    pub b_leader_tt: bool,
}

impl HlaMismatches {
    /// Number of mismatched loci among A, B, C, DRB1 and DQB1.
    pub fn locus_count(&self) -> u8 {
        [
            self.hla_a,
            self.hla_b,
            self.hla_c,
            self.hla_drb1,
            self.hla_dqb1,
        ]
        .into_iter()
        .filter(|mismatched| *mismatched)
        .count() as u8
    }
}

/// Raw donor/recipient pair as the collecting layer supplies it.
///
/// Numeric fields are signed and enumerations are free text so that out-of-domain
/// values can be reported instead of silently truncated; see `IntakeGuard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorSubmission {
    pub patient_code: String,
    pub donor_age: i64,
    pub donor_blood_group: String,
    pub recipient_blood_group: String,
    pub donor_sex: String,
    #[serde(default)]
    pub donor_has_children: bool,
    pub dsa_level: i64,
    pub mismatches: HlaMismatches,
}

/// Validated donor/recipient pair consumed by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationInput {
    pub patient_code: PatientCode,
    pub donor_age: u8,
    pub donor_blood_group: BloodGroup,
    pub recipient_blood_group: BloodGroup,
    pub donor_sex: DonorSex,
    /// Collected for the record; canonical scoring does not use it.
    pub donor_has_children: bool,
    /// Donor-specific antibody MFI.
    pub dsa_level: u32,
    pub mismatches: HlaMismatches,
}

impl EvaluationInput {
    pub fn abo_matched(&self) -> bool {
        self.donor_blood_group == self.recipient_blood_group
    }
}

/// Ordered risk classification shared by GVHD, relapse and engraftment outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Intermediate,
    High,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Intermediate, Self::High]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DsaStatus {
    Negative,
    /// Above the positivity threshold (2000 MFI by default).
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AboCompatibility {
    Compatible,
    Incompatible,
}

/// Donor priority tier; lower rank is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Optimal,
    Acceptable,
    Suboptimal,
}

impl PriorityTier {
    pub const fn rank(self) -> u8 {
        match self {
            Self::Optimal => 1,
            Self::Acceptable => 2,
            Self::Suboptimal => 3,
        }
    }
}

/// Recommendation kind; the wording is chosen per locale by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Avoid the donor; consider desensitization if it must be used.
    AvoidDonor,
    SeekAlternatives,
    CommitteeReview,
    Proceed,
}

/// Keys of the first-match rules that produced the tier and recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTrail {
    pub priority_rule: String,
    pub recommendation_rule: String,
}

/// Derived classifications for one donor/recipient pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub patient_code: PatientCode,
    pub gvhd_risk: RiskLevel,
    pub relapse_risk: RiskLevel,
    pub engraftment_failure_risk: RiskLevel,
    pub dsa_status: DsaStatus,
    pub abo_compatibility: AboCompatibility,
    pub priority_tier: PriorityTier,
    pub recommendation: RecommendationKind,
    pub decision_trail: DecisionTrail,
}
