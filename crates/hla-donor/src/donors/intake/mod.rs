mod parser;

pub use parser::parse_submissions;

use super::domain::{
    BloodGroup, DonorSex, DonorSubmission, EvaluationInput, PatientCode,
};

/// Validation errors raised before a submission reaches the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("patient code is required")]
    MissingPatientCode,
    #[error("patient code {0} appears more than once in the batch")]
    DuplicatePatientCode(String),
    #[error("donor age cannot be negative (found {0})")]
    NegativeDonorAge(i64),
    #[error("donor age {found} exceeds the accepted maximum of {max}")]
    DonorAgeOutOfRange { max: u8, found: i64 },
    #[error("DSA level cannot be negative (found {0} MFI)")]
    NegativeDsaLevel(i64),
    #[error("DSA level {0} MFI is not representable")]
    DsaLevelOutOfRange(i64),
    #[error("unknown {field} blood group '{value}' (expected A, B, AB or O)")]
    UnknownBloodGroup { field: &'static str, value: String },
    #[error("unknown donor sex '{0}' (expected male or female)")]
    UnknownDonorSex(String),
}

const DEFAULT_MAX_DONOR_AGE: u8 = 100;

/// Caller-side rules applied at the intake boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakePolicy {
    pub require_patient_code: bool,
    pub max_donor_age: u8,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            require_patient_code: true,
            max_donor_age: DEFAULT_MAX_DONOR_AGE,
        }
    }
}

/// Guard responsible for producing `EvaluationInput` instances.
///
/// Values are checked, never clamped or substituted.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    pub fn input_from_submission(
        &self,
        submission: DonorSubmission,
    ) -> Result<EvaluationInput, InvalidInput> {
        let patient_code = submission.patient_code.trim().to_string();
        if self.policy.require_patient_code && patient_code.is_empty() {
            return Err(InvalidInput::MissingPatientCode);
        }

        if submission.donor_age < 0 {
            return Err(InvalidInput::NegativeDonorAge(submission.donor_age));
        }
        let donor_age = u8::try_from(submission.donor_age)
            .ok()
            .filter(|age| *age <= self.policy.max_donor_age)
            .ok_or(InvalidInput::DonorAgeOutOfRange {
                max: self.policy.max_donor_age,
                found: submission.donor_age,
            })?;

        if submission.dsa_level < 0 {
            return Err(InvalidInput::NegativeDsaLevel(submission.dsa_level));
        }
        let dsa_level = u32::try_from(submission.dsa_level)
            .map_err(|_| InvalidInput::DsaLevelOutOfRange(submission.dsa_level))?;

        let donor_blood_group = parse_blood_group("donor", &submission.donor_blood_group)?;
        let recipient_blood_group =
            parse_blood_group("recipient", &submission.recipient_blood_group)?;

        let donor_sex = DonorSex::parse(&submission.donor_sex)
            .ok_or_else(|| InvalidInput::UnknownDonorSex(submission.donor_sex.clone()))?;

        Ok(EvaluationInput {
            patient_code: PatientCode(patient_code),
            donor_age,
            donor_blood_group,
            recipient_blood_group,
            donor_sex,
            donor_has_children: submission.donor_has_children,
            dsa_level,
            mismatches: submission.mismatches,
        })
    }
}

fn parse_blood_group(field: &'static str, raw: &str) -> Result<BloodGroup, InvalidInput> {
    BloodGroup::parse(raw).ok_or_else(|| InvalidInput::UnknownBloodGroup {
        field,
        value: raw.to_string(),
    })
}
