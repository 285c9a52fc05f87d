use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::donors::audit::{AuditError, AuditLog, AuditRecord};
use crate::donors::batch::{BatchAggregator, BatchOptions, BatchPolicy};
use crate::donors::domain::{
    BloodGroup, DonorSex, DonorSubmission, EvaluationInput, HlaMismatches, PatientCode,
};
use crate::donors::evaluation::DonorRiskEvaluator;
use crate::donors::intake::IntakeGuard;
use crate::donors::localization::PresentationConfig;
use crate::donors::service::DonorEvaluationService;

/// Young male donor, full match, no antibodies: qualifies for tier 1.
pub(super) fn optimal_input(code: &str) -> EvaluationInput {
    EvaluationInput {
        patient_code: PatientCode(code.to_string()),
        donor_age: 30,
        donor_blood_group: BloodGroup::O,
        recipient_blood_group: BloodGroup::O,
        donor_sex: DonorSex::Male,
        donor_has_children: false,
        dsa_level: 0,
        mismatches: HlaMismatches::default(),
    }
}

pub(super) fn single_locus(mismatch: fn(&mut HlaMismatches)) -> HlaMismatches {
    let mut mismatches = HlaMismatches::default();
    mismatch(&mut mismatches);
    mismatches
}

pub(super) fn evaluator() -> DonorRiskEvaluator {
    DonorRiskEvaluator::default()
}

pub(super) fn submission(code: &str) -> DonorSubmission {
    DonorSubmission {
        patient_code: code.to_string(),
        donor_age: 30,
        donor_blood_group: "O".to_string(),
        recipient_blood_group: "O".to_string(),
        donor_sex: "Masculino".to_string(),
        donor_has_children: false,
        dsa_level: 0,
        mismatches: HlaMismatches::default(),
    }
}

pub(super) fn high_dsa_submission(code: &str) -> DonorSubmission {
    let mut submission = submission(code);
    submission.dsa_level = 6000;
    submission
}

pub(super) fn single_mismatch_submission(code: &str) -> DonorSubmission {
    let mut submission = submission(code);
    submission.mismatches.hla_a = true;
    submission
}

pub(super) fn negative_age_submission(code: &str) -> DonorSubmission {
    let mut submission = submission(code);
    submission.donor_age = -1;
    submission
}

pub(super) fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 19).expect("valid date")
}

pub(super) fn aggregator(policy: BatchPolicy) -> BatchAggregator {
    BatchAggregator::new(
        IntakeGuard::default(),
        evaluator(),
        BatchOptions {
            policy,
            reject_duplicate_codes: false,
        },
    )
}

pub(super) fn build_service(
    policy: BatchPolicy,
) -> (DonorEvaluationService<MemoryAudit>, Arc<MemoryAudit>) {
    let audit = Arc::new(MemoryAudit::default());
    let service =
        DonorEvaluationService::new(aggregator(policy), audit.clone(), PresentationConfig::default());
    (service, audit)
}

#[derive(Default)]
pub(super) struct MemoryAudit {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAudit {
    pub(super) fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditLog for MemoryAudit {
    fn append(&self, records: &[AuditRecord]) -> Result<(), AuditError> {
        self.records
            .lock()
            .expect("audit mutex poisoned")
            .extend_from_slice(records);
        Ok(())
    }
}

pub(super) struct FailingAudit;

impl AuditLog for FailingAudit {
    fn append(&self, _records: &[AuditRecord]) -> Result<(), AuditError> {
        Err(AuditError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}

pub(super) fn temp_path(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "hla-donor-{label}-{}-{nanos}.csv",
        std::process::id()
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
