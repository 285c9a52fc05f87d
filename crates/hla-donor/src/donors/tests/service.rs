use std::sync::Arc;

use super::common::*;
use crate::donors::audit::{read_audit_log, CsvAuditLog};
use crate::donors::batch::{BatchAggregator, BatchError, BatchOptions, BatchPolicy};
use crate::donors::domain::{DsaStatus, PriorityTier};
use crate::donors::evaluation::{DonorRiskEvaluator, EvaluationThresholds};
use crate::donors::intake::IntakeGuard;
use crate::donors::localization::{Locale, PresentationConfig};
use crate::donors::service::{DonorEvaluationService, DonorServiceError};

#[test]
fn session_audits_every_evaluated_patient_under_one_report_id() {
    let (service, audit) = build_service(BatchPolicy::CollectPartial);

    let session = service
        .evaluate_session(
            vec![
                submission("S-1"),
                negative_age_submission("S-2"),
                high_dsa_submission("S-3"),
            ],
            evaluation_date(),
        )
        .expect("session succeeds");

    assert!(session.report_id.starts_with("HLA-20251019-"));
    assert_eq!(session.outcome.len(), 3);

    let records = audit.records();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|record| record.report_id == session.report_id));
    assert_eq!(records[0].patient_code, "S-1");
    assert_eq!(records[0].priority_tier, PriorityTier::Optimal);
    assert_eq!(records[1].patient_code, "S-3");
    assert_eq!(records[1].priority_tier, PriorityTier::Suboptimal);
}

#[test]
fn separate_sessions_get_distinct_report_ids() {
    let (service, _audit) = build_service(BatchPolicy::AbortOnFirstError);

    let first = service
        .evaluate_session(vec![submission("S-10")], evaluation_date())
        .expect("first session");
    let second = service
        .evaluate_session(vec![submission("S-11")], evaluation_date())
        .expect("second session");

    assert_ne!(first.report_id, second.report_id);
}

#[test]
fn aborted_batch_writes_nothing_to_audit() {
    let (service, audit) = build_service(BatchPolicy::AbortOnFirstError);

    let err = service
        .evaluate_session(
            vec![submission("S-20"), negative_age_submission("S-21")],
            evaluation_date(),
        )
        .expect_err("batch aborts");

    assert!(matches!(
        err,
        DonorServiceError::Batch(BatchError::InvalidRecord { index: 1, .. })
    ));
    assert!(audit.records().is_empty());
}

#[test]
fn audit_failure_is_reported_as_audit_error() {
    let service = DonorEvaluationService::new(
        aggregator(BatchPolicy::AbortOnFirstError),
        Arc::new(FailingAudit),
        PresentationConfig::default(),
    );

    match service.evaluate_session(vec![submission("S-30")], evaluation_date()) {
        Err(DonorServiceError::Audit(err)) => {
            assert!(err.to_string().contains("read-only volume"));
        }
        other => panic!("expected audit error, got {other:?}"),
    }
}

#[test]
fn session_report_uses_requested_presentation() {
    let (service, _audit) = build_service(BatchPolicy::AbortOnFirstError);
    let session = service
        .evaluate_session(vec![single_mismatch_submission("S-40")], evaluation_date())
        .expect("session succeeds");

    let report = session.report(PresentationConfig::for_locale(
        Locale::En,
    ));

    assert_eq!(report.rows()[0].gvhd_risk_label, "Intermediate");
    assert_eq!(service.presentation(), PresentationConfig::default());
}

#[test]
fn restarted_service_continues_report_ids_from_audit_file() {
    let path = temp_path("audit-restart");
    let service_for = |path: &std::path::Path| {
        DonorEvaluationService::new(
            aggregator(BatchPolicy::AbortOnFirstError),
            Arc::new(CsvAuditLog::new(path)),
            PresentationConfig::default(),
        )
    };

    let first = service_for(&path)
        .evaluate_session(vec![submission("S-50")], evaluation_date())
        .expect("first run");
    let second = service_for(&path)
        .evaluate_session(vec![submission("S-51")], evaluation_date())
        .expect("second run");
    let next_day = service_for(&path)
        .evaluate_session(
            vec![submission("S-52")],
            evaluation_date().succ_opt().expect("next day"),
        )
        .expect("next day run");

    let records = read_audit_log(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(first.report_id, "HLA-20251019-0001");
    assert_eq!(second.report_id, "HLA-20251019-0002");
    assert_eq!(next_day.report_id, "HLA-20251020-0001");
    let records = records.expect("audit file");
    assert_eq!(records.len(), 3);
    assert_ne!(records[0].report_id, records[1].report_id);
}

#[test]
fn dsa_label_quotes_the_configured_positivity_threshold() {
    let thresholds = EvaluationThresholds {
        dsa_positive_mfi: 3000,
        ..EvaluationThresholds::default()
    };
    let aggregator = BatchAggregator::new(
        IntakeGuard::default(),
        DonorRiskEvaluator::new(thresholds),
        BatchOptions {
            policy: BatchPolicy::AbortOnFirstError,
            reject_duplicate_codes: false,
        },
    );
    let service = DonorEvaluationService::new(
        aggregator,
        Arc::new(MemoryAudit::default()),
        PresentationConfig::default(),
    );
    assert_eq!(service.presentation().dsa_positive_mfi, 3000);

    let mut positive = submission("S-60");
    positive.dsa_level = 3500;
    let mut below = submission("S-61");
    below.dsa_level = 2500;
    let session = service
        .evaluate_session(vec![positive, below], evaluation_date())
        .expect("session succeeds");

    let results: Vec<_> = session.outcome.evaluated().map(|(_, result)| result).collect();
    assert_eq!(results[0].dsa_status, DsaStatus::Positive);
    assert_eq!(results[1].dsa_status, DsaStatus::Negative);

    let spanish = session.report(service.presentation());
    assert_eq!(spanish.rows()[0].dsa_status_label, "Positivo (>3000 MFI)");
    assert_eq!(spanish.rows()[1].dsa_status_label, "Negativo");

    let english = session.report(PresentationConfig {
        locale: Locale::En,
        ..service.presentation()
    });
    assert_eq!(english.rows()[0].dsa_status_label, "Positive (>3000 MFI)");
}
