//! Donor risk evaluation for hematopoietic stem-cell transplant candidates.
//!
//! Submissions pass through the intake guard, are scored by the evaluator and
//! aggregated in input order. Reports, localization, evidence and the audit trail
//! consume the results; none of them feed back into scoring.

pub mod audit;
pub mod batch;
pub mod domain;
pub mod evaluation;
pub mod evidence;
pub mod intake;
pub mod localization;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use audit::{AuditError, AuditLog, AuditRecord, CsvAuditLog, ReportIdSequence};
pub use batch::{
    BatchAggregator, BatchError, BatchOptions, BatchOutcome, BatchPolicy, RecordOutcome,
};
pub use domain::{
    AboCompatibility, BloodGroup, DecisionTrail, DonorSex, DonorSubmission, DsaStatus,
    EvaluationInput, EvaluationResult, HlaMismatches, PatientCode, PriorityTier,
    RecommendationKind, RiskLevel,
};
pub use evaluation::{DonorRiskEvaluator, EvaluationThresholds};
pub use intake::{parse_submissions, IntakeGuard, IntakePolicy, InvalidInput};
pub use localization::{Locale, PresentationConfig, RiskPalette, Rgb};
pub use report::DonorReport;
pub use router::donor_router;
pub use service::{DonorEvaluationService, DonorServiceError, EvaluationSession};
