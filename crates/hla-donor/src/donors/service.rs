use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::audit::{AuditError, AuditLog, AuditRecord, ReportIdSequence};
use super::batch::{BatchAggregator, BatchError, BatchOutcome};
use super::domain::DonorSubmission;
use super::localization::PresentationConfig;
use super::report::DonorReport;

/// One evaluated batch with the identifier stamped on its report and audit lines.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSession {
    pub report_id: String,
    pub evaluation_date: NaiveDate,
    pub outcome: BatchOutcome,
}

impl EvaluationSession {
    pub fn report(&self, presentation: PresentationConfig) -> DonorReport {
        DonorReport::from_outcome(&self.outcome, presentation)
    }
}

/// Service composing batch evaluation, presentation defaults and the audit trail.
pub struct DonorEvaluationService<L> {
    aggregator: BatchAggregator,
    audit: Arc<L>,
    presentation: PresentationConfig,
    report_ids: ReportIdSequence,
}

impl<L> DonorEvaluationService<L>
where
    L: AuditLog + 'static,
{
    /// The presentation quotes the evaluator's own DSA positivity threshold.
    pub fn new(aggregator: BatchAggregator, audit: Arc<L>, presentation: PresentationConfig) -> Self {
        let presentation = PresentationConfig {
            dsa_positive_mfi: aggregator.evaluator().thresholds().dsa_positive_mfi,
            ..presentation
        };

        Self {
            aggregator,
            audit,
            presentation,
            report_ids: ReportIdSequence::default(),
        }
    }

    pub fn presentation(&self) -> PresentationConfig {
        self.presentation
    }

    pub fn aggregator(&self) -> &BatchAggregator {
        &self.aggregator
    }

    /// Evaluate a batch and append one audit line per evaluated patient.
    ///
    /// The report id continues after the highest sequence the audit log holds for
    /// the date. Audit failures are returned after evaluation has completed; they
    /// never change the computed results. Blocks on audit I/O.
    pub fn evaluate_session(
        &self,
        submissions: Vec<DonorSubmission>,
        evaluation_date: NaiveDate,
    ) -> Result<EvaluationSession, DonorServiceError> {
        let outcome = self.aggregator.run(submissions)?;
        let recorded = self.audit.last_sequence(evaluation_date)?;
        let report_id = self.report_ids.next_id(evaluation_date, recorded);

        let records: Vec<AuditRecord> = outcome
            .evaluated()
            .map(|(_, result)| AuditRecord::from_result(result, &report_id, evaluation_date))
            .collect();
        self.audit.append(&records)?;

        info!(
            report_id = %report_id,
            evaluated = records.len(),
            %evaluation_date,
            "evaluation session recorded"
        );

        Ok(EvaluationSession {
            report_id,
            evaluation_date,
            outcome,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DonorServiceError {
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}
