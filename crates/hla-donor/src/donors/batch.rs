use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{DonorSubmission, EvaluationInput, EvaluationResult, PatientCode};
use super::evaluation::DonorRiskEvaluator;
use super::intake::{IntakeGuard, InvalidInput};

/// How a batch reacts to an invalid submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Reject the whole batch on the first invalid record.
    #[default]
    AbortOnFirstError,
    /// Evaluate every valid record and report the invalid ones alongside.
    CollectPartial,
}

impl BatchPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort_on_first_error" => Some(Self::AbortOnFirstError),
            "collect" | "collect_partial" | "partial" => Some(Self::CollectPartial),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AbortOnFirstError => "abort",
            Self::CollectPartial => "collect",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub policy: BatchPolicy,
    /// Treat a repeated patient code as invalid input.
    pub reject_duplicate_codes: bool,
}

/// Per-position outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Evaluated {
        input: EvaluationInput,
        result: EvaluationResult,
    },
    Rejected {
        patient_code: String,
        error: String,
    },
}

impl RecordOutcome {
    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            RecordOutcome::Evaluated { result, .. } => Some(result),
            RecordOutcome::Rejected { .. } => None,
        }
    }
}

/// Ordered batch output; `records[i]` always corresponds to submission `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<RecordOutcome>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Evaluated pairs in input order, skipping rejected positions.
    pub fn evaluated(&self) -> impl Iterator<Item = (&EvaluationInput, &EvaluationResult)> {
        self.records.iter().filter_map(|record| match record {
            RecordOutcome::Evaluated { input, result } => Some((input, result)),
            RecordOutcome::Rejected { .. } => None,
        })
    }

    /// Rejected records with their original position.
    pub fn rejected(&self) -> impl Iterator<Item = (usize, &str, &str)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match record {
                RecordOutcome::Rejected {
                    patient_code,
                    error,
                } => Some((index, patient_code.as_str(), error.as_str())),
                RecordOutcome::Evaluated { .. } => None,
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("record {index} ({patient_code}) is invalid: {source}")]
    InvalidRecord {
        index: usize,
        patient_code: String,
        #[source]
        source: InvalidInput,
    },
}

/// Applies intake validation and the evaluator across an ordered batch.
#[derive(Debug, Clone, Default)]
pub struct BatchAggregator {
    guard: IntakeGuard,
    evaluator: DonorRiskEvaluator,
    options: BatchOptions,
}

impl BatchAggregator {
    pub fn new(guard: IntakeGuard, evaluator: DonorRiskEvaluator, options: BatchOptions) -> Self {
        Self {
            guard,
            evaluator,
            options,
        }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn evaluator(&self) -> &DonorRiskEvaluator {
        &self.evaluator
    }

    /// Evaluate already validated inputs; output order matches input order.
    pub fn evaluate_all(&self, inputs: &[EvaluationInput]) -> Vec<EvaluationResult> {
        inputs
            .iter()
            .map(|input| self.evaluator.evaluate(input))
            .collect()
    }

    pub fn run(&self, submissions: Vec<DonorSubmission>) -> Result<BatchOutcome, BatchError> {
        let total = submissions.len();
        let mut seen: HashSet<PatientCode> = HashSet::new();
        let mut records = Vec::with_capacity(total);

        for (index, submission) in submissions.into_iter().enumerate() {
            let patient_code = submission.patient_code.clone();

            match self.validate(submission, &mut seen) {
                Ok(input) => {
                    let result = self.evaluator.evaluate(&input);
                    records.push(RecordOutcome::Evaluated { input, result });
                }
                Err(source) => match self.options.policy {
                    BatchPolicy::AbortOnFirstError => {
                        warn!(index, patient = %patient_code, error = %source, "aborting batch");
                        return Err(BatchError::InvalidRecord {
                            index,
                            patient_code,
                            source,
                        });
                    }
                    BatchPolicy::CollectPartial => {
                        warn!(index, patient = %patient_code, error = %source, "record rejected");
                        records.push(RecordOutcome::Rejected {
                            patient_code,
                            error: source.to_string(),
                        });
                    }
                },
            }
        }

        let outcome = BatchOutcome { records };
        info!(
            total,
            rejected = outcome.rejected().count(),
            policy = self.options.policy.label(),
            "batch evaluated"
        );
        Ok(outcome)
    }

    fn validate(
        &self,
        submission: DonorSubmission,
        seen: &mut HashSet<PatientCode>,
    ) -> Result<EvaluationInput, InvalidInput> {
        let input = self.guard.input_from_submission(submission)?;

        if self.options.reject_duplicate_codes && !seen.insert(input.patient_code.clone()) {
            return Err(InvalidInput::DuplicatePatientCode(
                input.patient_code.0.clone(),
            ));
        }

        Ok(input)
    }
}
