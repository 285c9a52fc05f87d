use std::io::Write;

use super::super::batch::BatchOutcome;
use super::super::domain::{EvaluationInput, EvaluationResult};
use super::super::localization::{Locale, PresentationConfig};
use super::tally::ReportTally;
use super::views::{PatientSummaryRow, RejectedRecordView};

/// Patient summary joined from evaluated inputs and their results.
#[derive(Debug, Clone)]
pub struct DonorReport {
    presentation: PresentationConfig,
    rows: Vec<PatientSummaryRow>,
    rejected: Vec<RejectedRecordView>,
}

impl DonorReport {
    pub fn from_outcome(outcome: &BatchOutcome, presentation: PresentationConfig) -> Self {
        let rows = outcome
            .evaluated()
            .map(|(input, result)| summary_row(input, result, &presentation))
            .collect();

        let rejected = outcome
            .rejected()
            .map(|(position, patient_code, error)| RejectedRecordView {
                position,
                patient_code: patient_code.to_string(),
                error: error.to_string(),
            })
            .collect();

        Self {
            presentation,
            rows,
            rejected,
        }
    }

    /// Build from parallel slices; pairs beyond the shorter slice are ignored.
    pub fn from_pairs(
        inputs: &[EvaluationInput],
        results: &[EvaluationResult],
        presentation: PresentationConfig,
    ) -> Self {
        let rows = inputs
            .iter()
            .zip(results)
            .map(|(input, result)| summary_row(input, result, &presentation))
            .collect();

        Self {
            presentation,
            rows,
            rejected: Vec::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.presentation.locale
    }

    /// Rows in input order.
    pub fn rows(&self) -> &[PatientSummaryRow] {
        &self.rows
    }

    pub fn rejected(&self) -> &[RejectedRecordView] {
        &self.rejected
    }

    /// Rows ordered by tier; ties keep input order.
    pub fn sorted_by_priority(&self) -> Vec<PatientSummaryRow> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| row.priority_tier);
        rows
    }

    pub fn tally(&self) -> ReportTally {
        ReportTally::from_rows(&self.rows, self.presentation.locale)
    }

    pub fn title(&self) -> &'static str {
        self.presentation
            .locale
            .pick("Informe Evaluación HLA", "HLA Evaluation Report")
    }

    /// Write the summary table as CSV with localized headers.
    pub fn write_csv<W: Write>(&self, writer: W, sort_by_priority: bool) -> Result<(), csv::Error> {
        let locale = self.presentation.locale;
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(headers(locale))?;

        let sorted;
        let rows: &[PatientSummaryRow] = if sort_by_priority {
            sorted = self.sorted_by_priority();
            &sorted
        } else {
            &self.rows
        };

        for row in rows {
            csv_writer.write_record([
                row.patient_code.as_str(),
                row.donor_age.to_string().as_str(),
                row.dsa_level.to_string().as_str(),
                row.gvhd_risk_label,
                row.relapse_risk_label,
                row.engraftment_failure_risk_label,
                row.dsa_status_label.as_str(),
                row.abo_compatibility_label,
                row.priority_label,
                row.recommendation_text,
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

fn headers(locale: Locale) -> [&'static str; 10] {
    [
        locale.pick("Código", "Code"),
        locale.pick("Edad donante", "Donor age"),
        "DSA (MFI)",
        locale.pick("Riesgo GVHD", "GVHD risk"),
        locale.pick("Riesgo recaída", "Relapse risk"),
        locale.pick("Riesgo prendimiento", "Engraftment failure risk"),
        locale.pick("Estado DSA", "DSA status"),
        locale.pick("Compatibilidad ABO", "ABO compatibility"),
        locale.pick("Prioridad", "Priority"),
        locale.pick("Recomendación clínica", "Clinical recommendation"),
    ]
}

fn summary_row(
    input: &EvaluationInput,
    result: &EvaluationResult,
    presentation: &PresentationConfig,
) -> PatientSummaryRow {
    let locale = presentation.locale;
    let palette = &presentation.palette;

    PatientSummaryRow {
        patient_code: input.patient_code.0.clone(),
        donor_age: input.donor_age,
        dsa_level: input.dsa_level,
        gvhd_risk: result.gvhd_risk,
        gvhd_risk_label: result.gvhd_risk.label(locale),
        gvhd_risk_color: palette.color(result.gvhd_risk).hex(),
        relapse_risk: result.relapse_risk,
        relapse_risk_label: result.relapse_risk.label(locale),
        relapse_risk_color: palette.color(result.relapse_risk).hex(),
        engraftment_failure_risk: result.engraftment_failure_risk,
        engraftment_failure_risk_label: result.engraftment_failure_risk.label(locale),
        engraftment_failure_risk_color: palette.color(result.engraftment_failure_risk).hex(),
        dsa_status: result.dsa_status,
        dsa_status_label: result
            .dsa_status
            .label(locale, presentation.dsa_positive_mfi),
        abo_compatibility: result.abo_compatibility,
        abo_compatibility_label: result.abo_compatibility.label(locale),
        priority_tier: result.priority_tier.rank(),
        priority_label: result.priority_tier.label(locale),
        recommendation: result.recommendation,
        recommendation_text: result.recommendation.text(locale),
    }
}
