use super::common::*;
use crate::donors::batch::{BatchOutcome, BatchPolicy};
use crate::donors::domain::{PriorityTier, RiskLevel};
use crate::donors::localization::{Locale, PresentationConfig};
use crate::donors::report::DonorReport;

fn mixed_outcome() -> BatchOutcome {
    aggregator(BatchPolicy::CollectPartial)
        .run(vec![
            high_dsa_submission("R-1"),
            single_mismatch_submission("R-2"),
            submission("R-3"),
            negative_age_submission("R-4"),
            high_dsa_submission("R-5"),
        ])
        .expect("collect policy")
}

#[test]
fn rows_follow_input_order_with_localized_labels() {
    let report = DonorReport::from_outcome(&mixed_outcome(), PresentationConfig::default());

    let codes: Vec<_> = report.rows().iter().map(|row| row.patient_code.as_str()).collect();
    assert_eq!(codes, vec!["R-1", "R-2", "R-3", "R-5"]);

    let first = &report.rows()[0];
    assert_eq!(first.engraftment_failure_risk, RiskLevel::High);
    assert_eq!(first.engraftment_failure_risk_label, "Alto");
    assert_eq!(first.engraftment_failure_risk_color, "#dc143c");
    assert_eq!(first.dsa_status_label, "Positivo (>2000 MFI)");
    assert_eq!(first.priority_label, "Prioridad 3: Donante subóptimo");
    assert!(first.recommendation_text.contains("desensibilización"));

    let second = &report.rows()[1];
    assert_eq!(second.gvhd_risk_label, "Intermedio");
    assert_eq!(second.gvhd_risk_color, "#ffa500");
    assert_eq!(report.rows()[2].gvhd_risk_color, "#008000");
}

#[test]
fn rejected_records_keep_their_position() {
    let report = DonorReport::from_outcome(&mixed_outcome(), PresentationConfig::default());

    assert_eq!(report.rejected().len(), 1);
    assert_eq!(report.rejected()[0].position, 3);
    assert_eq!(report.rejected()[0].patient_code, "R-4");
}

#[test]
fn priority_sort_is_stable_within_tier() {
    let report = DonorReport::from_outcome(&mixed_outcome(), PresentationConfig::default());

    let sorted: Vec<_> = report
        .sorted_by_priority()
        .into_iter()
        .map(|row| (row.priority_tier, row.patient_code))
        .collect();

    assert_eq!(
        sorted,
        vec![
            (1, "R-3".to_string()),
            (2, "R-2".to_string()),
            (3, "R-1".to_string()),
            (3, "R-5".to_string()),
        ]
    );
    assert_eq!(report.rows()[0].patient_code, "R-1");
}

#[test]
fn english_presentation_switches_every_label() {
    let report = DonorReport::from_outcome(
        &mixed_outcome(),
        PresentationConfig::for_locale(Locale::En),
    );

    assert_eq!(report.title(), "HLA Evaluation Report");
    let row = &report.rows()[1];
    assert_eq!(row.gvhd_risk_label, "Intermediate");
    assert_eq!(row.priority_label, "Priority 2: Acceptable donor");
    assert_eq!(row.recommendation_text, "Evaluate in committee; intermediate risk.");
}

#[test]
fn csv_export_uses_spanish_headers_by_default() {
    let report = DonorReport::from_outcome(&mixed_outcome(), PresentationConfig::default());
    let mut buffer = Vec::new();
    report.write_csv(&mut buffer, true).expect("csv export");

    let text = String::from_utf8(buffer).expect("utf-8");
    let mut lines = text.lines();
    let header = lines.next().expect("header line");
    assert!(header.starts_with("Código,Edad donante,DSA (MFI),Riesgo GVHD"));
    assert!(header.ends_with("Recomendación clínica"));

    let first = lines.next().expect("first data row");
    assert!(first.starts_with("R-3,30,0,Bajo"));
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn tally_counts_tiers_and_high_risks() {
    let report = DonorReport::from_outcome(&mixed_outcome(), PresentationConfig::default());
    let tally = report.tally();

    assert_eq!(tally.evaluated, 4);
    let counts: Vec<_> = tally.tiers.iter().map(|t| (t.tier, t.count)).collect();
    assert_eq!(
        counts,
        vec![
            (PriorityTier::Optimal, 1),
            (PriorityTier::Acceptable, 1),
            (PriorityTier::Suboptimal, 2),
        ]
    );
    assert_eq!(tally.high_gvhd_risk, 0);
    assert_eq!(tally.high_engraftment_failure_risk, 2);
    assert_eq!(tally.optimal_candidates, vec!["R-3".to_string()]);
}

#[test]
fn from_pairs_ignores_unpaired_inputs() {
    let inputs = vec![optimal_input("R-10"), optimal_input("R-11")];
    let results = vec![evaluator().evaluate(&inputs[0])];

    let report = DonorReport::from_pairs(&inputs, &results, PresentationConfig::default());

    assert_eq!(report.rows().len(), 1);
    assert!(report.rejected().is_empty());
}
