//! Published immunogenetic evidence shown next to every donor report.
//!
//! Fixed literature data: ranked HLA factors, their clinical impact, study cohort
//! size, evidence strength and citation. Nothing here is derived from patient data.

use std::io::Write;

use serde::Serialize;

use super::localization::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStrength {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl EvidenceStrength {
    pub const fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::VeryHigh => locale.pick("Muy Alta", "Very High"),
            Self::High => locale.pick("Alta", "High"),
            Self::Moderate => locale.pick("Media", "Moderate"),
            Self::Low => locale.pick("Baja", "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceEntry {
    pub rank: u8,
    pub factor: &'static str,
    pub clinical_impact: &'static str,
    pub cohort_size: u32,
    pub strength: EvidenceStrength,
    pub citation: &'static str,
}

static REFERENCE_TABLE: [EvidenceEntry; 10] = [
    EvidenceEntry {
        rank: 1,
        factor: "HLA-DRB1 mismatch",
        clinical_impact: "↑ Acute GVHD, ↓ OS, ↑ TRM",
        cohort_size: 12_000,
        strength: EvidenceStrength::VeryHigh,
        citation: "Lee SJ et al. (2007)",
    },
    EvidenceEntry {
        rank: 2,
        factor: "HLA-A or HLA-B mismatch",
        clinical_impact: "↑ GVHD, graft failure, ↓ survival",
        cohort_size: 18_000,
        strength: EvidenceStrength::VeryHigh,
        citation: "Morishima Y et al. (2015)",
    },
    EvidenceEntry {
        rank: 3,
        factor: "Non-permissive HLA-DPB1",
        clinical_impact: "↑ GVHD, ↑ TRM",
        cohort_size: 5_000,
        strength: EvidenceStrength::High,
        citation: "Fleischhauer K et al. (2012)",
    },
    EvidenceEntry {
        rank: 4,
        factor: "HLA-C mismatch",
        clinical_impact: "↑ chronic GVHD, moderate TRM",
        cohort_size: 4_000,
        strength: EvidenceStrength::High,
        citation: "Petersdorf EW et al. (2001)",
    },
    EvidenceEntry {
        rank: 5,
        factor: "HLA-DQB1 mismatch",
        clinical_impact: "Limited effect alone; augments DRB1",
        cohort_size: 6_000,
        strength: EvidenceStrength::Moderate,
        citation: "Kawase T et al. (2007)",
    },
    EvidenceEntry {
        rank: 6,
        factor: "HLA-B leader (M/T)",
        clinical_impact: "↑ relapse if mismatch (T/T donor)",
        cohort_size: 7_000,
        strength: EvidenceStrength::Moderate,
        citation: "Pidala J et al. (2020)",
    },
    EvidenceEntry {
        rank: 7,
        factor: "HLA-DQA1 mismatch",
        clinical_impact: "Emerging evidence; CD4 repertoire",
        cohort_size: 3_000,
        strength: EvidenceStrength::Low,
        citation: "Madbouly AS et al. (2016)",
    },
    EvidenceEntry {
        rank: 8,
        factor: "KIR ligand mismatch",
        clinical_impact: "↓ relapse, NK alloreactivity (AML)",
        cohort_size: 3_500,
        strength: EvidenceStrength::Moderate,
        citation: "Ruggeri L et al. (2002)",
    },
    EvidenceEntry {
        rank: 9,
        factor: "Allelic vs Antigen mismatch",
        clinical_impact: "Allele mismatch worse than antigen",
        cohort_size: 10_000,
        strength: EvidenceStrength::High,
        citation: "Petersdorf EW et al. (2001)",
    },
    EvidenceEntry {
        rank: 10,
        factor: "Mismatch directionality",
        clinical_impact: "GVHD (GVH), graft loss (HVG)",
        cohort_size: 4_000,
        strength: EvidenceStrength::Moderate,
        citation: "Dehn J et al. (2014)",
    },
];

pub fn reference_table() -> &'static [EvidenceEntry] {
    &REFERENCE_TABLE
}

pub fn table_title(locale: Locale) -> &'static str {
    locale.pick(
        "Evidencia inmunogenética clave en la selección de donantes",
        "Key immunogenetic evidence in donor selection",
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceRowView {
    pub rank: u8,
    pub factor: &'static str,
    pub clinical_impact: &'static str,
    pub cohort_size: u32,
    pub strength: EvidenceStrength,
    pub strength_label: &'static str,
    pub citation: &'static str,
}

impl EvidenceEntry {
    pub fn to_view(&self, locale: Locale) -> EvidenceRowView {
        EvidenceRowView {
            rank: self.rank,
            factor: self.factor,
            clinical_impact: self.clinical_impact,
            cohort_size: self.cohort_size,
            strength: self.strength,
            strength_label: self.strength.label(locale),
            citation: self.citation,
        }
    }
}

pub fn views(locale: Locale) -> Vec<EvidenceRowView> {
    reference_table()
        .iter()
        .map(|entry| entry.to_view(locale))
        .collect()
}

/// Write the reference table as CSV with localized headers.
pub fn write_csv<W: Write>(writer: W, locale: Locale) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Ranking",
        "Factor",
        locale.pick("Impacto clínico", "Clinical impact"),
        locale.pick("N° Pacientes", "Patients (n)"),
        locale.pick("Fuerza Evidencia", "Evidence strength"),
        locale.pick("Referencia", "Reference"),
    ])?;

    for entry in reference_table() {
        csv_writer.write_record([
            entry.rank.to_string().as_str(),
            entry.factor,
            entry.clinical_impact,
            entry.cohort_size.to_string().as_str(),
            entry.strength.label(locale),
            entry.citation,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
