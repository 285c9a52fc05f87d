use super::super::domain::{DonorSubmission, HlaMismatches};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Read donor submissions from a CSV export, one row per patient/donor pair.
///
/// Rows are returned in file order. Mismatch columns accept the usual checkbox
/// spellings (`true`, `x`, `yes`, `si`, `1`); blank cells count as unchecked.
pub fn parse_submissions<R: Read>(reader: R) -> Result<Vec<DonorSubmission>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<SubmissionRow>()
        .map(|row| row.map(SubmissionRow::into_submission))
        .collect()
}

#[derive(Debug, Deserialize)]
struct SubmissionRow {
    patient_code: String,
    donor_age: i64,
    donor_blood_group: String,
    recipient_blood_group: String,
    donor_sex: String,
    #[serde(default, deserialize_with = "checkbox")]
    donor_has_children: bool,
    dsa_level: i64,
    #[serde(default, deserialize_with = "checkbox")]
    hla_a: bool,
    #[serde(default, deserialize_with = "checkbox")]
    hla_b: bool,
    #[serde(default, deserialize_with = "checkbox")]
    hla_c: bool,
    #[serde(default, deserialize_with = "checkbox")]
    hla_drb1: bool,
    #[serde(default, deserialize_with = "checkbox")]
    hla_dqb1: bool,
    #[serde(default, deserialize_with = "checkbox")]
    dpb1_nonpermissive: bool,
    #[serde(default, deserialize_with = "checkbox")]
    b_leader_tt: bool,
}

impl SubmissionRow {
    fn into_submission(self) -> DonorSubmission {
        DonorSubmission {
            patient_code: self.patient_code,
            donor_age: self.donor_age,
            donor_blood_group: self.donor_blood_group,
            recipient_blood_group: self.recipient_blood_group,
            donor_sex: self.donor_sex,
            donor_has_children: self.donor_has_children,
            dsa_level: self.dsa_level,
            mismatches: HlaMismatches {
                hla_a: self.hla_a,
                hla_b: self.hla_b,
                hla_c: self.hla_c,
                hla_drb1: self.hla_drb1,
                hla_dqb1: self.hla_dqb1,
                dpb1_nonpermissive: self.dpb1_nonpermissive,
                b_leader_tt: self.b_leader_tt,
            },
        }
    }
}

fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    match raw.trim().to_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "x" | "1" | "si" | "sí" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "'{other}' is not a checkbox value"
        ))),
    }
}
