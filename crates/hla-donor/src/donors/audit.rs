use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{EvaluationResult, PriorityTier, RiskLevel};

/// One line of the evaluation audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub patient_code: String,
    pub evaluation_date: NaiveDate,
    pub report_id: String,
    pub gvhd_risk: RiskLevel,
    pub priority_tier: PriorityTier,
}

impl AuditRecord {
    pub fn from_result(result: &EvaluationResult, report_id: &str, date: NaiveDate) -> Self {
        Self {
            patient_code: result.patient_code.0.clone(),
            evaluation_date: date,
            report_id: report_id.to_string(),
            gvhd_risk: result.gvhd_risk,
            priority_tier: result.priority_tier,
        }
    }
}

/// Append-only sink for completed evaluations.
pub trait AuditLog: Send + Sync {
    fn append(&self, records: &[AuditRecord]) -> Result<(), AuditError>;

    /// Highest report sequence already recorded for `date`; 0 when none is known.
    fn last_sequence(&self, _date: NaiveDate) -> Result<u64, AuditError> {
        Ok(0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit log unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("audit log write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("audit log lock poisoned")]
    Poisoned,
}

/// CSV file opened in append mode; the header is written only into an empty file.
#[derive(Debug)]
pub struct CsvAuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvAuditLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for CsvAuditLog {
    fn append(&self, records: &[AuditRecord]) -> Result<(), AuditError> {
        if records.is_empty() {
            return Ok(());
        }

        let _guard = self.lock.lock().map_err(|_| AuditError::Poisoned)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn last_sequence(&self, date: NaiveDate) -> Result<u64, AuditError> {
        let _guard = self.lock.lock().map_err(|_| AuditError::Poisoned)?;
        if !self.path.exists() {
            return Ok(0);
        }

        let last = read_audit_log(&self.path)?
            .iter()
            .filter(|record| record.evaluation_date == date)
            .filter_map(|record| report_sequence(&record.report_id, date))
            .max()
            .unwrap_or(0);
        Ok(last)
    }
}

/// Read every record back from a CSV audit file, oldest first.
pub fn read_audit_log<P: AsRef<Path>>(path: P) -> Result<Vec<AuditRecord>, AuditError> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<AuditRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Issues report identifiers of the form `HLA-YYYYMMDD-NNNN`.
///
/// The counter is per process; callers pass the highest sequence their audit log
/// already holds so that a restarted process continues after it.
#[derive(Debug)]
pub struct ReportIdSequence {
    next: AtomicU64,
}

impl Default for ReportIdSequence {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl ReportIdSequence {
    pub fn next_id(&self, date: NaiveDate, recorded: u64) -> String {
        let floor = recorded.saturating_add(1);
        let sequence = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.max(floor).saturating_add(1))
            })
            .unwrap_or_else(|current| current)
            .max(floor);
        format!("HLA-{}-{sequence:04}", date.format("%Y%m%d"))
    }
}

/// Sequence part of an identifier issued for `date`, if it is one.
pub fn report_sequence(report_id: &str, date: NaiveDate) -> Option<u64> {
    report_id
        .strip_prefix(&format!("HLA-{}-", date.format("%Y%m%d")))
        .and_then(|tail| tail.parse().ok())
}
