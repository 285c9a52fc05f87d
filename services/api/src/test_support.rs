use hla_donor::donors::{AuditError, AuditLog, AuditRecord};
use std::sync::{Arc, Mutex};

/// Audit sink that keeps records so tests can inspect them.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingAuditLog {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl RecordingAuditLog {
    pub(crate) fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("audit lock").clone()
    }
}

impl AuditLog for RecordingAuditLog {
    fn append(&self, records: &[AuditRecord]) -> Result<(), AuditError> {
        let mut guard = self.records.lock().map_err(|_| AuditError::Poisoned)?;
        guard.extend_from_slice(records);
        Ok(())
    }
}
