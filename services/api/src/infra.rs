use chrono::NaiveDate;
use hla_donor::config::EvaluationSettings;
use hla_donor::donors::{
    AuditError, AuditLog, AuditRecord, BatchAggregator, BatchOptions, CsvAuditLog,
    DonorEvaluationService, DonorRiskEvaluator, IntakeGuard, IntakePolicy, Locale,
    PresentationConfig,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Audit sink used when no audit file is configured: every record becomes a
/// structured log event and nothing is retained.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn append(&self, records: &[AuditRecord]) -> Result<(), AuditError> {
        for record in records {
            info!(
                target: "hla_donor::audit",
                patient = %record.patient_code,
                report_id = %record.report_id,
                evaluation_date = %record.evaluation_date,
                gvhd_risk = ?record.gvhd_risk,
                priority_tier = record.priority_tier.rank(),
                "audit record"
            );
        }
        Ok(())
    }
}

pub(crate) enum SessionAuditLog {
    File(CsvAuditLog),
    Log(TracingAuditLog),
}

impl AuditLog for SessionAuditLog {
    fn append(&self, records: &[AuditRecord]) -> Result<(), AuditError> {
        match self {
            SessionAuditLog::File(log) => log.append(records),
            SessionAuditLog::Log(log) => log.append(records),
        }
    }

    fn last_sequence(&self, date: NaiveDate) -> Result<u64, AuditError> {
        match self {
            SessionAuditLog::File(log) => log.last_sequence(date),
            SessionAuditLog::Log(log) => log.last_sequence(date),
        }
    }
}

impl SessionAuditLog {
    /// Falls back to the log-only sink, with a warning, when `APP_AUDIT_LOG` is unset.
    pub(crate) fn from_settings(settings: &EvaluationSettings) -> Self {
        match &settings.audit_log_path {
            Some(path) => SessionAuditLog::File(CsvAuditLog::new(path)),
            None => {
                warn!("APP_AUDIT_LOG is not set; audit records are logged but not persisted");
                SessionAuditLog::Log(TracingAuditLog)
            }
        }
    }

    pub(crate) fn is_persistent(&self) -> bool {
        matches!(self, SessionAuditLog::File(_))
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            SessionAuditLog::File(log) => log.path().display().to_string(),
            SessionAuditLog::Log(_) => "log only (not persisted)".to_string(),
        }
    }
}

pub(crate) fn build_service<L>(settings: &EvaluationSettings, audit: L) -> DonorEvaluationService<L>
where
    L: AuditLog + 'static,
{
    let guard = IntakeGuard::with_policy(IntakePolicy {
        max_donor_age: settings.max_donor_age,
        ..IntakePolicy::default()
    });
    let aggregator = BatchAggregator::new(
        guard,
        DonorRiskEvaluator::default(),
        BatchOptions {
            policy: settings.batch_policy,
            reject_duplicate_codes: false,
        },
    );

    DonorEvaluationService::new(
        aggregator,
        Arc::new(audit),
        PresentationConfig::for_locale(settings.locale),
    )
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_locale(raw: &str) -> Result<Locale, String> {
    Locale::parse(raw).ok_or_else(|| format!("unsupported locale '{raw}' (expected es or en)"))
}
