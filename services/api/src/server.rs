use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState, SessionAuditLog};
use crate::routes::with_donor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hla_donor::config::AppConfig;
use hla_donor::error::AppError;
use hla_donor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let audit = SessionAuditLog::from_settings(&config.evaluation);
    let audit_target = audit.describe();
    let audit_persisted = audit.is_persistent();
    let service = Arc::new(build_service(&config.evaluation, audit));

    let app = with_donor_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        locale = config.evaluation.locale.code(),
        batch_policy = config.evaluation.batch_policy.label(),
        audit = %audit_target,
        audit_persisted,
        "donor evaluator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
