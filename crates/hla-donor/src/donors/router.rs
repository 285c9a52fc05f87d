use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::audit::AuditLog;
use super::domain::DonorSubmission;
use super::evidence::{self, EvidenceRowView};
use super::localization::{Locale, PresentationConfig};
use super::report::views::{PatientSummaryRow, RejectedRecordView};
use super::report::ReportTally;
use super::service::{DonorEvaluationService, DonorServiceError};

#[derive(Debug, Deserialize, Serialize)]
pub struct EvaluationRequest {
    pub submissions: Vec<DonorSubmission>,
    #[serde(default)]
    pub locale: Option<Locale>,
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
    #[serde(default)]
    pub sort_by_priority: bool,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub report_id: String,
    pub evaluation_date: NaiveDate,
    pub locale: Locale,
    pub title: &'static str,
    pub rows: Vec<PatientSummaryRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedRecordView>,
    pub tally: ReportTally,
}

#[derive(Debug, Deserialize)]
pub struct EvidenceQuery {
    #[serde(default)]
    pub locale: Option<Locale>,
}

#[derive(Debug, Serialize)]
pub struct EvidenceResponse {
    pub title: &'static str,
    pub rows: Vec<EvidenceRowView>,
}

/// Router builder exposing donor evaluation and the evidence reference table.
pub fn donor_router<L>(service: Arc<DonorEvaluationService<L>>) -> Router
where
    L: AuditLog + 'static,
{
    Router::new()
        .route("/api/v1/donors/evaluations", post(evaluate_handler::<L>))
        .route("/api/v1/donors/evidence", get(evidence_handler::<L>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<L>(
    State(service): State<Arc<DonorEvaluationService<L>>>,
    Json(request): Json<EvaluationRequest>,
) -> Response
where
    L: AuditLog + 'static,
{
    let EvaluationRequest {
        submissions,
        locale,
        evaluation_date,
        sort_by_priority,
    } = request;

    let evaluation_date = evaluation_date.unwrap_or_else(|| Local::now().date_naive());
    let presentation = match locale {
        Some(locale) => PresentationConfig {
            locale,
            ..service.presentation()
        },
        None => service.presentation(),
    };

    // Audit appends do blocking file I/O.
    let joined = tokio::task::spawn_blocking(move || {
        service.evaluate_session(submissions, evaluation_date)
    })
    .await;

    let session = match joined {
        Ok(Ok(session)) => session,
        Ok(Err(DonorServiceError::Batch(err))) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        Ok(Err(other)) => {
            error!(error = %other, "donor evaluation failed");
            let payload = json!({ "error": other.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
        Err(join_error) => {
            error!(error = %join_error, "donor evaluation task did not complete");
            let payload = json!({ "error": "evaluation task failed" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let report = session.report(presentation);
    let rows = if sort_by_priority {
        report.sorted_by_priority()
    } else {
        report.rows().to_vec()
    };

    let body = EvaluationResponse {
        report_id: session.report_id,
        evaluation_date: session.evaluation_date,
        locale: report.locale(),
        title: report.title(),
        rows,
        rejected: report.rejected().to_vec(),
        tally: report.tally(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn evidence_handler<L>(
    State(service): State<Arc<DonorEvaluationService<L>>>,
    Query(query): Query<EvidenceQuery>,
) -> Json<EvidenceResponse>
where
    L: AuditLog + 'static,
{
    let locale = query.locale.unwrap_or(service.presentation().locale);

    Json(EvidenceResponse {
        title: evidence::table_title(locale),
        rows: evidence::views(locale),
    })
}
