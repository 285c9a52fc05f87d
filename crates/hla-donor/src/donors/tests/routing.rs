use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::donors::batch::BatchPolicy;
use crate::donors::router::donor_router;

fn evaluation_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/donors/evaluations")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn evaluation_route_returns_localized_report() {
    let (service, audit) = build_service(BatchPolicy::AbortOnFirstError);
    let app = donor_router(Arc::new(service));

    let body = json!({
        "submissions": [high_dsa_submission("W-1"), submission("W-2")],
        "locale": "en",
        "evaluation_date": "2025-10-19",
        "sort_by_priority": true
    });

    let response = app
        .oneshot(evaluation_request(body))
        .await
        .expect("route response");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["title"], "HLA Evaluation Report");
    assert_eq!(payload["locale"], "en");
    assert_eq!(payload["evaluation_date"], "2025-10-19");
    assert_eq!(payload["rows"][0]["patient_code"], "W-2");
    assert_eq!(payload["rows"][1]["recommendation"], "avoid_donor");
    assert_eq!(payload["tally"]["evaluated"], 2);
    assert!(payload.get("rejected").is_none());
    assert_eq!(audit.records().len(), 2);
}

#[tokio::test]
async fn invalid_submission_under_abort_policy_is_unprocessable() {
    let (service, audit) = build_service(BatchPolicy::AbortOnFirstError);
    let app = donor_router(Arc::new(service));

    let body = json!({ "submissions": [negative_age_submission("W-3")] });

    let response = app
        .oneshot(evaluation_request(body))
        .await
        .expect("route response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("W-3"));
    assert!(audit.records().is_empty());
}

#[tokio::test]
async fn collect_policy_lists_rejected_records() {
    let (service, _audit) = build_service(BatchPolicy::CollectPartial);
    let app = donor_router(Arc::new(service));

    let body = json!({
        "submissions": [negative_age_submission("W-4"), submission("W-5")]
    });

    let response = app
        .oneshot(evaluation_request(body))
        .await
        .expect("route response");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["locale"], "es");
    assert_eq!(payload["rows"][0]["gvhd_risk_label"], "Bajo");
    assert_eq!(payload["rejected"][0]["position"], 0);
    assert_eq!(payload["rejected"][0]["patient_code"], "W-4");
}

#[tokio::test]
async fn evidence_route_honours_locale_query() {
    let (service, _audit) = build_service(BatchPolicy::AbortOnFirstError);
    let app = donor_router(Arc::new(service));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/donors/evidence?locale=en")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route response");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["rank"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_evaluations_are_recorded_under_distinct_reports() {
    let (service, audit) = build_service(BatchPolicy::AbortOnFirstError);
    let app = donor_router(Arc::new(service));

    let requests = ["W-30", "W-31", "W-32", "W-33"].map(|code| {
        let app = app.clone();
        tokio::spawn(async move {
            let body = json!({
                "submissions": [submission(code)],
                "evaluation_date": "2025-10-19"
            });
            let response = app
                .oneshot(evaluation_request(body))
                .await
                .expect("route response");
            assert_eq!(response.status(), StatusCode::OK);
            read_json_body(response).await["report_id"]
                .as_str()
                .expect("report id")
                .to_string()
        })
    });

    let mut report_ids = Vec::new();
    for request in requests {
        report_ids.push(request.await.expect("request task"));
    }
    report_ids.sort();
    report_ids.dedup();

    assert_eq!(report_ids.len(), 4);
    assert_eq!(audit.records().len(), 4);
}
