use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use survey_risk::scoring::{Answer, RiskResult};
use survey_risk::surveys::{
    survey_router, FreeTest, FreeTestQuestion, MetadataSource, SurveyRepository, SurveyService,
};

#[derive(Debug, Deserialize)]
pub(crate) struct FreeTestRequest {
    #[serde(default)]
    pub(crate) answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FreeTestQuestionnaire {
    pub(crate) question_count: usize,
    pub(crate) questions: Vec<FreeTestQuestion>,
}

pub(crate) fn with_survey_routes<R, M>(service: Arc<SurveyService<R, M>>) -> axum::Router
where
    R: SurveyRepository + 'static,
    M: MetadataSource + 'static,
{
    survey_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/free-test",
            axum::routing::get(free_test_questions).post(free_test_score),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn free_test_questions(
    Extension(free_test): Extension<Arc<FreeTest>>,
) -> Json<FreeTestQuestionnaire> {
    let questions = free_test.questions();
    Json(FreeTestQuestionnaire {
        question_count: questions.len(),
        questions,
    })
}

pub(crate) async fn free_test_score(
    Extension(free_test): Extension<Arc<FreeTest>>,
    Json(payload): Json<FreeTestRequest>,
) -> Json<RiskResult> {
    Json(free_test.score(&payload.answers))
}
