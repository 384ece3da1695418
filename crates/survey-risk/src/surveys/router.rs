use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::catalog::MetadataSource;
use super::domain::{SectorId, SurveySubmission, TokenStatus};
use super::repository::SurveyRepository;
use super::service::{SurveyService, SurveyServiceError};

/// Router builder exposing link validation, submission and sector summaries.
pub fn survey_router<R, M>(service: Arc<SurveyService<R, M>>) -> Router
where
    R: SurveyRepository + 'static,
    M: MetadataSource + 'static,
{
    Router::new()
        .route("/api/v1/surveys/submit", post(submit_handler::<R, M>))
        .route(
            "/api/v1/surveys/:token/validate",
            get(validate_handler::<R, M>),
        )
        .route(
            "/api/v1/sectors/:sector_id/summary",
            get(sector_summary_handler::<R, M>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, M>(
    State(service): State<Arc<SurveyService<R, M>>>,
    axum::Json(submission): axum::Json<SurveySubmission>,
) -> Response
where
    R: SurveyRepository + 'static,
    M: MetadataSource + 'static,
{
    match service.submit(submission, service.now()) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validate_handler<R, M>(
    State(service): State<Arc<SurveyService<R, M>>>,
    Path(token): Path<String>,
) -> Response
where
    R: SurveyRepository + 'static,
    M: MetadataSource + 'static,
{
    match service.validate(&token, service.now()) {
        Ok(validation) => (StatusCode::OK, axum::Json(validation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sector_summary_handler<R, M>(
    State(service): State<Arc<SurveyService<R, M>>>,
    Path(sector_id): Path<String>,
) -> Response
where
    R: SurveyRepository + 'static,
    M: MetadataSource + 'static,
{
    let sector_id = SectorId(sector_id);
    match service.sector_summary(&sector_id) {
        Ok(Some(view)) => (StatusCode::OK, axum::Json(view)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "no responses recorded for sector",
                "sectorId": sector_id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: SurveyServiceError) -> Response {
    let status = match &error {
        SurveyServiceError::TokenRejected(TokenStatus::Unknown) => StatusCode::NOT_FOUND,
        SurveyServiceError::TokenRejected(_) => StatusCode::FORBIDDEN,
        SurveyServiceError::EmptySubmission => StatusCode::UNPROCESSABLE_ENTITY,
        SurveyServiceError::Catalog(_) | SurveyServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
