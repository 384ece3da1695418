use crate::cli::ServeArgs;
use crate::infra::{
    demo_access, fallback_metadata, AppState, InMemoryMetadataSource, InMemorySurveyRepository,
    DEMO_TOKEN,
};
use crate::routes::with_survey_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use survey_risk::config::AppConfig;
use survey_risk::error::AppError;
use survey_risk::surveys::{FreeTest, SurveyService};
use survey_risk::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySurveyRepository::with_accesses([demo_access(
        Utc::now(),
    )]));
    let catalog = Arc::new(InMemoryMetadataSource::default());
    let survey_service = Arc::new(SurveyService::new(
        repository,
        catalog,
        fallback_metadata(&config.survey)?,
    ));
    let free_test = Arc::new(FreeTest::from_metadata(
        survey_service.fallback_metadata(),
        config.survey.free_test_questions_per_topic,
    ));

    let app = with_survey_routes(survey_service)
        .layer(Extension(free_test))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, demo_token = DEMO_TOKEN, "survey risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
