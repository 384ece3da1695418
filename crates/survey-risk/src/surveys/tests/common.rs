use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::scoring::{Answer, Polarity, QuestionMeta, SurveyMetadata, TopicMeta};
use crate::surveys::catalog::{CatalogError, MetadataSource};
use crate::surveys::domain::{
    SectorId, SectorRiskSummary, SurveyAccess, SurveyId, SurveyResponseRecord, SurveySubmission,
};
use crate::surveys::repository::{RepositoryError, SurveyRepository};
use crate::surveys::{survey_router, SurveyService};

pub(super) const LIVE_TOKEN: &str = "tok-live";
pub(super) const EXPIRED_TOKEN: &str = "tok-expired";
pub(super) const INACTIVE_TOKEN: &str = "tok-inactive";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn access(token: &str, expires_at: Option<DateTime<Utc>>, active: bool) -> SurveyAccess {
    SurveyAccess {
        token: token.to_string(),
        survey_id: SurveyId("survey-2025".to_string()),
        sector_id: SectorId("sector-ops".to_string()),
        sector_name: "Operations".to_string(),
        expires_at,
        active,
    }
}

pub(super) fn seeded_accesses() -> Vec<SurveyAccess> {
    vec![
        access(LIVE_TOKEN, Some(now() + Duration::days(7)), true),
        access(EXPIRED_TOKEN, Some(now() - Duration::hours(1)), true),
        access(INACTIVE_TOKEN, None, false),
    ]
}

/// Two-topic catalog distinct from the standard fallback table.
pub(super) fn catalog_metadata() -> SurveyMetadata {
    SurveyMetadata::new(
        vec![TopicMeta::new(10, "Pressure", 1.0), TopicMeta::new(20, "Support", 1.0)],
        vec![
            QuestionMeta::new("P1", 10, Polarity::Negative),
            QuestionMeta::new("P2", 10, Polarity::Negative),
            QuestionMeta::new("S1", 20, Polarity::Positive),
        ],
    )
}

pub(super) fn submission(token: &str, answers: Vec<Answer>) -> SurveySubmission {
    SurveySubmission {
        token: token.to_string(),
        answers,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    accesses: Arc<Mutex<HashMap<String, SurveyAccess>>>,
    responses: Arc<Mutex<Vec<SurveyResponseRecord>>>,
    summaries: Arc<Mutex<HashMap<SectorId, SectorRiskSummary>>>,
}

impl MemoryRepository {
    pub(super) fn seeded() -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.accesses.lock().expect("repository mutex poisoned");
            for access in seeded_accesses() {
                guard.insert(access.token.clone(), access);
            }
        }
        repository
    }

    pub(super) fn responses(&self) -> Vec<SurveyResponseRecord> {
        self.responses.lock().expect("repository mutex poisoned").clone()
    }
}

impl SurveyRepository for MemoryRepository {
    fn find_access(&self, token: &str) -> Result<Option<SurveyAccess>, RepositoryError> {
        let guard = self.accesses.lock().expect("repository mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    fn record_response(
        &self,
        record: SurveyResponseRecord,
    ) -> Result<SectorRiskSummary, RepositoryError> {
        let mut summaries = self.summaries.lock().expect("repository mutex poisoned");
        let summary = summaries
            .entry(record.sector_id.clone())
            .or_insert_with(|| SectorRiskSummary::new(record.sector_id.clone()));
        summary.absorb(&record.result);
        let updated = summary.clone();
        self.responses
            .lock()
            .expect("repository mutex poisoned")
            .push(record);
        Ok(updated)
    }

    fn sector_summary(
        &self,
        sector_id: &SectorId,
    ) -> Result<Option<SectorRiskSummary>, RepositoryError> {
        let guard = self.summaries.lock().expect("repository mutex poisoned");
        Ok(guard.get(sector_id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl SurveyRepository for UnavailableRepository {
    fn find_access(&self, _token: &str) -> Result<Option<SurveyAccess>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_response(
        &self,
        _record: SurveyResponseRecord,
    ) -> Result<SectorRiskSummary, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn sector_summary(
        &self,
        _sector_id: &SectorId,
    ) -> Result<Option<SectorRiskSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Catalog returning a fixed metadata set for every survey.
#[derive(Default, Clone)]
pub(super) struct StaticCatalog {
    metadata: SurveyMetadata,
}

impl StaticCatalog {
    pub(super) fn empty() -> Self {
        Self::default()
    }

    pub(super) fn with(metadata: SurveyMetadata) -> Self {
        Self { metadata }
    }
}

impl MetadataSource for StaticCatalog {
    fn load(&self, _survey_id: &SurveyId) -> Result<SurveyMetadata, CatalogError> {
        Ok(self.metadata.clone())
    }
}

pub(super) struct OfflineCatalog;

impl MetadataSource for OfflineCatalog {
    fn load(&self, _survey_id: &SurveyId) -> Result<SurveyMetadata, CatalogError> {
        Err(CatalogError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) fn build_service(
    catalog: StaticCatalog,
) -> (SurveyService<MemoryRepository, StaticCatalog>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::seeded());
    let service = SurveyService::new(
        repository.clone(),
        Arc::new(catalog),
        SurveyMetadata::standard(),
    )
    .with_clock(now);
    (service, repository)
}

pub(super) fn survey_router_with_service(
    service: SurveyService<MemoryRepository, StaticCatalog>,
) -> axum::Router {
    survey_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
