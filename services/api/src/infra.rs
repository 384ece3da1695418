use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use survey_risk::config::SurveyConfig;
use survey_risk::scoring::SurveyMetadata;
use survey_risk::surveys::{
    CatalogError, MetadataSource, RepositoryError, SectorId, SectorRiskSummary, SurveyAccess,
    SurveyId, SurveyRepository, SurveyResponseRecord,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct SurveyStore {
    accesses: HashMap<String, SurveyAccess>,
    responses: Vec<SurveyResponseRecord>,
    summaries: HashMap<SectorId, SectorRiskSummary>,
}

/// Process-local repository. One mutex covers responses and summaries so a
/// submission and its sector upsert land together.
#[derive(Default, Clone)]
pub(crate) struct InMemorySurveyRepository {
    store: Arc<Mutex<SurveyStore>>,
}

impl InMemorySurveyRepository {
    pub(crate) fn with_accesses(accesses: impl IntoIterator<Item = SurveyAccess>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.store.lock().expect("repository mutex poisoned");
            for access in accesses {
                guard.accesses.insert(access.token.clone(), access);
            }
        }
        repository
    }

    #[cfg(test)]
    pub(crate) fn response_count(&self) -> usize {
        self.store
            .lock()
            .expect("repository mutex poisoned")
            .responses
            .len()
    }
}

impl SurveyRepository for InMemorySurveyRepository {
    fn find_access(&self, token: &str) -> Result<Option<SurveyAccess>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.accesses.get(token).cloned())
    }

    fn record_response(
        &self,
        record: SurveyResponseRecord,
    ) -> Result<SectorRiskSummary, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard
            .responses
            .iter()
            .any(|existing| existing.response_id == record.response_id)
        {
            return Err(RepositoryError::Conflict);
        }

        let summary = guard
            .summaries
            .entry(record.sector_id.clone())
            .or_insert_with(|| SectorRiskSummary::new(record.sector_id.clone()));
        summary.absorb(&record.result);
        let updated = summary.clone();
        guard.responses.push(record);
        Ok(updated)
    }

    fn sector_summary(
        &self,
        sector_id: &SectorId,
    ) -> Result<Option<SectorRiskSummary>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.summaries.get(sector_id).cloned())
    }
}

/// Stand-in for the live catalog. Surveys without an entry come back empty,
/// which sends the service to its fallback table.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMetadataSource {
    surveys: Arc<Mutex<HashMap<SurveyId, SurveyMetadata>>>,
}

impl InMemoryMetadataSource {
    #[cfg(test)]
    pub(crate) fn insert(&self, survey_id: SurveyId, metadata: SurveyMetadata) {
        self.surveys
            .lock()
            .expect("catalog mutex poisoned")
            .insert(survey_id, metadata);
    }
}

impl MetadataSource for InMemoryMetadataSource {
    fn load(&self, survey_id: &SurveyId) -> Result<SurveyMetadata, CatalogError> {
        let guard = self.surveys.lock().expect("catalog mutex poisoned");
        Ok(guard.get(survey_id).cloned().unwrap_or_default())
    }
}

/// Fallback table for scoring: the configured catalog file, else the built-in table.
pub(crate) fn fallback_metadata(config: &SurveyConfig) -> Result<SurveyMetadata, CatalogError> {
    match &config.catalog_path {
        Some(path) => {
            let metadata = SurveyMetadata::from_path(path)?;
            info!(
                path = %path.display(),
                topics = metadata.topics.len(),
                questions = metadata.question_count(),
                "loaded survey catalog"
            );
            Ok(metadata)
        }
        None => Ok(SurveyMetadata::standard()),
    }
}

pub(crate) const DEMO_TOKEN: &str = "demo-survey-token";

/// Access link available on a freshly started server.
pub(crate) fn demo_access(now: DateTime<Utc>) -> SurveyAccess {
    SurveyAccess {
        token: DEMO_TOKEN.to_string(),
        survey_id: SurveyId("demo-survey".to_string()),
        sector_id: SectorId("demo-sector".to_string()),
        sector_name: "Demo sector".to_string(),
        expires_at: Some(now + Duration::days(30)),
        active: true,
    }
}
