use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::scoring::{unmatched_answers, RiskLevel, SurveyMetadata, TopicScore};

use super::catalog::{CatalogError, MetadataSource};
use super::domain::{
    MetadataOrigin, ResponseId, SectorId, SectorSummaryView, SurveyAccess, SurveyResponseRecord,
    SurveySubmission, TokenStatus,
};
use super::repository::{RepositoryError, SurveyRepository};

/// Service composing token checks, metadata lookup, the scoring engine and storage.
pub struct SurveyService<R, M> {
    repository: Arc<R>,
    catalog: Arc<M>,
    fallback: Arc<SurveyMetadata>,
    clock: Clock,
}

/// Source of the current time used by the HTTP handlers.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

static RESPONSE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_response_id() -> ResponseId {
    let id = RESPONSE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResponseId(format!("resp-{id:06}"))
}

impl<R, M> SurveyService<R, M>
where
    R: SurveyRepository + 'static,
    M: MetadataSource + 'static,
{
    /// `fallback` is used whenever the catalog has nothing for a survey.
    pub fn new(repository: Arc<R>, catalog: Arc<M>, fallback: SurveyMetadata) -> Self {
        Self {
            repository,
            catalog,
            fallback: Arc::new(fallback),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the wall clock, e.g. to pin time in tests.
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn fallback_metadata(&self) -> &SurveyMetadata {
        &self.fallback
    }

    /// Reports whether a survey link can still accept answers.
    pub fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenValidation, SurveyServiceError> {
        let access = self.repository.find_access(token)?;
        let status = access
            .as_ref()
            .map_or(TokenStatus::Unknown, |access| access.status_at(now));

        Ok(TokenValidation {
            token: token.to_string(),
            status,
            valid: status.is_valid(),
            sector_name: access.as_ref().map(|access| access.sector_name.clone()),
            expires_at: access.and_then(|access| access.expires_at),
        })
    }

    /// Scores a respondent's answers and persists them with the result.
    pub fn submit(
        &self,
        submission: SurveySubmission,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SurveyServiceError> {
        let SurveySubmission { token, answers } = submission;

        let access = self.active_access(&token, now)?;
        if answers.is_empty() {
            return Err(SurveyServiceError::EmptySubmission);
        }

        let (metadata, metadata_origin) = self.metadata_for(&access)?;
        let ignored_answers =
            unmatched_answers(&answers, &metadata.questions, &metadata.topics);
        if ignored_answers > 0 {
            debug!(
                survey = %access.survey_id.0,
                ignored_answers,
                "answers reference questions or topics missing from metadata"
            );
        }

        let result = metadata.score(&answers);
        let response_id = next_response_id();

        let record = SurveyResponseRecord {
            response_id: response_id.clone(),
            survey_id: access.survey_id.clone(),
            sector_id: access.sector_id.clone(),
            answers,
            result: result.clone(),
            metadata_origin,
            submitted_at: now,
        };
        let summary = self.repository.record_response(record)?;

        info!(
            response = %response_id.0,
            sector = %access.sector_id.0,
            global_score = result.global_score,
            risk_level = result.risk_level.as_str(),
            sector_responses = summary.responses,
            "survey response recorded"
        );

        Ok(SubmissionReceipt {
            response_id,
            global_score: result.global_score,
            risk_level: result.risk_level,
            topic_scores: result.topic_scores,
            metadata_origin,
            ignored_answers,
        })
    }

    /// Aggregated scores for a sector, or `None` when nobody has answered yet.
    pub fn sector_summary(
        &self,
        sector_id: &SectorId,
    ) -> Result<Option<SectorSummaryView>, SurveyServiceError> {
        let summary = self.repository.sector_summary(sector_id)?;
        Ok(summary.map(|summary| summary.view()))
    }

    fn active_access(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SurveyAccess, SurveyServiceError> {
        let Some(access) = self.repository.find_access(token)? else {
            warn!("survey submission with unknown token");
            return Err(SurveyServiceError::TokenRejected(TokenStatus::Unknown));
        };

        let status = access.status_at(now);
        if !status.is_valid() {
            warn!(sector = %access.sector_id.0, status = status.label(), "survey submission rejected");
            return Err(SurveyServiceError::TokenRejected(status));
        }
        Ok(access)
    }

    fn metadata_for(
        &self,
        access: &SurveyAccess,
    ) -> Result<(Arc<SurveyMetadata>, MetadataOrigin), SurveyServiceError> {
        let metadata = self.catalog.load(&access.survey_id)?;
        if metadata.is_empty() {
            warn!(survey = %access.survey_id.0, "catalog empty, scoring with fallback metadata");
            return Ok((self.fallback.clone(), MetadataOrigin::Fallback));
        }
        Ok((Arc::new(metadata), MetadataOrigin::Catalog))
    }
}

/// Outcome of a token liveness check. The engine is not involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    pub token: String,
    pub status: TokenStatus,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Returned to the respondent once a submission has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub response_id: ResponseId,
    pub global_score: u8,
    pub risk_level: RiskLevel,
    pub topic_scores: Vec<TopicScore>,
    pub metadata_origin: MetadataOrigin,
    pub ignored_answers: usize,
}

/// Error raised by the survey service.
#[derive(Debug, thiserror::Error)]
pub enum SurveyServiceError {
    #[error("survey link rejected: {}", .0.label())]
    TokenRejected(TokenStatus),
    #[error("submission contains no answers")]
    EmptySubmission,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
