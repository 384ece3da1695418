use super::domain::{SectorId, SectorRiskSummary, SurveyAccess, SurveyResponseRecord};

/// Storage abstraction so the survey service can be exercised in isolation.
pub trait SurveyRepository: Send + Sync {
    fn find_access(&self, token: &str) -> Result<Option<SurveyAccess>, RepositoryError>;

    /// Stores the response and folds it into its sector summary as one unit,
    /// returning the updated summary. Implementations must not let concurrent
    /// submissions for the same sector lose updates.
    fn record_response(
        &self,
        record: SurveyResponseRecord,
    ) -> Result<SectorRiskSummary, RepositoryError>;

    fn sector_summary(
        &self,
        sector_id: &SectorId,
    ) -> Result<Option<SectorRiskSummary>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
