//! Survey intake: link validation, metadata lookup with fallback, scoring and
//! per-sector aggregation.

pub mod catalog;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, MetadataSource};
pub use domain::{
    MetadataOrigin, ResponseId, SectorId, SectorRiskSummary, SectorSummaryView, SurveyAccess,
    SurveyId, SurveyResponseRecord, SurveySubmission, TokenStatus,
};
pub use free_test::{FreeTest, FreeTestQuestion};
pub use import::{read_answers, read_answers_from_path, AnswerImportError};
pub use repository::{RepositoryError, SurveyRepository};
pub use router::survey_router;
pub use service::{SubmissionReceipt, SurveyService, SurveyServiceError, TokenValidation};
