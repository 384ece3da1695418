use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{risk_level_from_score, Answer, RiskLevel, RiskResult, TopicScore};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurveyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectorId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResponseId(pub String);

/// Link handed to respondents of one sector. The token is the only credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAccess {
    pub token: String,
    pub survey_id: SurveyId,
    pub sector_id: SectorId,
    pub sector_name: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl SurveyAccess {
    /// A token stops being valid at the exact instant it expires.
    pub fn status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        if !self.active {
            return TokenStatus::Inactive;
        }
        match self.expires_at {
            Some(expires_at) if now >= expires_at => TokenStatus::Expired,
            _ => TokenStatus::Valid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    Valid,
    Expired,
    Inactive,
    Unknown,
}

impl TokenStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Expired => "Expired",
            Self::Inactive => "Inactive",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Body posted by a respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub token: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Which metadata set produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataOrigin {
    Catalog,
    Fallback,
}

/// Persisted submission: raw answers alongside the computed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponseRecord {
    pub response_id: ResponseId,
    pub survey_id: SurveyId,
    pub sector_id: SectorId,
    pub answers: Vec<Answer>,
    pub result: RiskResult,
    pub metadata_origin: MetadataOrigin,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TopicTally {
    topic_id: u32,
    name: String,
    sum: u64,
}

/// Running aggregate of every response collected for a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRiskSummary {
    pub sector_id: SectorId,
    pub responses: u32,
    global_sum: u64,
    topics: Vec<TopicTally>,
}

impl SectorRiskSummary {
    pub fn new(sector_id: SectorId) -> Self {
        Self {
            sector_id,
            responses: 0,
            global_sum: 0,
            topics: Vec::new(),
        }
    }

    /// Fold one more result into the running sums.
    ///
    /// Topics are keyed by id and keep the order in which they were first
    /// seen. A topic missing from a later result contributes zero for it.
    pub fn absorb(&mut self, result: &RiskResult) {
        self.responses += 1;
        self.global_sum += u64::from(result.global_score);

        for entry in &result.topic_scores {
            match self
                .topics
                .iter_mut()
                .find(|tally| tally.topic_id == entry.topic_id)
            {
                Some(tally) => tally.sum += u64::from(entry.score),
                None => self.topics.push(TopicTally {
                    topic_id: entry.topic_id,
                    name: entry.name.clone(),
                    sum: u64::from(entry.score),
                }),
            }
        }
    }

    pub fn average_global_score(&self) -> u8 {
        average(self.global_sum, self.responses)
    }

    pub fn risk_level(&self) -> RiskLevel {
        risk_level_from_score(self.average_global_score())
    }

    pub fn topic_averages(&self) -> Vec<TopicScore> {
        self.topics
            .iter()
            .map(|tally| TopicScore {
                topic_id: tally.topic_id,
                name: tally.name.clone(),
                score: average(tally.sum, self.responses),
            })
            .collect()
    }

    pub fn view(&self) -> SectorSummaryView {
        SectorSummaryView {
            sector_id: self.sector_id.clone(),
            responses: self.responses,
            average_global_score: self.average_global_score(),
            risk_level: self.risk_level(),
            topic_averages: self.topic_averages(),
        }
    }
}

fn average(sum: u64, count: u32) -> u8 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / f64::from(count)).round().clamp(0.0, 100.0) as u8
}

/// Report-ready view of a sector summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSummaryView {
    pub sector_id: SectorId,
    pub responses: u32,
    pub average_global_score: u8,
    pub risk_level: RiskLevel,
    pub topic_averages: Vec<TopicScore>,
}
