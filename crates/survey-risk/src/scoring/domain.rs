use serde::{Deserialize, Serialize};

/// Direction of the value-to-risk mapping for a survey item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Protective factor ("I have autonomy"): agreement lowers risk.
    Positive,
    /// Risk factor ("I feel exhausted"): agreement raises risk.
    Negative,
}

impl Polarity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Protective",
            Self::Negative => "Risk factor",
        }
    }
}

/// One survey item as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMeta {
    pub id: String,
    pub topic_id: u32,
    pub polarity: Polarity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl QuestionMeta {
    pub fn new(id: impl Into<String>, topic_id: u32, polarity: Polarity) -> Self {
        Self {
            id: id.into(),
            topic_id,
            polarity,
            text: String::new(),
        }
    }
}

/// Aggregation dimension. A zero weight keeps the topic out of the global score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMeta {
    pub id: u32,
    pub name: String,
    pub weight: f64,
}

impl TopicMeta {
    pub fn new(id: u32, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
        }
    }
}

/// Respondent input on the 1-5 Likert scale. Out-of-range values are clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: i32,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: i32) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicScore {
    pub topic_id: u32,
    pub name: String,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// Engine output: global score, its classification, and one entry per topic
/// in the order the topics were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub global_score: u8,
    pub risk_level: RiskLevel,
    pub topic_scores: Vec<TopicScore>,
}

/// A complete metadata set handed to the engine on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyMetadata {
    pub topics: Vec<TopicMeta>,
    pub questions: Vec<QuestionMeta>,
}

impl SurveyMetadata {
    pub fn new(topics: Vec<TopicMeta>, questions: Vec<QuestionMeta>) -> Self {
        Self { topics, questions }
    }

    pub fn score(&self, answers: &[Answer]) -> RiskResult {
        super::calculate_risk(answers, &self.questions, &self.topics)
    }
}
