use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::scoring::Polarity::{Negative as N, Positive as P};
use crate::scoring::{Polarity, QuestionMeta, SurveyMetadata, TopicMeta};

use super::domain::SurveyId;

/// Failure loading question and topic metadata.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read survey catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid survey catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("survey catalog unavailable: {0}")]
    Unavailable(String),
}

/// Live catalog lookup (typically a database). An empty result tells the
/// caller to fall back to its configured default table.
pub trait MetadataSource: Send + Sync {
    fn load(&self, survey_id: &SurveyId) -> Result<SurveyMetadata, CatalogError>;
}

struct StandardTopic {
    id: u32,
    name: &'static str,
    questions: [(Polarity, &'static str); 5],
}

const STANDARD_TOPICS: [StandardTopic; 6] = [
    StandardTopic {
        id: 1,
        name: "Workload and pace",
        questions: [
            (N, "I have more work than I can finish in my regular hours."),
            (N, "I have to work very fast to keep up."),
            (N, "My deadlines are unrealistic."),
            (P, "I can take breaks when I need them."),
            (N, "I feel exhausted at the end of the workday."),
        ],
    },
    StandardTopic {
        id: 2,
        name: "Autonomy and control",
        questions: [
            (P, "I have a say in how I do my work."),
            (P, "I can decide the order in which I carry out my tasks."),
            (N, "Decisions about my work are made without consulting me."),
            (P, "I can use my skills and judgement in my job."),
            (P, "I can influence the pace at which I work."),
        ],
    },
    StandardTopic {
        id: 3,
        name: "Social support",
        questions: [
            (P, "My colleagues help me when work gets difficult."),
            (P, "My manager supports me with problems at work."),
            (N, "I experience conflict or hostility from people I work with."),
            (P, "I can talk openly with my manager about what upsets me."),
            (N, "I feel isolated from my team."),
        ],
    },
    StandardTopic {
        id: 4,
        name: "Recognition and reward",
        questions: [
            (P, "My work is recognised by the organisation."),
            (N, "My effort is not reflected in my pay or benefits."),
            (P, "I receive useful feedback on my performance."),
            (P, "I see opportunities to develop in this organisation."),
            (N, "Others take credit for my work."),
        ],
    },
    StandardTopic {
        id: 5,
        name: "Role clarity",
        questions: [
            (P, "I know what is expected of me at work."),
            (P, "I understand how my work fits the goals of the team."),
            (N, "I receive conflicting instructions from different people."),
            (N, "I am asked to do tasks outside my role without support."),
            (P, "My responsibilities are clearly defined."),
        ],
    },
    StandardTopic {
        id: 6,
        name: "Work-life balance",
        questions: [
            (N, "Work demands interfere with my personal or family life."),
            (P, "I can disconnect from work outside working hours."),
            (N, "I am contacted about work during my time off."),
            (N, "I skip rest or meals because of work."),
            (P, "My schedule lets me take care of my health."),
        ],
    },
];

impl SurveyMetadata {
    /// Reference fallback table: six topics of five questions each, `Q1`..`Q30`,
    /// all topics weighted equally.
    pub fn standard() -> Self {
        let mut topics = Vec::with_capacity(STANDARD_TOPICS.len());
        let mut questions = Vec::with_capacity(STANDARD_TOPICS.len() * 5);
        let mut sequence = 1;

        for topic in &STANDARD_TOPICS {
            topics.push(TopicMeta::new(topic.id, topic.name, 1.0));
            for (polarity, text) in topic.questions {
                questions.push(QuestionMeta {
                    id: format!("Q{sequence}"),
                    topic_id: topic.id,
                    polarity,
                    text: text.to_string(),
                });
                sequence += 1;
            }
        }

        Self { topics, questions }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Nothing can be scored without at least one topic and one question.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() || self.questions.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn questions_for_topic(&self, topic_id: u32) -> impl Iterator<Item = &QuestionMeta> {
        self.questions
            .iter()
            .filter(move |question| question.topic_id == topic_id)
    }

    /// Keeps the first `per_topic` questions of each topic in catalog order.
    /// Topics are kept as-is so the weighting stays comparable.
    pub fn subset_per_topic(&self, per_topic: usize) -> Self {
        let mut questions = Vec::new();
        for topic in &self.topics {
            if questions
                .iter()
                .any(|question: &QuestionMeta| question.topic_id == topic.id)
            {
                continue;
            }
            questions.extend(self.questions_for_topic(topic.id).take(per_topic).cloned());
        }

        Self {
            topics: self.topics.clone(),
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Cursor;

    #[test]
    fn standard_table_has_thirty_questions_across_six_topics() {
        let metadata = SurveyMetadata::standard();

        assert_eq!(metadata.topics.len(), 6);
        assert_eq!(metadata.question_count(), 30);
        for topic in &metadata.topics {
            assert_eq!(metadata.questions_for_topic(topic.id).count(), 5);
            assert_eq!(topic.weight, 1.0);
        }

        let ids: HashSet<&str> = metadata.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 30);
        assert!(ids.contains("Q1") && ids.contains("Q30"));
        assert!(metadata.questions.iter().all(|q| !q.text.is_empty()));
    }

    #[test]
    fn standard_topics_mix_polarities() {
        let metadata = SurveyMetadata::standard();
        for topic in &metadata.topics {
            let polarities: HashSet<Polarity> = metadata
                .questions_for_topic(topic.id)
                .map(|q| q.polarity)
                .collect();
            assert_eq!(polarities.len(), 2, "topic {} mixes polarity", topic.name);
        }
    }

    #[test]
    fn subset_keeps_first_questions_per_topic() {
        let metadata = SurveyMetadata::standard();
        let subset = metadata.subset_per_topic(2);

        assert_eq!(subset.topics, metadata.topics);
        assert_eq!(subset.question_count(), 12);
        let first_topic: Vec<&str> = subset
            .questions_for_topic(1)
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(first_topic, vec!["Q1", "Q2"]);
    }

    #[test]
    fn subset_ignores_duplicate_topic_entries() {
        let metadata = SurveyMetadata::new(
            vec![TopicMeta::new(1, "A", 1.0), TopicMeta::new(1, "A again", 1.0)],
            vec![
                QuestionMeta::new("Q1", 1, Polarity::Negative),
                QuestionMeta::new("Q2", 1, Polarity::Negative),
            ],
        );

        assert_eq!(metadata.subset_per_topic(1).question_count(), 1);
    }

    #[test]
    fn empty_when_topics_or_questions_missing() {
        assert!(SurveyMetadata::default().is_empty());
        let no_questions = SurveyMetadata::new(vec![TopicMeta::new(1, "A", 1.0)], Vec::new());
        assert!(no_questions.is_empty());
        assert!(!SurveyMetadata::standard().is_empty());
    }

    #[test]
    fn loads_catalog_json() {
        let raw = r#"{
            "topics": [{"id": 7, "name": "Harassment", "weight": 2.0}],
            "questions": [
                {"id": "H1", "topicId": 7, "polarity": "negative", "text": "I have been harassed."},
                {"id": "H2", "topicId": 7, "polarity": "positive"}
            ]
        }"#;

        let metadata = SurveyMetadata::from_json_reader(Cursor::new(raw)).expect("catalog parses");

        assert_eq!(metadata.topics[0].weight, 2.0);
        assert_eq!(metadata.questions[1].polarity, Polarity::Positive);
        assert!(metadata.questions[1].text.is_empty());
    }

    #[test]
    fn rejects_unknown_polarity() {
        let raw = r#"{"topics": [], "questions": [{"id": "X", "topicId": 1, "polarity": "neutral"}]}"#;
        let err = SurveyMetadata::from_json_reader(Cursor::new(raw)).expect_err("bad polarity");
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SurveyMetadata::from_path("/nonexistent/survey-catalog.json")
            .expect_err("missing file");
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
