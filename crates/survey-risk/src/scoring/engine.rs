use std::collections::HashMap;

use super::domain::{Answer, QuestionMeta, RiskResult, TopicMeta, TopicScore};
use super::rules::{risk_level_from_score, score_for_question};

#[derive(Debug, Default, Clone, Copy)]
struct TopicAccumulator {
    sum: u32,
    count: u32,
}

impl TopicAccumulator {
    fn mean(self) -> u8 {
        if self.count == 0 {
            return 0;
        }
        round_score(f64::from(self.sum) / f64::from(self.count))
    }
}

/// Score a set of answers against caller-supplied metadata.
///
/// Answers referencing unknown questions are skipped, as are questions whose
/// topic is not listed. Topics without answers score 0 and still count toward
/// the global score at their configured weight. The global score is 0 when the
/// weights sum to zero.
pub fn calculate_risk(
    answers: &[Answer],
    questions: &[QuestionMeta],
    topics: &[TopicMeta],
) -> RiskResult {
    let question_index = index_questions(questions);

    // Duplicate topic ids share the accumulator of their first occurrence.
    let mut slots: HashMap<u32, usize> = HashMap::with_capacity(topics.len());
    for (position, topic) in topics.iter().enumerate() {
        slots.entry(topic.id).or_insert(position);
    }
    let mut accumulators = vec![TopicAccumulator::default(); topics.len()];

    for answer in answers {
        let Some(question) = question_index.get(answer.question_id.as_str()) else {
            continue;
        };
        let Some(&slot) = slots.get(&question.topic_id) else {
            continue;
        };
        let accumulator = &mut accumulators[slot];
        accumulator.sum += u32::from(score_for_question(answer.value, question.polarity));
        accumulator.count += 1;
    }

    let topic_scores: Vec<TopicScore> = topics
        .iter()
        .map(|topic| {
            let slot = slots.get(&topic.id).copied().unwrap_or_default();
            TopicScore {
                topic_id: topic.id,
                name: topic.name.clone(),
                score: accumulators[slot].mean(),
            }
        })
        .collect();

    let global_score = weighted_global_score(topics, &topic_scores);

    RiskResult {
        global_score,
        risk_level: risk_level_from_score(global_score),
        topic_scores,
    }
}

/// Number of answers `calculate_risk` will ignore: unknown question, or a
/// question whose topic is not listed.
pub fn unmatched_answers(
    answers: &[Answer],
    questions: &[QuestionMeta],
    topics: &[TopicMeta],
) -> usize {
    let question_index = index_questions(questions);
    answers
        .iter()
        .filter(|answer| match question_index.get(answer.question_id.as_str()) {
            Some(question) => !topics.iter().any(|topic| topic.id == question.topic_id),
            None => true,
        })
        .count()
}

fn index_questions(questions: &[QuestionMeta]) -> HashMap<&str, &QuestionMeta> {
    let mut index = HashMap::with_capacity(questions.len());
    for question in questions {
        index.entry(question.id.as_str()).or_insert(question);
    }
    index
}

fn weighted_global_score(topics: &[TopicMeta], topic_scores: &[TopicScore]) -> u8 {
    let (weighted_sum, total_weight) = topics.iter().zip(topic_scores).fold(
        (0.0_f64, 0.0_f64),
        |(weighted_sum, total_weight), (topic, score)| {
            (
                weighted_sum + f64::from(score.score) * topic.weight,
                total_weight + topic.weight,
            )
        },
    );

    if total_weight <= 0.0 || !total_weight.is_finite() {
        return 0;
    }
    round_score(weighted_sum / total_weight)
}

fn round_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
