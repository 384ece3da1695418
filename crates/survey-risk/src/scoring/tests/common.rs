use crate::scoring::domain::{Answer, Polarity, QuestionMeta, TopicMeta};

pub(super) fn topic(id: u32, name: &str, weight: f64) -> TopicMeta {
    TopicMeta::new(id, name, weight)
}

pub(super) fn negative(id: &str, topic_id: u32) -> QuestionMeta {
    QuestionMeta::new(id, topic_id, Polarity::Negative)
}

pub(super) fn positive(id: &str, topic_id: u32) -> QuestionMeta {
    QuestionMeta::new(id, topic_id, Polarity::Positive)
}

pub(super) fn answer(question_id: &str, value: i32) -> Answer {
    Answer::new(question_id, value)
}

/// Single topic "A" with weight 1 and one question `Q1` of the given polarity.
pub(super) fn single_question(polarity: Polarity) -> (Vec<TopicMeta>, Vec<QuestionMeta>) {
    (
        vec![topic(1, "A", 1.0)],
        vec![QuestionMeta::new("Q1", 1, polarity)],
    )
}

/// Two negative-polarity topics, three questions each.
pub(super) fn two_topics(weight_a: f64, weight_b: f64) -> (Vec<TopicMeta>, Vec<QuestionMeta>) {
    let topics = vec![topic(1, "A", weight_a), topic(2, "B", weight_b)];
    let questions = vec![
        negative("A1", 1),
        negative("A2", 1),
        negative("A3", 1),
        negative("B1", 2),
        negative("B2", 2),
        negative("B3", 2),
    ];
    (topics, questions)
}
