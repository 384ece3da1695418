//! Likert-scale risk scoring.
//!
//! The engine is a pure transformation of answers plus caller-supplied
//! question and topic metadata into a [`RiskResult`]. It holds no catalog of
//! its own and performs no I/O, so every call site (survey submission, the
//! public free test, CLI scoring) produces identical results for identical
//! inputs.

mod domain;
mod engine;
mod rules;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, Polarity, QuestionMeta, RiskLevel, RiskResult, SurveyMetadata, TopicMeta, TopicScore,
};
pub use engine::{calculate_risk, unmatched_answers};
pub use rules::{likert_to_percent, risk_level_from_score, score_for_question};
