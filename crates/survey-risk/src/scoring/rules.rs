use super::domain::{Polarity, RiskLevel};

const LIKERT_MIN: i32 = 1;
const LIKERT_MAX: i32 = 5;
const LIKERT_STEP: i32 = 25;

const MODERATE_FLOOR: u8 = 40;
const HIGH_FLOOR: u8 = 70;

/// Maps a Likert answer onto 0-100 in steps of 25 after clamping to 1-5.
pub fn likert_to_percent(value: i32) -> u8 {
    let clamped = value.clamp(LIKERT_MIN, LIKERT_MAX);
    ((clamped - LIKERT_MIN) * LIKERT_STEP) as u8
}

/// Risk contribution of a single answer.
///
/// Negative items report risk directly (5 -> 100). Positive items describe a
/// protective factor, so strong agreement means low risk (5 -> 0).
pub fn score_for_question(value: i32, polarity: Polarity) -> u8 {
    let base = likert_to_percent(value);
    match polarity {
        Polarity::Negative => base,
        Polarity::Positive => 100 - base,
    }
}

/// Each band includes its lower edge: 40 is moderate, 70 is high.
pub fn risk_level_from_score(score: u8) -> RiskLevel {
    if score >= HIGH_FLOOR {
        RiskLevel::High
    } else if score >= MODERATE_FLOOR {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}
