use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::scoring::Answer;

#[derive(Debug, thiserror::Error)]
pub enum AnswerImportError {
    #[error("failed to read answer export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answer CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    #[serde(rename = "questionId", alias = "question_id", alias = "Question ID")]
    question_id: String,
    #[serde(alias = "Value")]
    value: i32,
}

/// Reads `questionId,value` rows. Blank question ids are skipped; values are
/// kept as-is so the engine can clamp them.
pub fn read_answers<R: Read>(reader: R) -> Result<Vec<Answer>, AnswerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut answers = Vec::new();
    for row in csv_reader.deserialize::<AnswerRow>() {
        let row = row?;
        if row.question_id.is_empty() {
            continue;
        }
        answers.push(Answer::new(row.question_id, row.value));
    }
    Ok(answers)
}

pub fn read_answers_from_path(path: impl AsRef<Path>) -> Result<Vec<Answer>, AnswerImportError> {
    let file = File::open(path)?;
    read_answers(file)
}
