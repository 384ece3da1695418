use clap::Args;
use std::path::PathBuf;
use survey_risk::config::DEFAULT_FREE_TEST_QUESTIONS_PER_TOPIC;
use survey_risk::error::AppError;
use survey_risk::scoring::{unmatched_answers, Answer, RiskResult, SurveyMetadata};
use survey_risk::surveys::{read_answers_from_path, FreeTest, FreeTestQuestion};

const NEUTRAL_ANSWER: i32 = 3;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export with `questionId,value` columns
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// JSON catalog with `topics` and `questions` (defaults to the standard table)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FreeTestArgs {
    /// Answer (1-5) for the next question, in questionnaire order. Repeat per question;
    /// unanswered questions default to 3.
    #[arg(long = "value")]
    pub(crate) values: Vec<i32>,
    /// Questions taken from each topic
    #[arg(long, default_value_t = DEFAULT_FREE_TEST_QUESTIONS_PER_TOPIC)]
    pub(crate) per_topic: usize,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { answers, catalog } = args;

    let metadata = match &catalog {
        Some(path) => SurveyMetadata::from_path(path)?,
        None => SurveyMetadata::standard(),
    };
    let answers = read_answers_from_path(&answers)?;
    let result = metadata.score(&answers);

    println!("Survey risk score");
    match &catalog {
        Some(path) => println!("Catalog: {}", path.display()),
        None => println!("Catalog: standard table (no catalog provided)"),
    }
    println!(
        "Answers: {} read, {} ignored (unknown question or topic)",
        answers.len(),
        unmatched_answers(&answers, &metadata.questions, &metadata.topics)
    );
    render_result(&result);

    Ok(())
}

pub(crate) fn run_free_test(args: FreeTestArgs) -> Result<(), AppError> {
    let free_test = FreeTest::from_metadata(&SurveyMetadata::standard(), args.per_topic.max(1));
    let questions = free_test.questions();
    let answers = free_test_answers(&questions, &args.values);

    println!("Free risk test ({} questions)", questions.len());
    let mut current_topic = None;
    for (question, answer) in questions.iter().zip(&answers) {
        if current_topic != Some(question.topic_id) {
            println!("\n{}", question.topic_name);
            current_topic = Some(question.topic_id);
        }
        println!(
            "- [{}] {} ({}) -> {}",
            question.id,
            question.text,
            question.polarity.label(),
            answer.value
        );
    }

    let result = free_test.score(&answers);
    println!();
    render_result(&result);
    println!("\nThis preview uses a reduced questionnaire; the full survey covers every question.");

    Ok(())
}

/// Pairs supplied values with questions in order, padding with a neutral answer.
pub(crate) fn free_test_answers(questions: &[FreeTestQuestion], values: &[i32]) -> Vec<Answer> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let value = values.get(index).copied().unwrap_or(NEUTRAL_ANSWER);
            Answer::new(question.id.clone(), value)
        })
        .collect()
}

fn render_result(result: &RiskResult) {
    println!(
        "Global risk score: {} ({})",
        result.global_score,
        result.risk_level.label()
    );
    println!("\nTopic scores");
    for topic in &result.topic_scores {
        println!(
            "- {}: {} ({})",
            topic.name,
            topic.score,
            survey_risk::scoring::risk_level_from_score(topic.score).label()
        );
    }
}
