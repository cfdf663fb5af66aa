//! The `quizdesk grade` command.
//!
//! Grades a submission against the dataset in memory. The dataset file is
//! never rewritten.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizdesk_core::engine::{EngineConfig, QuizEngine};
use quizdesk_core::scoring::{self, PresentationMode};
use quizdesk_core::ValidationError;

pub fn execute(
    dataset_path: PathBuf,
    student_id: String,
    quiz_id: String,
    answers: String,
    retry: bool,
) -> Result<()> {
    let dataset = super::load_dataset(&dataset_path)?;
    let mut engine = QuizEngine::new(dataset, EngineConfig::default());

    let mode = if retry {
        engine.retry_incorrect(&student_id, &quiz_id)?
    } else {
        PresentationMode::Full
    };
    let answers = parse_answers(&answers)?;

    let attempt = engine.submit_attempt(&student_id, &quiz_id, &mode, answers)?;
    let quiz = engine
        .dataset()
        .quiz(&quiz_id)
        .ok_or_else(|| ValidationError::QuizNotFound(quiz_id.clone()))?;
    let presented = scoring::presented_questions(quiz, &mode);
    let correct = scoring::count_correct(&presented, &attempt.answers);

    println!(
        "Score: {}% ({correct}/{} correct)",
        attempt.score,
        presented.len()
    );
    for (i, question) in presented.iter().enumerate() {
        let answer = attempt.answers.get(i).copied().flatten();
        let mark = if question.is_correct(answer) { "ok" } else { "wrong" };
        println!("\n{}. {} [{mark}]", i + 1, question.text);
        if !question.is_correct(answer) {
            println!(
                "   correct answer: {}",
                question.option_label(question.correct_answer).unwrap_or_default()
            );
        }
        if let Some(explanation) = &question.explanation {
            println!("   {explanation}");
        }
    }
    println!("\n(not saved: {} is unchanged)", dataset_path.display());

    Ok(())
}

/// Parse `1,3,-` style answers. `-`, `-1` and blanks are unanswered.
fn parse_answers(raw: &str) -> Result<Vec<Option<usize>>> {
    raw.split(',')
        .map(str::trim)
        .map(|part| match part {
            "" | "-" | "-1" => Ok(None),
            index => index
                .parse::<usize>()
                .map(Some)
                .with_context(|| format!("invalid answer: {index}")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers() {
        assert_eq!(
            parse_answers("1, 3,-,,-1").unwrap(),
            vec![Some(1), Some(3), None, None, None]
        );
        assert!(parse_answers("1,x").is_err());
    }
}
