//! Per-attempt results sheet.
//!
//! One row per presented question, a blank line, then `Score` and `Date`
//! summary rows.

use std::io::Write;
use std::path::{Path, PathBuf};

use ::csv::{Terminator, WriterBuilder};
use anyhow::{Context, Result};

use quizdesk_core::model::{Question, Quiz, QuizAttempt};

/// Shown in place of an option label for unanswered questions.
pub const NOT_ANSWERED: &str = "Not answered";

const HEADER: [&str; 4] = ["Question", "Your Answer", "Correct Answer", "Result"];

/// One question of an attempt, as shown in the results sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub question: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub correct: bool,
}

impl ResultRow {
    fn result_label(&self) -> &'static str {
        if self.correct {
            "Correct"
        } else {
            "Incorrect"
        }
    }
}

/// Build the rows for an attempt. `questions` are the ones presented, in order.
pub fn results_rows(questions: &[Question], attempt: &QuizAttempt) -> Vec<ResultRow> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = attempt.answers.get(i).copied().flatten();
            ResultRow {
                question: q.text.clone(),
                your_answer: answer
                    .and_then(|a| q.option_label(a))
                    .unwrap_or(NOT_ANSWERED)
                    .to_string(),
                correct_answer: q
                    .option_label(q.correct_answer)
                    .unwrap_or_default()
                    .to_string(),
                correct: q.is_correct(answer),
            }
        })
        .collect()
}

/// Write the results sheet for an attempt.
pub fn write_results_csv<W: Write>(
    mut writer: W,
    questions: &[Question],
    attempt: &QuizAttempt,
) -> Result<()> {
    {
        let mut table = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut writer);
        table.write_record(HEADER)?;
        for row in results_rows(questions, attempt) {
            table.write_record([
                row.question.as_str(),
                row.your_answer.as_str(),
                row.correct_answer.as_str(),
                row.result_label(),
            ])?;
        }
        table.flush()?;
    }

    writer.write_all(b"\n")?;

    let mut summary = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(&mut writer);
    let score = format!("{}%", attempt.score);
    let date = attempt.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    summary.write_record(["Score", score.as_str()])?;
    summary.write_record(["Date", date.as_str()])?;
    summary.flush()?;
    Ok(())
}

/// File name of a quiz's results sheet.
pub fn results_file_name(quiz: &Quiz) -> String {
    let name: String = quiz
        .name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{name}_results.csv")
}

/// Write the results sheet into `dir`, returning the file's path.
pub fn write_results_file(
    dir: &Path,
    quiz: &Quiz,
    questions: &[Question],
    attempt: &QuizAttempt,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    let path = dir.join(results_file_name(quiz));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_results_csv(std::io::BufWriter::new(file), questions, attempt)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
