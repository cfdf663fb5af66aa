//! Attempt grading.
//!
//! Scores are integer percentages rounded half-up, computed once at
//! submission time and stored on the attempt.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{Question, Quiz, QuizAttempt};

/// Which of a quiz's questions are presented in an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresentationMode {
    /// Every question, in quiz order.
    #[default]
    Full,
    /// Only the listed questions (typically the ones answered wrongly last time).
    IncorrectOnly(Vec<String>),
    /// A single question.
    Single(String),
}

/// Round `100 * correct / total` half-up, as an integer percentage.
///
/// Returns 0 when `total` is 0.
pub fn percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // round(x) == floor(x + 0.5) == floor((200c + t) / 2t)
    let rounded = (200 * correct.min(total) + total) / (2 * total);
    rounded as u8
}

/// Count positions where the answer picks the question's correct option.
///
/// Missing and unanswered positions count as incorrect.
pub fn count_correct(questions: &[Question], answers: &[Option<usize>]) -> usize {
    questions
        .iter()
        .enumerate()
        .filter(|(i, q)| q.is_correct(answers.get(*i).copied().flatten()))
        .count()
}

/// Score a set of answers against the questions they were given for.
pub fn score_answers(questions: &[Question], answers: &[Option<usize>]) -> u8 {
    percentage(count_correct(questions, answers), questions.len())
}

/// The questions shown for `mode`, in quiz order.
pub fn presented_questions(quiz: &Quiz, mode: &PresentationMode) -> Vec<Question> {
    match mode {
        PresentationMode::Full => quiz.questions.clone(),
        PresentationMode::IncorrectOnly(ids) => quiz
            .questions
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect(),
        PresentationMode::Single(id) => quiz
            .questions
            .iter()
            .filter(|q| &q.id == id)
            .cloned()
            .collect(),
    }
}

/// Build the attempt record for a submission.
///
/// `presented` are the questions that were shown, in order, and `answers` is
/// parallel to it. The question list is recorded on the attempt unless the
/// whole of a class quiz was presented.
pub fn grade_attempt(
    quiz: &Quiz,
    presented: &[Question],
    answers: Vec<Option<usize>>,
    student_id: &str,
    submitted_at: DateTime<Utc>,
) -> QuizAttempt {
    let score = score_answers(presented, &answers);

    let whole_quiz = !quiz.is_practice()
        && presented.len() == quiz.questions.len()
        && presented
            .iter()
            .zip(&quiz.questions)
            .all(|(p, q)| p.id == q.id);
    let question_ids = if whole_quiz {
        Vec::new()
    } else {
        presented.iter().map(|q| q.id.clone()).collect()
    };

    QuizAttempt {
        id: format!("attempt-{}", Uuid::new_v4()),
        student_id: student_id.to_string(),
        quiz_id: quiz.id.clone(),
        question_ids,
        answers,
        score,
        timestamp: submitted_at,
    }
}

/// Recompute an attempt's score from its stored answers.
pub fn rescore(attempt: &QuizAttempt, presented: &[Question]) -> u8 {
    score_answers(presented, &attempt.answers)
}

/// Ids of the questions answered wrongly (or left unanswered) in an attempt.
pub fn incorrect_question_ids(presented: &[Question], attempt: &QuizAttempt) -> Vec<String> {
    presented
        .iter()
        .enumerate()
        .filter(|(i, q)| !q.is_correct(attempt.answers.get(*i).copied().flatten()))
        .map(|(_, q)| q.id.clone())
        .collect()
}
