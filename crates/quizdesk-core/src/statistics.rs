//! Aggregate statistics over attempt history.
//!
//! Best scores are `None` when there is no data, while averages of an empty
//! set are `0`. Callers use the difference to decide between "no attempts
//! yet" and a real 0%.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::model::{Class, Quiz, QuizAttempt};

/// The score a class is expected to reach on average.
pub const TARGET_SCORE: u8 = 70;

/// Whether `score` reaches [`TARGET_SCORE`].
pub fn meets_target(score: u8) -> bool {
    score >= TARGET_SCORE
}

/// Highest score a student reached on a quiz, or `None` if they never took it.
pub fn best_score(attempts: &[QuizAttempt], student_id: &str, quiz_id: &str) -> Option<u8> {
    attempts
        .iter()
        .filter(|a| a.student_id == student_id && a.quiz_id == quiz_id)
        .map(|a| a.score)
        .max()
}

/// Mean of `scores` rounded half-up, or 0 for an empty set.
pub fn average_score<I>(scores: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let (sum, n) = scores
        .into_iter()
        .fold((0u64, 0u64), |(sum, n), s| (sum + u64::from(s), n + 1));
    if n == 0 {
        return 0;
    }
    ((2 * sum + n) / (2 * n)) as u8
}

/// The most recent attempt, if any.
pub fn latest_attempt<'a, I>(attempts: I) -> Option<&'a QuizAttempt>
where
    I: IntoIterator<Item = &'a QuizAttempt>,
{
    attempts.into_iter().max_by_key(|a| a.timestamp)
}

/// Accuracy on one topic across a student's attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAccuracy {
    pub topic: String,
    pub correct: usize,
    pub total: usize,
    /// `100 * correct / total`, unrounded.
    pub accuracy: f64,
}

/// Per-topic accuracy for a student, weakest topic first.
///
/// Every (question, answer) pair of every attempt the student made is grouped
/// by the question's topic. Topics with equal accuracy keep the order in which
/// they were first encountered. Attempts whose questions can't be resolved
/// are skipped.
pub fn topic_accuracy(student_id: &str, dataset: &Dataset) -> Vec<TopicAccuracy> {
    let mut stats: Vec<TopicAccuracy> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for attempt in dataset.attempts_for_student(student_id) {
        let Some(questions) = dataset.attempt_questions(attempt) else {
            tracing::debug!(attempt = %attempt.id, "skipping attempt with unknown questions");
            continue;
        };
        for (i, question) in questions.iter().enumerate() {
            let topic = question.topic_or_default();
            let slot = *index.entry(topic.to_string()).or_insert_with(|| {
                stats.push(TopicAccuracy {
                    topic: topic.to_string(),
                    correct: 0,
                    total: 0,
                    accuracy: 0.0,
                });
                stats.len() - 1
            });
            let entry = &mut stats[slot];
            entry.total += 1;
            if question.is_correct(attempt.answers.get(i).copied().flatten()) {
                entry.correct += 1;
            }
        }
    }

    for entry in &mut stats {
        entry.accuracy = 100.0 * entry.correct as f64 / entry.total as f64;
    }
    // sort_by is stable, so ties keep encounter order.
    stats.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
    stats
}

/// Attempt count and average for one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub quiz_id: String,
    pub quiz_name: String,
    pub question_count: usize,
    pub visible: bool,
    pub attempt_count: usize,
    pub average_score: u8,
}

pub fn quiz_summary(quiz: &Quiz, attempts: &[QuizAttempt]) -> QuizSummary {
    let scores: Vec<u8> = attempts
        .iter()
        .filter(|a| a.quiz_id == quiz.id)
        .map(|a| a.score)
        .collect();
    QuizSummary {
        quiz_id: quiz.id.clone(),
        quiz_name: quiz.name.clone(),
        question_count: quiz.questions.len(),
        visible: quiz.visible,
        attempt_count: scores.len(),
        average_score: average_score(scores),
    }
}

/// Aggregate figures for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub class_id: String,
    pub class_name: String,
    pub total_students: usize,
    pub total_quizzes: usize,
    /// Quizzes currently visible to students.
    pub active_quizzes: usize,
    pub total_questions: usize,
    pub total_attempts: usize,
    /// Average over every attempt on the class's quizzes.
    pub average_score: u8,
    pub per_quiz: Vec<QuizSummary>,
}

pub fn class_summary(class: &Class, dataset: &Dataset) -> ClassSummary {
    let quizzes = dataset.quizzes_for_class(&class.id);
    let scores: Vec<u8> = dataset
        .attempts
        .iter()
        .filter(|a| quizzes.iter().any(|q| q.id == a.quiz_id))
        .map(|a| a.score)
        .collect();

    ClassSummary {
        class_id: class.id.clone(),
        class_name: class.name.clone(),
        total_students: class.student_ids.len(),
        total_quizzes: quizzes.len(),
        active_quizzes: quizzes.iter().filter(|q| q.visible).count(),
        total_questions: quizzes.iter().map(|q| q.questions.len()).sum(),
        total_attempts: scores.len(),
        average_score: average_score(scores),
        per_quiz: quizzes
            .iter()
            .map(|q| quiz_summary(q, &dataset.attempts))
            .collect(),
    }
}

/// A student's standing on one quiz available to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentQuizStatus {
    pub quiz_id: String,
    pub quiz_name: String,
    pub class_name: String,
    pub question_count: usize,
    pub best_score: Option<u8>,
    pub attempt_count: usize,
}

/// Everything the student dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentOverview {
    pub student_id: String,
    pub attempt_count: usize,
    /// Average over all of the student's attempts, practice included.
    pub average_score: u8,
    pub quizzes: Vec<StudentQuizStatus>,
}

pub fn student_overview(student_id: &str, dataset: &Dataset) -> StudentOverview {
    let attempts = dataset.attempts_for_student(student_id);
    let quizzes = dataset
        .visible_quizzes_for_student(student_id)
        .into_iter()
        .map(|quiz| StudentQuizStatus {
            quiz_id: quiz.id.clone(),
            quiz_name: quiz.name.clone(),
            class_name: dataset
                .class(&quiz.class_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            question_count: quiz.questions.len(),
            best_score: best_score(&dataset.attempts, student_id, &quiz.id),
            attempt_count: attempts.iter().filter(|a| a.quiz_id == quiz.id).count(),
        })
        .collect();

    StudentOverview {
        student_id: student_id.to_string(),
        attempt_count: attempts.len(),
        average_score: average_score(attempts.iter().map(|a| a.score)),
        quizzes,
    }
}

/// Orderings offered by the quiz manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizSort {
    /// Alphabetical, case-insensitive.
    #[default]
    Name,
    /// Most questions first.
    Questions,
    /// Most attempts first.
    Attempts,
}

pub fn sort_quizzes<'a>(
    mut quizzes: Vec<&'a Quiz>,
    sort: QuizSort,
    attempts: &[QuizAttempt],
) -> Vec<&'a Quiz> {
    match sort {
        QuizSort::Name => quizzes.sort_by_key(|q| q.name.to_lowercase()),
        QuizSort::Questions => quizzes.sort_by_key(|q| Reverse(q.questions.len())),
        QuizSort::Attempts => quizzes.sort_by_key(|q| {
            Reverse(attempts.iter().filter(|a| a.quiz_id == q.id).count())
        }),
    }
    quizzes
}
