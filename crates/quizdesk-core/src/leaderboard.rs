//! Per-quiz leaderboards.
//!
//! Each student is represented by their single best attempt. Among attempts
//! tying at a student's best score, the earliest one counts. Entries rank by
//! score, highest first, then by submission time, earliest first.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuizAttempt, User};

/// Name shown for attempts whose student no longer exists.
pub const UNKNOWN_STUDENT: &str = "Unknown";

/// Marker for the top three places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// The medal awarded at a zero-based position, if any.
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Medal::Gold => write!(f, "gold"),
            Medal::Silver => write!(f, "silver"),
            Medal::Bronze => write!(f, "bronze"),
        }
    }
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Zero-based rank.
    pub position: usize,
    pub student_id: String,
    pub student_name: String,
    /// The attempt that earned this place.
    pub attempt_id: String,
    pub score: u8,
    pub timestamp: DateTime<Utc>,
    pub medal: Option<Medal>,
}

/// Reduce attempts to one best attempt per student, keyed by student id.
fn best_per_student<'a>(attempts: impl IntoIterator<Item = &'a QuizAttempt>) -> Vec<&'a QuizAttempt> {
    let mut best: HashMap<&str, &QuizAttempt> = HashMap::new();
    for attempt in attempts {
        best.entry(attempt.student_id.as_str())
            .and_modify(|current| {
                let better = attempt.score > current.score
                    || (attempt.score == current.score && attempt.timestamp < current.timestamp);
                if better {
                    *current = attempt;
                }
            })
            .or_insert(attempt);
    }
    best.into_values().collect()
}

/// Rank the attempts of one quiz.
///
/// Attempts for other quizzes are ignored, so the whole attempt history can be
/// passed in.
pub fn rank_quiz(quiz_id: &str, attempts: &[QuizAttempt], users: &[User]) -> Vec<LeaderboardEntry> {
    let mut best = best_per_student(attempts.iter().filter(|a| a.quiz_id == quiz_id));
    // Student id as the last key keeps the order total when score and time tie.
    best.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.timestamp.cmp(&b.timestamp))
            .then_with(|| a.student_id.cmp(&b.student_id))
    });

    best.into_iter()
        .enumerate()
        .map(|(position, attempt)| LeaderboardEntry {
            position,
            student_id: attempt.student_id.clone(),
            student_name: users
                .iter()
                .find(|u| u.id == attempt.student_id)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| UNKNOWN_STUDENT.to_string()),
            attempt_id: attempt.id.clone(),
            score: attempt.score,
            timestamp: attempt.timestamp,
            medal: Medal::for_position(position),
        })
        .collect()
}
