//! Core data model types for quizdesk.
//!
//! These are the value records held by a [`Dataset`](crate::dataset::Dataset):
//! users, classes, quizzes with their questions, and quiz attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topic assigned to questions that don't name one.
pub const DEFAULT_TOPIC: &str = "General";

/// Class id used by ephemeral practice quizzes that belong to no class.
pub const PRACTICE_CLASS_ID: &str = "practice";

/// What a user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A person using the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// Role of this user.
    pub role: Role,
}

/// A class taught by one teacher to a roster of students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Unique identifier.
    pub id: String,
    /// Class name, unique case-insensitively.
    pub name: String,
    /// Owning teacher.
    pub teacher_id: String,
    /// Enrolled students, in enrollment order.
    #[serde(default)]
    pub student_ids: Vec<String>,
}

impl Class {
    /// Whether the given student is on this class's roster.
    pub fn has_student(&self, student_id: &str) -> bool {
        self.student_ids.iter().any(|id| id == student_id)
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub id: String,
    /// The prompt shown to the student.
    pub text: String,
    /// Answer options, addressed by index.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer: usize,
    /// Optional explanation shown after grading.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Optional topic used for weak-area detection.
    #[serde(default)]
    pub topic: Option<String>,
}

impl Question {
    /// The question's topic, or [`DEFAULT_TOPIC`] when it has none.
    pub fn topic_or_default(&self) -> &str {
        self.topic.as_deref().unwrap_or(DEFAULT_TOPIC)
    }

    /// Whether `answer` picks the correct option. Unanswered is never correct.
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer)
    }

    /// Label of the option at `index`, if it exists.
    pub fn option_label(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

/// A quiz belonging to a class (or to no class, for practice quizzes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier.
    pub id: String,
    /// Owning class, or [`PRACTICE_CLASS_ID`].
    pub class_id: String,
    /// Human-readable name.
    pub name: String,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Whether students of the class can see and take the quiz.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// The user who created the quiz.
    pub created_by: String,
}

impl Quiz {
    /// Whether this is an ephemeral practice quiz.
    pub fn is_practice(&self) -> bool {
        self.class_id == PRACTICE_CLASS_ID
    }

    /// Look up one of this quiz's questions by id.
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

fn default_true() -> bool {
    true
}

/// One student's submission of a quiz, or of a subset of its questions.
///
/// Attempts are immutable: retries produce new attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    /// Unique identifier.
    pub id: String,
    /// The student who submitted.
    pub student_id: String,
    /// The quiz that was taken.
    pub quiz_id: String,
    /// Ids of the questions presented, in order. Empty means the whole quiz.
    #[serde(default)]
    pub question_ids: Vec<String>,
    /// Chosen option per presented question; `None` is unanswered.
    pub answers: Vec<Option<usize>>,
    /// Percentage score, fixed at submission time.
    pub score: u8,
    /// When the attempt was submitted.
    pub timestamp: DateTime<Utc>,
}
