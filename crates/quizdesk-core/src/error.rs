//! Validation error types.
//!
//! Every rejected action is reported through [`ValidationError`]. A rejected
//! action never changes the dataset, and the message is meant to be shown to
//! the user as-is.

use thiserror::Error;

use crate::model::Role;

/// Reasons an action on the dataset was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Another user already has this email address.
    #[error("a user with email {0} already exists")]
    DuplicateEmail(String),

    /// The class name is shorter than the minimum.
    #[error("class name must be at least {min} characters")]
    ClassNameTooShort { min: usize },

    /// Another class already has this name.
    #[error("a class named {0} already exists")]
    DuplicateClassName(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("teacher not found: {0}")]
    TeacherNotFound(String),

    #[error("student not found: {0}")]
    StudentNotFound(String),

    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    #[error("attempt not found: {0}")]
    AttemptNotFound(String),

    /// A teacher can't be deleted while they still own classes.
    #[error("teacher {teacher_id} still owns {classes} class(es)")]
    TeacherOwnsClasses { teacher_id: String, classes: usize },

    /// A class can't be deleted while students are enrolled.
    #[error("class {class_id} still has {students} enrolled student(s)")]
    ClassNotEmpty { class_id: String, students: usize },

    #[error("you cannot delete your own account")]
    CannotDeleteSelf,

    #[error("student {student_id} is already enrolled in {class_id}")]
    AlreadyEnrolled { student_id: String, class_id: String },

    #[error("student {student_id} is not enrolled in {class_id}")]
    NotEnrolled { student_id: String, class_id: String },

    /// A quiz needs at least one question.
    #[error("a quiz needs at least one question")]
    EmptyQuiz,

    /// A question in a new quiz is incomplete.
    #[error("question {index}: {reason}")]
    InvalidQuestion { index: usize, reason: String },

    /// Submission was attempted with questions left unanswered.
    #[error("please answer all questions before submitting ({count} unanswered)")]
    UnansweredQuestions { count: usize },

    #[error("expected {expected} answer(s), got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("option {index} does not exist for question {question_id}")]
    InvalidOption { question_id: String, index: usize },

    /// There are no questions to practice with.
    #[error("no questions available for practice")]
    EmptyQuestionPool,

    #[error("question count must be at least 1")]
    InvalidQuestionCount,

    /// The latest attempt was already perfect.
    #[error("all questions were answered correctly, nothing to retry")]
    NothingToRetry,

    /// The acting user's role doesn't allow this action.
    #[error("a {0} is not permitted to do this")]
    NotPermitted(Role),
}

impl ValidationError {
    /// Returns `true` if the action failed because something it referenced is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ValidationError::UserNotFound(_)
                | ValidationError::TeacherNotFound(_)
                | ValidationError::StudentNotFound(_)
                | ValidationError::ClassNotFound(_)
                | ValidationError::QuizNotFound(_)
                | ValidationError::AttemptNotFound(_)
        )
    }
}
