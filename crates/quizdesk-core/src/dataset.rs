//! The in-memory school dataset.
//!
//! A [`Dataset`] holds the four entity collections. Mutations never modify a
//! dataset in place: each returns the next snapshot, or a [`ValidationError`]
//! with the original left untouched, and the caller swaps the new snapshot in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::model::{Class, Question, Quiz, QuizAttempt, Role, User};

/// Minimum length of a class name, after trimming.
pub const MIN_CLASS_NAME_LEN: usize = 3;

/// Users, classes, quizzes and attempts, as one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(default)]
    pub attempts: Vec<QuizAttempt>,
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Key for case-insensitive uniqueness of emails and class names.
pub(crate) fn uniqueness_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = required(email, "email")?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::InvalidEmail(email)),
    }
}

fn validate_question(index: usize, question: &Question) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidQuestion {
        index: index + 1,
        reason: reason.to_string(),
    };
    if question.text.trim().is_empty() {
        return Err(invalid("question text is required"));
    }
    if question.options.len() < 2 {
        return Err(invalid("at least two options are required"));
    }
    if question.options.iter().any(|o| o.trim().is_empty()) {
        return Err(invalid("options cannot be blank"));
    }
    if question.correct_answer >= question.options.len() {
        return Err(invalid("correct answer is out of range"));
    }
    Ok(())
}

impl Dataset {
    pub fn new(
        users: Vec<User>,
        classes: Vec<Class>,
        quizzes: Vec<Quiz>,
        attempts: Vec<QuizAttempt>,
    ) -> Self {
        Self {
            users,
            classes,
            quizzes,
            attempts,
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn class(&self, class_id: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == class_id)
    }

    pub fn quiz(&self, quiz_id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == quiz_id)
    }

    pub fn attempt(&self, attempt_id: &str) -> Option<&QuizAttempt> {
        self.attempts.iter().find(|a| a.id == attempt_id)
    }

    pub fn teachers(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Teacher)
    }

    pub fn students(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Student)
    }

    pub fn classes_for_teacher(&self, teacher_id: &str) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|c| c.teacher_id == teacher_id)
            .collect()
    }

    pub fn classes_for_student(&self, student_id: &str) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|c| c.has_student(student_id))
            .collect()
    }

    pub fn quizzes_for_class(&self, class_id: &str) -> Vec<&Quiz> {
        self.quizzes
            .iter()
            .filter(|q| q.class_id == class_id)
            .collect()
    }

    /// Whether a student may see and take a quiz: it must be visible and
    /// belong to one of the student's classes.
    pub fn is_quiz_visible_to(&self, quiz: &Quiz, student_id: &str) -> bool {
        quiz.visible
            && self
                .class(&quiz.class_id)
                .is_some_and(|c| c.has_student(student_id))
    }

    /// The quizzes a student can see, in dataset order.
    pub fn visible_quizzes_for_student(&self, student_id: &str) -> Vec<&Quiz> {
        self.quizzes
            .iter()
            .filter(|q| self.is_quiz_visible_to(q, student_id))
            .collect()
    }

    pub fn attempts_for_student(&self, student_id: &str) -> Vec<&QuizAttempt> {
        self.attempts
            .iter()
            .filter(|a| a.student_id == student_id)
            .collect()
    }

    pub fn attempts_for_quiz(&self, quiz_id: &str) -> Vec<&QuizAttempt> {
        self.attempts
            .iter()
            .filter(|a| a.quiz_id == quiz_id)
            .collect()
    }

    /// Find a question by id across every quiz.
    pub fn find_question(&self, question_id: &str) -> Option<&Question> {
        self.quizzes
            .iter()
            .find_map(|quiz| quiz.question(question_id))
    }

    /// The questions an attempt was graded against, parallel to its answers.
    ///
    /// Returns `None` if any of them can no longer be found.
    pub fn attempt_questions(&self, attempt: &QuizAttempt) -> Option<Vec<Question>> {
        let quiz = self.quiz(&attempt.quiz_id);
        if attempt.question_ids.is_empty() {
            return quiz.map(|q| q.questions.clone());
        }
        attempt
            .question_ids
            .iter()
            .map(|id| {
                quiz.and_then(|q| q.question(id))
                    .or_else(|| self.find_question(id))
                    .cloned()
            })
            .collect()
    }

    fn require_role(
        &self,
        user_id: &str,
        role: Role,
        missing: fn(String) -> ValidationError,
    ) -> Result<&User, ValidationError> {
        self.user(user_id)
            .filter(|u| u.role == role)
            .ok_or_else(|| missing(user_id.to_string()))
    }

    fn require_class(&self, class_id: &str) -> Result<&Class, ValidationError> {
        self.class(class_id)
            .ok_or_else(|| ValidationError::ClassNotFound(class_id.to_string()))
    }

    fn require_quiz(&self, quiz_id: &str) -> Result<&Quiz, ValidationError> {
        self.quiz(quiz_id)
            .ok_or_else(|| ValidationError::QuizNotFound(quiz_id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Add a user. Emails are unique case-insensitively.
    pub fn add_user(&self, name: &str, email: &str, role: Role) -> Result<Self, ValidationError> {
        let name = required(name, "name")?;
        let email = validate_email(email)?;
        if self
            .users
            .iter()
            .any(|u| uniqueness_key(&u.email) == uniqueness_key(&email))
        {
            return Err(ValidationError::DuplicateEmail(email));
        }

        let mut next = self.clone();
        next.users.push(User {
            id: new_id(&role.to_string()),
            name,
            email,
            role,
        });
        Ok(next)
    }

    /// Delete a user.
    ///
    /// Teachers who still own classes can't be deleted. Deleting a student
    /// also removes them from every class roster; their attempts are kept.
    pub fn delete_user(&self, user_id: &str) -> Result<Self, ValidationError> {
        let user = self
            .user(user_id)
            .ok_or_else(|| ValidationError::UserNotFound(user_id.to_string()))?;

        if user.role == Role::Teacher {
            let owned = self.classes_for_teacher(user_id).len();
            if owned > 0 {
                return Err(ValidationError::TeacherOwnsClasses {
                    teacher_id: user_id.to_string(),
                    classes: owned,
                });
            }
        }

        let mut next = self.clone();
        next.users.retain(|u| u.id != user_id);
        for class in &mut next.classes {
            class.student_ids.retain(|id| id != user_id);
        }
        Ok(next)
    }

    // -----------------------------------------------------------------------
    // Classes
    // -----------------------------------------------------------------------

    /// Create an empty class taught by `teacher_id`.
    pub fn add_class(&self, name: &str, teacher_id: &str) -> Result<Self, ValidationError> {
        let name = required(name, "class name")?;
        if name.chars().count() < MIN_CLASS_NAME_LEN {
            return Err(ValidationError::ClassNameTooShort {
                min: MIN_CLASS_NAME_LEN,
            });
        }
        if self
            .classes
            .iter()
            .any(|c| uniqueness_key(&c.name) == uniqueness_key(&name))
        {
            return Err(ValidationError::DuplicateClassName(name));
        }
        self.require_role(teacher_id, Role::Teacher, ValidationError::TeacherNotFound)?;

        let mut next = self.clone();
        next.classes.push(Class {
            id: new_id("class"),
            name,
            teacher_id: teacher_id.to_string(),
            student_ids: Vec::new(),
        });
        Ok(next)
    }

    /// Delete a class. Only classes with no enrolled students can be deleted.
    pub fn delete_class(&self, class_id: &str) -> Result<Self, ValidationError> {
        let class = self.require_class(class_id)?;
        if !class.student_ids.is_empty() {
            return Err(ValidationError::ClassNotEmpty {
                class_id: class_id.to_string(),
                students: class.student_ids.len(),
            });
        }

        let mut next = self.clone();
        next.classes.retain(|c| c.id != class_id);
        Ok(next)
    }

    pub fn enroll_student(&self, class_id: &str, student_id: &str) -> Result<Self, ValidationError> {
        let class = self.require_class(class_id)?;
        self.require_role(student_id, Role::Student, ValidationError::StudentNotFound)?;
        if class.has_student(student_id) {
            return Err(ValidationError::AlreadyEnrolled {
                student_id: student_id.to_string(),
                class_id: class_id.to_string(),
            });
        }

        let mut next = self.clone();
        if let Some(class) = next.classes.iter_mut().find(|c| c.id == class_id) {
            class.student_ids.push(student_id.to_string());
        }
        Ok(next)
    }

    pub fn unenroll_student(
        &self,
        class_id: &str,
        student_id: &str,
    ) -> Result<Self, ValidationError> {
        let class = self.require_class(class_id)?;
        if !class.has_student(student_id) {
            return Err(ValidationError::NotEnrolled {
                student_id: student_id.to_string(),
                class_id: class_id.to_string(),
            });
        }

        let mut next = self.clone();
        if let Some(class) = next.classes.iter_mut().find(|c| c.id == class_id) {
            class.student_ids.retain(|id| id != student_id);
        }
        Ok(next)
    }

    // -----------------------------------------------------------------------
    // Quizzes
    // -----------------------------------------------------------------------

    /// Create a visible quiz in a class. Questions with a blank id get a fresh one.
    pub fn create_quiz(
        &self,
        class_id: &str,
        name: &str,
        questions: Vec<Question>,
        created_by: &str,
    ) -> Result<Self, ValidationError> {
        self.require_class(class_id)?;
        let name = required(name, "quiz name")?;
        if questions.is_empty() {
            return Err(ValidationError::EmptyQuiz);
        }
        for (index, question) in questions.iter().enumerate() {
            validate_question(index, question)?;
        }

        let questions = questions
            .into_iter()
            .map(|mut q| {
                if q.id.trim().is_empty() {
                    q.id = new_id("q");
                }
                q
            })
            .collect();

        let mut next = self.clone();
        next.quizzes.push(Quiz {
            id: new_id("quiz"),
            class_id: class_id.to_string(),
            name,
            questions,
            visible: true,
            created_by: created_by.to_string(),
        });
        Ok(next)
    }

    /// Copy a quiz into the same class under fresh ids, named "<name> (Copy)".
    pub fn duplicate_quiz(&self, quiz_id: &str, created_by: &str) -> Result<Self, ValidationError> {
        let source = self.require_quiz(quiz_id)?;
        let questions = source
            .questions
            .iter()
            .map(|q| Question {
                id: new_id("q"),
                ..q.clone()
            })
            .collect();

        let mut next = self.clone();
        next.quizzes.push(Quiz {
            id: new_id("quiz"),
            class_id: source.class_id.clone(),
            name: format!("{} (Copy)", source.name),
            questions,
            visible: true,
            created_by: created_by.to_string(),
        });
        Ok(next)
    }

    pub fn toggle_quiz_visibility(&self, quiz_id: &str) -> Result<Self, ValidationError> {
        self.require_quiz(quiz_id)?;
        let mut next = self.clone();
        if let Some(quiz) = next.quizzes.iter_mut().find(|q| q.id == quiz_id) {
            quiz.visible = !quiz.visible;
        }
        Ok(next)
    }

    pub fn delete_quiz(&self, quiz_id: &str) -> Result<Self, ValidationError> {
        self.require_quiz(quiz_id)?;
        let mut next = self.clone();
        next.quizzes.retain(|q| q.id != quiz_id);
        Ok(next)
    }

    // -----------------------------------------------------------------------
    // Attempts
    // -----------------------------------------------------------------------

    /// Append a graded attempt. Existing attempts are never modified.
    pub fn record_attempt(&self, attempt: QuizAttempt) -> Self {
        let mut next = self.clone();
        next.attempts.push(attempt);
        next
    }
}
