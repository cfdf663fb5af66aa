//! The quiz engine facade.
//!
//! [`QuizEngine`] holds the current dataset snapshot and exposes the actions
//! of the admin, teacher and student dashboards. Every action names the
//! acting user, is checked before anything changes, and on success swaps in
//! the next snapshot. A rejected action leaves the dataset as it was.

use chrono::Utc;

use crate::config::{PracticeConfig, QuizdeskConfig};
use crate::dataset::Dataset;
use crate::error::ValidationError;
use crate::leaderboard::{self, LeaderboardEntry};
use crate::model::{Question, Quiz, QuizAttempt, Role, User};
use crate::practice::{self, PracticeMode, PracticeSet, RandomSource};
use crate::scoring::{self, PresentationMode};
use crate::statistics::{self, ClassSummary, StudentOverview, TopicAccuracy};

/// Configuration for the quiz engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub practice: PracticeConfig,
}

impl From<&QuizdeskConfig> for EngineConfig {
    fn from(config: &QuizdeskConfig) -> Self {
        Self {
            practice: config.practice.clone(),
        }
    }
}

type Outcome<T> = Result<T, ValidationError>;

/// Log a rejected action and hand the error back.
fn rejected(action: &str, actor_id: &str, error: ValidationError) -> ValidationError {
    tracing::warn!(action, actor = actor_id, error = %error, "rejected");
    error
}

/// Check a submission against the questions that were presented.
fn check_answers(presented: &[Question], answers: &[Option<usize>]) -> Outcome<()> {
    if answers.len() != presented.len() {
        return Err(ValidationError::AnswerCountMismatch {
            expected: presented.len(),
            actual: answers.len(),
        });
    }
    let unanswered = answers.iter().filter(|a| a.is_none()).count();
    if unanswered > 0 {
        return Err(ValidationError::UnansweredQuestions { count: unanswered });
    }
    for (question, answer) in presented.iter().zip(answers) {
        if let Some(index) = *answer {
            if index >= question.options.len() {
                return Err(ValidationError::InvalidOption {
                    question_id: question.id.clone(),
                    index,
                });
            }
        }
    }
    Ok(())
}

/// The central quiz engine.
pub struct QuizEngine {
    dataset: Dataset,
    config: EngineConfig,
}

impl QuizEngine {
    pub fn new(dataset: Dataset, config: EngineConfig) -> Self {
        Self { dataset, config }
    }

    /// The current snapshot.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn require(&self, actor_id: &str, roles: &[Role]) -> Outcome<&User> {
        let user = self
            .dataset
            .user(actor_id)
            .ok_or_else(|| ValidationError::UserNotFound(actor_id.to_string()))?;
        if !roles.contains(&user.role) {
            return Err(ValidationError::NotPermitted(user.role));
        }
        Ok(user)
    }

    /// Admins manage every class; teachers only their own.
    fn require_class_manager(&self, actor_id: &str, class_id: &str) -> Outcome<()> {
        let actor = self.require(actor_id, &[Role::Admin, Role::Teacher])?;
        let class = self
            .dataset
            .class(class_id)
            .ok_or_else(|| ValidationError::ClassNotFound(class_id.to_string()))?;
        if actor.role == Role::Teacher && class.teacher_id != actor.id {
            return Err(ValidationError::NotPermitted(Role::Teacher));
        }
        Ok(())
    }

    fn require_quiz_manager(&self, actor_id: &str, quiz_id: &str) -> Outcome<&Quiz> {
        let quiz = self
            .dataset
            .quiz(quiz_id)
            .ok_or_else(|| ValidationError::QuizNotFound(quiz_id.to_string()))?;
        self.require_class_manager(actor_id, &quiz.class_id)?;
        Ok(quiz)
    }

    /// Swap in `next` on success; log and pass the error through otherwise.
    fn apply(&mut self, action: &str, actor_id: &str, next: Outcome<Dataset>) -> Outcome<()> {
        match next {
            Ok(dataset) => {
                self.dataset = dataset;
                tracing::info!(action, actor = actor_id, "applied");
                Ok(())
            }
            Err(e) => Err(rejected(action, actor_id, e)),
        }
    }

    fn last_user_id(&self) -> String {
        self.dataset
            .users
            .last()
            .map(|u| u.id.clone())
            .unwrap_or_default()
    }

    fn last_quiz_id(&self) -> String {
        self.dataset
            .quizzes
            .last()
            .map(|q| q.id.clone())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    /// Add a teacher, returning the new user's id.
    pub fn add_teacher(&mut self, admin_id: &str, name: &str, email: &str) -> Outcome<String> {
        self.require(admin_id, &[Role::Admin])?;
        let next = self.dataset.add_user(name, email, Role::Teacher);
        self.apply("add_teacher", admin_id, next)?;
        Ok(self.last_user_id())
    }

    /// Add a student, returning the new user's id.
    pub fn add_student(&mut self, admin_id: &str, name: &str, email: &str) -> Outcome<String> {
        self.require(admin_id, &[Role::Admin])?;
        let next = self.dataset.add_user(name, email, Role::Student);
        self.apply("add_student", admin_id, next)?;
        Ok(self.last_user_id())
    }

    pub fn delete_user(&mut self, admin_id: &str, user_id: &str) -> Outcome<()> {
        self.require(admin_id, &[Role::Admin])?;
        if admin_id == user_id {
            return Err(rejected("delete_user", admin_id, ValidationError::CannotDeleteSelf));
        }
        let next = self.dataset.delete_user(user_id);
        self.apply("delete_user", admin_id, next)
    }

    /// Create a class, returning its id.
    pub fn add_class(&mut self, admin_id: &str, name: &str, teacher_id: &str) -> Outcome<String> {
        self.require(admin_id, &[Role::Admin])?;
        let next = self.dataset.add_class(name, teacher_id);
        self.apply("add_class", admin_id, next)?;
        Ok(self
            .dataset
            .classes
            .last()
            .map(|c| c.id.clone())
            .unwrap_or_default())
    }

    pub fn delete_class(&mut self, admin_id: &str, class_id: &str) -> Outcome<()> {
        self.require(admin_id, &[Role::Admin])?;
        let next = self.dataset.delete_class(class_id);
        self.apply("delete_class", admin_id, next)
    }

    // -----------------------------------------------------------------------
    // Teacher
    // -----------------------------------------------------------------------

    pub fn enroll_student(&mut self, actor_id: &str, class_id: &str, student_id: &str) -> Outcome<()> {
        self.require_class_manager(actor_id, class_id)?;
        let next = self.dataset.enroll_student(class_id, student_id);
        self.apply("enroll_student", actor_id, next)
    }

    pub fn unenroll_student(
        &mut self,
        actor_id: &str,
        class_id: &str,
        student_id: &str,
    ) -> Outcome<()> {
        self.require_class_manager(actor_id, class_id)?;
        let next = self.dataset.unenroll_student(class_id, student_id);
        self.apply("unenroll_student", actor_id, next)
    }

    /// Create a quiz in one of the actor's classes, returning its id.
    pub fn create_quiz(
        &mut self,
        actor_id: &str,
        class_id: &str,
        name: &str,
        questions: Vec<Question>,
    ) -> Outcome<String> {
        self.require_class_manager(actor_id, class_id)?;
        let next = self.dataset.create_quiz(class_id, name, questions, actor_id);
        self.apply("create_quiz", actor_id, next)?;
        Ok(self.last_quiz_id())
    }

    /// Duplicate a quiz, returning the copy's id.
    pub fn duplicate_quiz(&mut self, actor_id: &str, quiz_id: &str) -> Outcome<String> {
        self.require_quiz_manager(actor_id, quiz_id)?;
        let next = self.dataset.duplicate_quiz(quiz_id, actor_id);
        self.apply("duplicate_quiz", actor_id, next)?;
        Ok(self.last_quiz_id())
    }

    /// Flip a quiz's visibility, returning the new value.
    pub fn toggle_quiz_visibility(&mut self, actor_id: &str, quiz_id: &str) -> Outcome<bool> {
        self.require_quiz_manager(actor_id, quiz_id)?;
        let next = self.dataset.toggle_quiz_visibility(quiz_id);
        self.apply("toggle_quiz_visibility", actor_id, next)?;
        Ok(self.dataset.quiz(quiz_id).is_some_and(|q| q.visible))
    }

    pub fn delete_quiz(&mut self, actor_id: &str, quiz_id: &str) -> Outcome<()> {
        self.require_quiz_manager(actor_id, quiz_id)?;
        let next = self.dataset.delete_quiz(quiz_id);
        self.apply("delete_quiz", actor_id, next)
    }

    pub fn class_summary(&self, actor_id: &str, class_id: &str) -> Outcome<ClassSummary> {
        self.require_class_manager(actor_id, class_id)?;
        let class = self
            .dataset
            .class(class_id)
            .ok_or_else(|| ValidationError::ClassNotFound(class_id.to_string()))?;
        Ok(statistics::class_summary(class, &self.dataset))
    }

    /// A quiz's leaderboard. Students only see boards of quizzes visible to them.
    pub fn leaderboard(&self, actor_id: &str, quiz_id: &str) -> Outcome<Vec<LeaderboardEntry>> {
        let actor = self.require(actor_id, &[Role::Admin, Role::Teacher, Role::Student])?;
        let quiz = self
            .dataset
            .quiz(quiz_id)
            .ok_or_else(|| ValidationError::QuizNotFound(quiz_id.to_string()))?;
        if actor.role == Role::Student && !self.dataset.is_quiz_visible_to(quiz, actor_id) {
            return Err(ValidationError::NotPermitted(Role::Student));
        }
        Ok(leaderboard::rank_quiz(
            quiz_id,
            &self.dataset.attempts,
            &self.dataset.users,
        ))
    }

    // -----------------------------------------------------------------------
    // Student
    // -----------------------------------------------------------------------

    pub fn available_quizzes(&self, student_id: &str) -> Outcome<Vec<&Quiz>> {
        self.require(student_id, &[Role::Student])?;
        Ok(self.dataset.visible_quizzes_for_student(student_id))
    }

    /// Grade and record a submission of a class quiz.
    ///
    /// `answers` is parallel to the questions `mode` presents. Every question
    /// must be answered with an existing option.
    pub fn submit_attempt(
        &mut self,
        student_id: &str,
        quiz_id: &str,
        mode: &PresentationMode,
        answers: Vec<Option<usize>>,
    ) -> Outcome<QuizAttempt> {
        self.require(student_id, &[Role::Student])?;
        let quiz = self
            .dataset
            .quiz(quiz_id)
            .ok_or_else(|| ValidationError::QuizNotFound(quiz_id.to_string()))?;
        let presented = if self.dataset.is_quiz_visible_to(quiz, student_id) {
            scoring::presented_questions(quiz, mode)
        } else {
            return Err(rejected(
                "submit_attempt",
                student_id,
                ValidationError::NotPermitted(Role::Student),
            ));
        };
        let checked = if presented.is_empty() {
            Err(ValidationError::EmptyQuiz)
        } else {
            check_answers(&presented, &answers)
        };
        checked.map_err(|e| rejected("submit_attempt", student_id, e))?;

        let attempt = scoring::grade_attempt(quiz, &presented, answers, student_id, Utc::now());
        tracing::info!(
            quiz = quiz_id,
            student = student_id,
            score = attempt.score,
            questions = presented.len(),
            "attempt recorded"
        );
        self.dataset = self.dataset.record_attempt(attempt.clone());
        Ok(attempt)
    }

    /// Pick a practice set from every quiz visible to the student.
    pub fn start_practice(
        &self,
        student_id: &str,
        mode: PracticeMode,
        rng: &mut dyn RandomSource,
    ) -> Outcome<PracticeSet> {
        self.require(student_id, &[Role::Student])?;
        if mode == PracticeMode::Custom(0) {
            return Err(ValidationError::InvalidQuestionCount);
        }
        let pool = practice::question_pool(self.dataset.visible_quizzes_for_student(student_id));
        if pool.is_empty() {
            return Err(ValidationError::EmptyQuestionPool);
        }

        let stats = match mode {
            PracticeMode::Smart => statistics::topic_accuracy(student_id, &self.dataset),
            _ => Vec::new(),
        };
        let set = practice::select_practice(&pool, mode, &stats, &self.config.practice, rng);
        tracing::debug!(
            student = student_id,
            mode = %set.mode,
            questions = set.questions.len(),
            weak_topics = ?set.weak_topics,
            "practice set selected"
        );
        Ok(set)
    }

    /// Grade and record a submission of a practice quiz.
    pub fn submit_practice(
        &mut self,
        student_id: &str,
        practice_quiz: &Quiz,
        answers: Vec<Option<usize>>,
    ) -> Outcome<QuizAttempt> {
        self.require(student_id, &[Role::Student])?;
        let checked = if !practice_quiz.is_practice() || practice_quiz.created_by != student_id {
            Err(ValidationError::NotPermitted(Role::Student))
        } else if practice_quiz.questions.is_empty() {
            Err(ValidationError::EmptyQuestionPool)
        } else {
            check_answers(&practice_quiz.questions, &answers)
        };
        checked.map_err(|e| rejected("submit_practice", student_id, e))?;

        let attempt = scoring::grade_attempt(
            practice_quiz,
            &practice_quiz.questions,
            answers,
            student_id,
            Utc::now(),
        );
        tracing::info!(student = student_id, score = attempt.score, "practice attempt recorded");
        self.dataset = self.dataset.record_attempt(attempt.clone());
        Ok(attempt)
    }

    /// The questions to present when retrying what the latest attempt got wrong.
    pub fn retry_incorrect(&self, student_id: &str, quiz_id: &str) -> Outcome<PresentationMode> {
        self.require(student_id, &[Role::Student])?;
        let latest = statistics::latest_attempt(
            self.dataset
                .attempts
                .iter()
                .filter(|a| a.student_id == student_id && a.quiz_id == quiz_id),
        )
        .ok_or_else(|| ValidationError::AttemptNotFound(quiz_id.to_string()))?;
        let presented = self
            .dataset
            .attempt_questions(latest)
            .ok_or_else(|| ValidationError::QuizNotFound(quiz_id.to_string()))?;

        let incorrect = scoring::incorrect_question_ids(&presented, latest);
        if incorrect.is_empty() {
            return Err(ValidationError::NothingToRetry);
        }
        Ok(PresentationMode::IncorrectOnly(incorrect))
    }

    pub fn overview(&self, student_id: &str) -> Outcome<StudentOverview> {
        self.require(student_id, &[Role::Student])?;
        Ok(statistics::student_overview(student_id, &self.dataset))
    }

    pub fn topic_accuracy(&self, student_id: &str) -> Outcome<Vec<TopicAccuracy>> {
        self.require(student_id, &[Role::Student])?;
        Ok(statistics::topic_accuracy(student_id, &self.dataset))
    }
}
