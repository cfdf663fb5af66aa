//! TOML dataset loader.
//!
//! Loads school datasets from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::dataset::{uniqueness_key, Dataset};
use crate::model::{Class, Question, Quiz, QuizAttempt, Role, User};
use crate::scoring;

/// Marker for an unanswered question in dataset files.
const UNANSWERED: i64 = -1;

/// Intermediate TOML structure for parsing dataset files.
#[derive(Debug, Deserialize)]
struct TomlDatasetFile {
    #[serde(default)]
    users: Vec<TomlUser>,
    #[serde(default)]
    classes: Vec<TomlClass>,
    #[serde(default)]
    quizzes: Vec<TomlQuiz>,
    #[serde(default)]
    attempts: Vec<TomlAttempt>,
}

#[derive(Debug, Deserialize)]
struct TomlUser {
    id: String,
    name: String,
    email: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct TomlClass {
    id: String,
    name: String,
    teacher_id: String,
    #[serde(default)]
    student_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TomlQuiz {
    id: String,
    class_id: String,
    name: String,
    #[serde(default = "default_true")]
    visible: bool,
    created_by: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    topic: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlAttempt {
    id: String,
    student_id: String,
    quiz_id: String,
    #[serde(default)]
    question_ids: Vec<String>,
    answers: Vec<i64>,
    score: u8,
    timestamp: String,
}

fn default_true() -> bool {
    true
}

fn convert_answer(attempt_id: &str, raw: i64) -> Result<Option<usize>> {
    if raw == UNANSWERED {
        return Ok(None);
    }
    usize::try_from(raw)
        .map(Some)
        .map_err(|_| anyhow::anyhow!("attempt {attempt_id}: invalid answer index {raw}"))
}

fn convert_attempt(a: TomlAttempt) -> Result<QuizAttempt> {
    let timestamp = DateTime::parse_from_rfc3339(&a.timestamp)
        .with_context(|| format!("attempt {}: invalid timestamp {}", a.id, a.timestamp))?
        .with_timezone(&Utc);
    let answers = a
        .answers
        .iter()
        .map(|&raw| convert_answer(&a.id, raw))
        .collect::<Result<Vec<_>>>()?;

    Ok(QuizAttempt {
        id: a.id,
        student_id: a.student_id,
        quiz_id: a.quiz_id,
        question_ids: a.question_ids,
        answers,
        score: a.score,
        timestamp,
    })
}

/// Parse a single TOML file into a `Dataset`.
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, path)
}

/// Parse a TOML string into a `Dataset` (useful for testing).
pub fn parse_dataset_str(content: &str, source_path: &Path) -> Result<Dataset> {
    let parsed: TomlDatasetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let users = parsed
        .users
        .into_iter()
        .map(|u| {
            let role: Role = u
                .role
                .parse()
                .map_err(|e: String| anyhow::anyhow!("user {}: {}", u.id, e))?;
            Ok(User {
                id: u.id,
                name: u.name,
                email: u.email,
                role,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let classes = parsed
        .classes
        .into_iter()
        .map(|c| Class {
            id: c.id,
            name: c.name,
            teacher_id: c.teacher_id,
            student_ids: c.student_ids,
        })
        .collect();

    let quizzes = parsed
        .quizzes
        .into_iter()
        .map(|q| Quiz {
            id: q.id,
            class_id: q.class_id,
            name: q.name,
            questions: q
                .questions
                .into_iter()
                .map(|question| Question {
                    id: question.id,
                    text: question.text,
                    options: question.options,
                    correct_answer: question.correct_answer,
                    explanation: question.explanation,
                    topic: question.topic,
                })
                .collect(),
            visible: q.visible,
            created_by: q.created_by,
        })
        .collect();

    let attempts = parsed
        .attempts
        .into_iter()
        .map(convert_attempt)
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(users, classes, quizzes, attempts))
}

/// Recursively load all `.toml` dataset files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_dataset_directory(dir: &Path) -> Result<Vec<(PathBuf, Dataset)>> {
    let mut datasets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            datasets.extend(load_dataset_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_dataset(&path) {
                Ok(dataset) => datasets.push((path, dataset)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(datasets)
}

/// A warning from dataset validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The offending entity.
    pub entity_id: String,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(entity_id: &str, message: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            message: message.into(),
        }
    }
}

fn duplicates<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Vec<ValidationWarning> {
    let mut seen = HashSet::new();
    ids.filter(|id| !seen.insert(*id))
        .map(|id| ValidationWarning::new(id, format!("duplicate {kind} id: {id}")))
        .collect()
}

/// Validate a dataset for referential and consistency issues.
pub fn validate_dataset(dataset: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    warnings.extend(duplicates("user", dataset.users.iter().map(|u| u.id.as_str())));
    warnings.extend(duplicates("class", dataset.classes.iter().map(|c| c.id.as_str())));
    warnings.extend(duplicates("quiz", dataset.quizzes.iter().map(|q| q.id.as_str())));
    warnings.extend(duplicates(
        "question",
        dataset
            .quizzes
            .iter()
            .flat_map(|q| q.questions.iter().map(|question| question.id.as_str())),
    ));
    warnings.extend(duplicates("attempt", dataset.attempts.iter().map(|a| a.id.as_str())));

    let mut emails = HashSet::new();
    for user in &dataset.users {
        if !emails.insert(uniqueness_key(&user.email)) {
            warnings.push(ValidationWarning::new(
                &user.id,
                format!("duplicate email: {}", user.email),
            ));
        }
    }

    let mut class_names = HashSet::new();
    for class in &dataset.classes {
        if !class_names.insert(uniqueness_key(&class.name)) {
            warnings.push(ValidationWarning::new(
                &class.id,
                format!("duplicate class name: {}", class.name),
            ));
        }
        if !dataset
            .user(&class.teacher_id)
            .is_some_and(|u| u.role == Role::Teacher)
        {
            warnings.push(ValidationWarning::new(
                &class.id,
                format!("teacher {} does not exist", class.teacher_id),
            ));
        }
        for student_id in &class.student_ids {
            if !dataset
                .user(student_id)
                .is_some_and(|u| u.role == Role::Student)
            {
                warnings.push(ValidationWarning::new(
                    &class.id,
                    format!("roster entry {student_id} is not a student"),
                ));
            }
        }
    }

    for quiz in &dataset.quizzes {
        if !quiz.is_practice() && dataset.class(&quiz.class_id).is_none() {
            warnings.push(ValidationWarning::new(
                &quiz.id,
                format!("class {} does not exist", quiz.class_id),
            ));
        }
        if quiz.questions.is_empty() {
            warnings.push(ValidationWarning::new(&quiz.id, "quiz has no questions"));
        }
        for question in &quiz.questions {
            if question.options.len() < 2 {
                warnings.push(ValidationWarning::new(
                    &question.id,
                    "question has fewer than two options",
                ));
            }
            if question.correct_answer >= question.options.len() {
                warnings.push(ValidationWarning::new(
                    &question.id,
                    format!(
                        "correct answer {} is out of range for {} option(s)",
                        question.correct_answer,
                        question.options.len()
                    ),
                ));
            }
        }
    }

    for attempt in &dataset.attempts {
        if dataset.user(&attempt.student_id).is_none() {
            warnings.push(ValidationWarning::new(
                &attempt.id,
                format!("student {} does not exist", attempt.student_id),
            ));
        }
        let Some(questions) = dataset.attempt_questions(attempt) else {
            warnings.push(ValidationWarning::new(
                &attempt.id,
                format!("quiz {} or its questions do not exist", attempt.quiz_id),
            ));
            continue;
        };
        if attempt.answers.len() != questions.len() {
            warnings.push(ValidationWarning::new(
                &attempt.id,
                format!(
                    "{} answer(s) for {} question(s)",
                    attempt.answers.len(),
                    questions.len()
                ),
            ));
        }
        let recomputed = scoring::rescore(attempt, &questions);
        if recomputed != attempt.score {
            warnings.push(ValidationWarning::new(
                &attempt.id,
                format!(
                    "stored score {} differs from recomputed score {}",
                    attempt.score, recomputed
                ),
            ));
        }
    }

    warnings
}
