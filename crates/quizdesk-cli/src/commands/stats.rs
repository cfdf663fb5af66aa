//! The `quizdesk stats` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use quizdesk_core::engine::{EngineConfig, QuizEngine};
use quizdesk_core::statistics::{self, TARGET_SCORE};

pub fn execute(dataset_path: PathBuf, class: Option<String>, student: Option<String>) -> Result<()> {
    let dataset = super::load_dataset(&dataset_path)?;

    match (class, student) {
        (Some(class_id), _) => {
            let Some(class) = dataset.class(&class_id) else {
                bail!("class not found: {class_id}");
            };
            class_stats(&statistics::class_summary(class, &dataset));
        }
        (None, Some(student_id)) => {
            let engine = QuizEngine::new(dataset, EngineConfig::default());
            student_stats(&engine, &student_id)?;
        }
        (None, None) => bail!("either --class or --student is required"),
    }

    Ok(())
}

fn class_stats(summary: &statistics::ClassSummary) {
    println!("Class: {} ({})", summary.class_name, summary.class_id);
    println!(
        "  {} student(s), {} quiz(zes) ({} active), {} question(s), {} attempt(s)",
        summary.total_students,
        summary.total_quizzes,
        summary.active_quizzes,
        summary.total_questions,
        summary.total_attempts
    );
    let status = if statistics::meets_target(summary.average_score) {
        "above target"
    } else {
        "below target"
    };
    println!(
        "  Average score: {}% ({status}, target {TARGET_SCORE}%)",
        summary.average_score
    );

    if summary.per_quiz.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Quiz", "Questions", "Visible", "Attempts", "Average"]);
    for quiz in &summary.per_quiz {
        table.add_row(vec![
            Cell::new(&quiz.quiz_name),
            Cell::new(quiz.question_count),
            Cell::new(if quiz.visible { "yes" } else { "no" }),
            Cell::new(quiz.attempt_count),
            Cell::new(format!("{}%", quiz.average_score)),
        ]);
    }
    println!("{table}");
}

fn student_stats(engine: &QuizEngine, student_id: &str) -> Result<()> {
    let overview = engine.overview(student_id)?;
    let name = engine
        .dataset()
        .user(student_id)
        .map(|u| u.name.as_str())
        .unwrap_or(student_id);
    println!("Student: {name} ({student_id})");
    println!(
        "  {} attempt(s), average score {}%",
        overview.attempt_count, overview.average_score
    );

    if !overview.quizzes.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Quiz", "Class", "Questions", "Attempts", "Best"]);
        for status in &overview.quizzes {
            table.add_row(vec![
                Cell::new(&status.quiz_name),
                Cell::new(&status.class_name),
                Cell::new(status.question_count),
                Cell::new(status.attempt_count),
                Cell::new(super::score_cell(status.best_score)),
            ]);
        }
        println!("{table}");
    }

    let topics = engine.topic_accuracy(student_id)?;
    if topics.is_empty() {
        println!("No topic history yet.");
        return Ok(());
    }

    println!("\nTopic accuracy (weakest first):");
    let mut table = Table::new();
    table.set_header(vec!["Topic", "Correct", "Answered", "Accuracy"]);
    for topic in &topics {
        table.add_row(vec![
            Cell::new(&topic.topic),
            Cell::new(topic.correct),
            Cell::new(topic.total),
            Cell::new(format!("{:.1}%", topic.accuracy)),
        ]);
    }
    println!("{table}");

    Ok(())
}
