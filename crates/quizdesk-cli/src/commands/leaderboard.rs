//! The `quizdesk leaderboard` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use quizdesk_core::leaderboard::{self, LeaderboardEntry};

pub fn execute(dataset_path: PathBuf, quiz_id: String) -> Result<()> {
    let dataset = super::load_dataset(&dataset_path)?;
    let Some(quiz) = dataset.quiz(&quiz_id) else {
        bail!("quiz not found: {quiz_id}");
    };

    let entries = leaderboard::rank_quiz(&quiz.id, &dataset.attempts, &dataset.users);
    println!("Leaderboard: {} ({} question(s))", quiz.name, quiz.questions.len());
    if entries.is_empty() {
        println!("No attempts yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Student", "Score", "Submitted"]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(rank_label(entry)),
            Cell::new(&entry.student_name),
            Cell::new(format!("{}%", entry.score)),
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    println!("{table}");

    Ok(())
}

/// One-based rank, with the medal of the top three.
fn rank_label(entry: &LeaderboardEntry) -> String {
    let rank = entry.position + 1;
    match entry.medal {
        Some(medal) => format!("{rank} ({medal})"),
        None => rank.to_string(),
    }
}
