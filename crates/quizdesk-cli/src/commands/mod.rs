//! Subcommand implementations.

pub mod export;
pub mod grade;
pub mod init;
pub mod leaderboard;
pub mod practice;
pub mod stats;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use quizdesk_core::Dataset;

/// Load a single dataset file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    quizdesk_core::parser::parse_dataset(path)
        .with_context(|| format!("could not load dataset {}", path.display()))
}

/// Format an optional score, showing `-` when there is none.
pub fn score_cell(score: Option<u8>) -> String {
    score.map(|s| format!("{s}%")).unwrap_or_else(|| "-".to_string())
}
