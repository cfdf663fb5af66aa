//! The `quizdesk validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizdesk_core::parser;

pub fn execute(dataset_path: PathBuf) -> Result<()> {
    let datasets = if dataset_path.is_dir() {
        parser::load_dataset_directory(&dataset_path)?
    } else {
        vec![(dataset_path.clone(), super::load_dataset(&dataset_path)?)]
    };

    let mut total_warnings = 0;

    for (path, dataset) in &datasets {
        println!(
            "Dataset: {} ({} users, {} classes, {} quizzes, {} attempts)",
            path.display(),
            dataset.users.len(),
            dataset.classes.len(),
            dataset.quizzes.len(),
            dataset.attempts.len()
        );

        let warnings = parser::validate_dataset(dataset);
        for w in &warnings {
            println!("  [{}] WARNING: {}", w.entity_id, w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All datasets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
