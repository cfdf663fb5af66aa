//! The `quizdesk export` command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use quizdesk_core::config::load_config_from;

pub fn execute(
    dataset_path: PathBuf,
    attempt: Option<String>,
    class: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output_dir = output.unwrap_or(config.output_dir);
    let dataset = super::load_dataset(&dataset_path)?;

    let path = match (attempt, class) {
        (Some(attempt_id), _) => {
            let Some(attempt) = dataset.attempt(&attempt_id) else {
                bail!("attempt not found: {attempt_id}");
            };
            let quiz = dataset
                .quiz(&attempt.quiz_id)
                .with_context(|| format!("quiz not found: {}", attempt.quiz_id))?;
            let questions = dataset
                .attempt_questions(attempt)
                .with_context(|| format!("questions of {attempt_id} could not be resolved"))?;
            quizdesk_report::csv::write_results_file(&output_dir, quiz, &questions, attempt)?
        }
        (None, Some(class_id)) => {
            let Some(class) = dataset.class(&class_id) else {
                bail!("class not found: {class_id}");
            };
            let path = output_dir.join(format!("{class_id}_report.html"));
            quizdesk_report::html::write_class_html(class, &dataset, &path)?;
            path
        }
        (None, None) => bail!("either --attempt or --class is required"),
    };

    tracing::info!(path = %path.display(), "report written");
    println!("Report written to {}", path.display());
    Ok(())
}
