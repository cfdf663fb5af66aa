//! The `quizdesk practice` command.

use std::path::PathBuf;

use anyhow::Result;

use quizdesk_core::config::load_config_from;
use quizdesk_core::engine::{EngineConfig, QuizEngine};
use quizdesk_core::practice::{PracticeMode, RandomSource, SeededRandom, ThreadRandom};

use crate::ModeArg;

pub fn execute(
    dataset_path: PathBuf,
    student_id: String,
    mode: ModeArg,
    count: usize,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dataset = super::load_dataset(&dataset_path)?;
    let engine = QuizEngine::new(dataset, EngineConfig::from(&config));

    let mode = match mode {
        ModeArg::Quick => PracticeMode::Quick,
        ModeArg::Custom => PracticeMode::Custom(count),
        ModeArg::Smart => PracticeMode::Smart,
    };

    let mut rng: Box<dyn RandomSource> = match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };
    let set = engine.start_practice(&student_id, mode, rng.as_mut())?;

    println!(
        "Practice set ({}): {} question(s)",
        set.mode,
        set.questions.len()
    );
    if !set.weak_topics.is_empty() {
        println!("Weak topics: {}", set.weak_topics.join(", "));
    }

    for (i, question) in set.questions.iter().enumerate() {
        println!("\n{}. [{}] {}", i + 1, question.topic_or_default(), question.text);
        for (j, option) in question.options.iter().enumerate() {
            println!("   {j}) {option}");
        }
    }

    Ok(())
}
