//! quizdesk command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "quizdesk", version, about = "Classroom quiz grading, statistics and practice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Practice selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Quick,
    Custom,
    Smart,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example dataset
    Init,

    /// Validate dataset TOML files
    Validate {
        /// Path to dataset file or directory
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Show the leaderboard of a quiz
    Leaderboard {
        /// Path to dataset file
        #[arg(long)]
        dataset: PathBuf,

        /// Quiz id
        #[arg(long)]
        quiz: String,
    },

    /// Show class or student statistics
    #[command(group(ArgGroup::new("target").required(true).args(["class", "student"])))]
    Stats {
        /// Path to dataset file
        #[arg(long)]
        dataset: PathBuf,

        /// Class id
        #[arg(long)]
        class: Option<String>,

        /// Student id
        #[arg(long)]
        student: Option<String>,
    },

    /// Select a practice set for a student
    Practice {
        /// Path to dataset file
        #[arg(long)]
        dataset: PathBuf,

        /// Student id
        #[arg(long)]
        student: String,

        /// Selection policy
        #[arg(long, value_enum, default_value = "quick")]
        mode: ModeArg,

        /// Number of questions for custom mode
        #[arg(long, default_value = "10")]
        count: usize,

        /// Seed for a reproducible selection
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a submission without saving it
    Grade {
        /// Path to dataset file
        #[arg(long)]
        dataset: PathBuf,

        /// Student id
        #[arg(long)]
        student: String,

        /// Quiz id
        #[arg(long)]
        quiz: String,

        /// Comma-separated option indexes, `-` for unanswered (e.g. "1,3,1")
        #[arg(long, allow_hyphen_values = true)]
        answers: String,

        /// Only present the questions the student's latest attempt got wrong
        #[arg(long)]
        retry: bool,
    },

    /// Export an attempt's results (CSV) or a class report (HTML)
    #[command(group(ArgGroup::new("source").required(true).args(["attempt", "class"])))]
    Export {
        /// Path to dataset file
        #[arg(long)]
        dataset: PathBuf,

        /// Attempt id
        #[arg(long)]
        attempt: Option<String>,

        /// Class id
        #[arg(long)]
        class: Option<String>,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizdesk=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { dataset } => commands::validate::execute(dataset),
        Commands::Leaderboard { dataset, quiz } => commands::leaderboard::execute(dataset, quiz),
        Commands::Stats {
            dataset,
            class,
            student,
        } => commands::stats::execute(dataset, class, student),
        Commands::Practice {
            dataset,
            student,
            mode,
            count,
            seed,
            config,
        } => commands::practice::execute(dataset, student, mode, count, seed, config),
        Commands::Grade {
            dataset,
            student,
            quiz,
            answers,
            retry,
        } => commands::grade::execute(dataset, student, quiz, answers, retry),
        Commands::Export {
            dataset,
            attempt,
            class,
            output,
            config,
        } => commands::export::execute(dataset, attempt, class, output, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
