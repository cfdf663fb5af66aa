//! quizdesk configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tuning for the practice selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeConfig {
    /// Size of a quick practice set.
    #[serde(default = "default_set_size")]
    pub quick_size: usize,
    /// Size of a smart (weak-topic) practice set.
    #[serde(default = "default_set_size")]
    pub smart_size: usize,
    /// Topics with accuracy strictly below this percentage count as weak.
    #[serde(default = "default_weak_threshold")]
    pub weak_threshold: f64,
    /// How many weak topics a smart set focuses on.
    #[serde(default = "default_max_weak_topics")]
    pub max_weak_topics: usize,
}

fn default_set_size() -> usize {
    10
}
fn default_weak_threshold() -> f64 {
    70.0
}
fn default_max_weak_topics() -> usize {
    3
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            quick_size: default_set_size(),
            smart_size: default_set_size(),
            weak_threshold: default_weak_threshold(),
            max_weak_topics: default_max_weak_topics(),
        }
    }
}

/// Top-level quizdesk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizdeskConfig {
    #[serde(default)]
    pub practice: PracticeConfig,
    /// Where exported reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizdesk-reports")
}

impl Default for QuizdeskConfig {
    fn default() -> Self {
        Self {
            practice: PracticeConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdesk.toml` in the current directory
/// 2. `~/.config/quizdesk/config.toml`
///
/// Environment variable overrides: `QUIZDESK_WEAK_THRESHOLD`, `QUIZDESK_OUTPUT_DIR`.
pub fn load_config() -> Result<QuizdeskConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeskConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdesk.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizdeskConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeskConfig::default(),
    };

    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply `QUIZDESK_*` overrides read through `lookup`.
fn apply_overrides(
    mut config: QuizdeskConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<QuizdeskConfig> {
    if let Some(raw) = lookup("QUIZDESK_WEAK_THRESHOLD") {
        config.practice.weak_threshold = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZDESK_WEAK_THRESHOLD: {raw}"))?;
    }
    if let Some(dir) = lookup("QUIZDESK_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdesk"))
}
