//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::statistics::DEFAULT_TEXT_WIDTH;

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// CSV question store.
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,
    /// Append-only test results log.
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
    /// Number of questions in a test when none is given.
    #[serde(default = "default_test_size")]
    pub default_test_size: usize,
    /// Characters of question text shown in the statistics table.
    #[serde(default = "default_stats_text_width")]
    pub stats_text_width: usize,
    /// Fixed RNG seed, for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_questions_path() -> PathBuf {
    PathBuf::from("questions.csv")
}
fn default_results_path() -> PathBuf {
    PathBuf::from("results.txt")
}
fn default_test_size() -> usize {
    5
}
fn default_stats_text_width() -> usize {
    DEFAULT_TEXT_WIDTH
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_path: default_questions_path(),
            results_path: default_results_path(),
            default_test_size: default_test_size(),
            stats_text_width: default_stats_text_width(),
            seed: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

fn resolve_path(p: &Path) -> PathBuf {
    match p.to_str() {
        Some(s) => PathBuf::from(resolve_env_vars(s)),
        None => p.to_path_buf(),
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable overrides: `QUIZFORGE_QUESTIONS`, `QUIZFORGE_RESULTS`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config(
            &std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?,
        )
        .with_context(|| format!("failed to parse config: {}", path.display()))?,
        None => QuizConfig::default(),
    };

    if let Ok(questions) = std::env::var("QUIZFORGE_QUESTIONS") {
        config.questions_path = PathBuf::from(questions);
    }
    if let Ok(results) = std::env::var("QUIZFORGE_RESULTS") {
        config.results_path = PathBuf::from(results);
    }

    config.questions_path = resolve_path(&config.questions_path);
    config.results_path = resolve_path(&config.results_path);

    anyhow::ensure!(
        config.default_test_size >= 1,
        "default_test_size must be at least 1"
    );

    tracing::debug!(source = ?config_path, ?config, "loaded configuration");
    Ok(config)
}

/// Parse a TOML string into a config (useful for testing).
pub fn parse_config(content: &str) -> Result<QuizConfig> {
    toml::from_str(content).context("invalid quizforge configuration")
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}
