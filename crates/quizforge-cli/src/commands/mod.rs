pub mod add;
pub mod history;
pub mod init;
pub mod menu;
pub mod practice;
pub mod stats;
pub mod toggle;

use anyhow::Result;

use quizforge_core::config::{load_config_from, QuizConfig};
use quizforge_core::engine::Trainer;

use crate::GlobalArgs;

/// Config file plus command-line overrides.
pub fn resolve_config(global: &GlobalArgs) -> Result<QuizConfig> {
    let mut config = load_config_from(global.config.as_deref())?;
    if let Some(questions) = &global.questions {
        config.questions_path = questions.clone();
    }
    if let Some(results) = &global.results {
        config.results_path = results.clone();
    }
    tracing::debug!(
        questions = %config.questions_path.display(),
        results = %config.results_path.display(),
        "resolved file locations"
    );
    Ok(config)
}

pub fn open_trainer(global: &GlobalArgs) -> Result<Trainer> {
    let config = resolve_config(global)?;
    Ok(Trainer::from_config(&config)?)
}
