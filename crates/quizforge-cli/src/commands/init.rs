//! The `quizforge init` command.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;

use quizforge_core::repository::QuestionRepository;

use crate::console::Console;
use crate::GlobalArgs;

pub fn execute<R: BufRead, W: Write>(
    global: &GlobalArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let config_path = global
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new("quizforge.toml"));

    if config_path.exists() {
        console.say(format!("{} already exists, skipping.", config_path.display()))?;
    } else {
        std::fs::write(config_path, SAMPLE_CONFIG)?;
        console.say(format!("Created {}", config_path.display()))?;
    }

    let config = super::resolve_config(global)?;
    let store = &config.questions_path;
    if store.exists() {
        console.say(format!("{} already exists, skipping.", store.display()))?;
    } else {
        QuestionRepository::open_or_init(store)?;
        console.say(format!("Created {}", store.display()))?;
    }

    console.say("")?;
    console.say("Next steps:")?;
    console.say(
        "  1. Add at least five questions: quizforge add --text \"...\" --answer \"...\"",
    )?;
    console.say("  2. Practice: quizforge practice")?;
    console.say("  3. Take a test: quizforge test --count 5")?;

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

# CSV question store
questions_path = "questions.csv"

# Append-only log of test scores
results_path = "results.txt"

# Questions per test when --count is not given
default_test_size = 5

# Characters of question text shown by `quizforge stats`
stats_text_width = 40

# Uncomment for reproducible shuffles and draws
# seed = 42
"#;
