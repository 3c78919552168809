//! The `quizforge history` command.

use std::io::{BufRead, Write};

use anyhow::Result;

use quizforge_core::engine::Trainer;

use crate::console::Console;
use crate::GlobalArgs;

pub fn execute<R: BufRead, W: Write>(
    global: &GlobalArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let trainer = super::open_trainer(global)?;
    print_history(&trainer, console)
}

pub fn print_history<R: BufRead, W: Write>(
    trainer: &Trainer,
    console: &mut Console<R, W>,
) -> Result<()> {
    let history = trainer.history()?;
    if history.is_empty() {
        console.say("No tests taken yet.")?;
        return Ok(());
    }

    for report in &history {
        console.say(report.to_string())?;
    }

    let best = history
        .iter()
        .map(|r| r.percentage)
        .fold(f64::NEG_INFINITY, f64::max);
    let average = history.iter().map(|r| r.percentage).sum::<f64>() / history.len() as f64;
    console.say(format!(
        "\n{} tests, best {best:.2}%, average {average:.2}%",
        history.len()
    ))?;
    Ok(())
}
