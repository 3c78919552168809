//! The `quizforge practice` command.

use std::io::{BufRead, Write};

use anyhow::Result;

use quizforge_core::engine::Trainer;

use crate::console::Console;
use crate::GlobalArgs;

pub fn execute<R: BufRead, W: Write>(
    global: &GlobalArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let mut trainer = super::open_trainer(global)?;
    run(&mut trainer, console)
}

pub fn run<R: BufRead, W: Write>(trainer: &mut Trainer, console: &mut Console<R, W>) -> Result<()> {
    let summary = trainer.practice(console)?;
    console.say(format!(
        "\nPractice finished: {}/{} correct.",
        summary.correct, summary.rounds
    ))?;
    Ok(())
}
