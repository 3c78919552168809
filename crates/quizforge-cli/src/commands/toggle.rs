//! The `quizforge enable` / `quizforge disable` commands.

use std::io::{BufRead, Write};

use anyhow::Result;

use quizforge_core::engine::Trainer;

use crate::console::Console;
use crate::GlobalArgs;

pub fn execute<R: BufRead, W: Write>(
    global: &GlobalArgs,
    id: u32,
    active: bool,
    console: &mut Console<R, W>,
) -> Result<()> {
    let mut trainer = super::open_trainer(global)?;
    apply(&mut trainer, id, active, console)
}

pub fn apply<R: BufRead, W: Write>(
    trainer: &mut Trainer,
    id: u32,
    active: bool,
    console: &mut Console<R, W>,
) -> Result<()> {
    let verb = if active { "enabled" } else { "disabled" };
    if trainer.set_active(id, active)? {
        console.say(format!("Question {id} {verb}."))?;
    } else {
        console.say(format!("No question with id {id}."))?;
    }
    Ok(())
}

/// Menu flow: ask for an id and the new state.
pub fn interactive<R: BufRead, W: Write>(
    trainer: &mut Trainer,
    console: &mut Console<R, W>,
) -> Result<()> {
    let raw = console.prompt("Enter question id: ")?;
    let Ok(id) = raw.trim().parse::<u32>() else {
        console.say(format!("'{}' is not a question id.", raw.trim()))?;
        return Ok(());
    };

    let Some(current) = trainer.repository().get(id).map(|r| r.active) else {
        console.say(format!("No question with id {id}."))?;
        return Ok(());
    };

    let state = if current { "enabled" } else { "disabled" };
    let label = if current {
        format!("Question {id} is {state}. Disable it? (y/n): ")
    } else {
        format!("Question {id} is {state}. Enable it? (y/n): ")
    };
    if console.confirm(&label)? {
        apply(trainer, id, !current, console)?;
    }
    Ok(())
}
