//! The `quizforge stats` command.

use std::io::{BufRead, Write};

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizforge_core::engine::Trainer;

use crate::console::Console;
use crate::GlobalArgs;

pub fn execute<R: BufRead, W: Write>(
    global: &GlobalArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let trainer = super::open_trainer(global)?;
    print_statistics(&trainer, console)
}

pub fn print_statistics<R: BufRead, W: Write>(
    trainer: &Trainer,
    console: &mut Console<R, W>,
) -> Result<()> {
    let rows = trainer.statistics();
    if rows.is_empty() {
        console.say("No questions yet. Add some with `quizforge add`.")?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Active", "Question", "Shown", "Correct", "Accuracy"]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(if row.active { "yes" } else { "no" }),
            Cell::new(&row.text),
            Cell::new(row.shown),
            Cell::new(row.correct),
            Cell::new(format!("{:.1}%", row.accuracy)),
        ]);
    }
    console.say(table.to_string())?;

    let totals = trainer.totals();
    console.say(format!(
        "{} questions ({} active), {} answers, {:.1}% correct",
        totals.questions,
        totals.active,
        totals.shown,
        totals.accuracy()
    ))?;
    Ok(())
}
