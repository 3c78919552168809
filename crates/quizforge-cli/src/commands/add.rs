//! The `quizforge add` command and the menu's question entry.

use std::io::{BufRead, Write};

use anyhow::Result;

use quizforge_core::engine::Trainer;
use quizforge_core::model::{NewQuestion, QuestionRecord};

use crate::console::Console;
use crate::GlobalArgs;

pub fn execute<R: BufRead, W: Write>(
    global: &GlobalArgs,
    text: String,
    answer: String,
    options: Vec<String>,
    console: &mut Console<R, W>,
) -> Result<()> {
    let mut trainer = super::open_trainer(global)?;
    let question = NewQuestion {
        text,
        answer,
        options: (!options.is_empty()).then_some(options),
    };
    let record = trainer.add_question(question)?;
    report_added(&record, console)
}

/// Prompt for a question field by field. Validation errors are printed and
/// the menu carries on.
pub fn interactive<R: BufRead, W: Write>(
    trainer: &mut Trainer,
    console: &mut Console<R, W>,
) -> Result<()> {
    let text = console.prompt("Enter question text: ")?;
    let answer = console.prompt("Enter question answer: ")?;

    let options = if console.confirm("Is this a multiple-choice question? (yes/no): ")? {
        let mut options = Vec::new();
        loop {
            let option = console.prompt("Enter an option (or type 'done' to finish): ")?;
            if option.trim().eq_ignore_ascii_case("done") {
                break;
            }
            options.push(option);
        }
        Some(options)
    } else {
        None
    };

    match trainer.add_question(NewQuestion {
        text,
        answer,
        options,
    }) {
        Ok(record) => report_added(&record, console),
        Err(e) if e.is_recoverable() => Ok(console.say(e.to_string())?),
        Err(e) => Err(e.into()),
    }
}

fn report_added<R: BufRead, W: Write>(
    record: &QuestionRecord,
    console: &mut Console<R, W>,
) -> Result<()> {
    let kind = if record.is_multiple_choice() {
        "multiple-choice"
    } else {
        "free-form"
    };
    console.say(format!("Added {kind} question {}.", record.id))?;
    Ok(())
}
