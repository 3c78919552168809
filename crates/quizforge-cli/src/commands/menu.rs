//! The interactive main menu (`quizforge menu`, or no subcommand).

use std::io::{self, BufRead, Write};

use anyhow::Result;

use quizforge_core::QuizError;

use crate::console::Console;
use crate::GlobalArgs;

const MENU: &str = "\nMain Menu:
1. Add a question
2. View statistics
3. Disable/Enable a question
4. Practice mode
5. Test mode
6. Test history
7. Exit";

pub fn execute<R: BufRead, W: Write>(
    global: &GlobalArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let mut trainer = super::open_trainer(global)?;

    loop {
        // pick up rows another process appended since the last command
        trainer.reload()?;
        console.say(MENU)?;
        let choice = match console.prompt("Enter your choice: ") {
            Ok(choice) => choice,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };

        let result = match choice.trim() {
            "1" => {
                console.say("\nAdding a question:")?;
                super::add::interactive(&mut trainer, console)
            }
            "2" => {
                console.say("\nStatistics:")?;
                super::stats::print_statistics(&trainer, console)
            }
            "3" => {
                console.say("\nDisable/Enable a question:")?;
                super::toggle::interactive(&mut trainer, console)
            }
            "4" => {
                console.say("\nPractice mode:")?;
                super::practice::run(&mut trainer, console)
            }
            "5" => {
                console.say("\nTest mode:")?;
                super::test::interactive(&mut trainer, console)
            }
            "6" => {
                console.say("\nTest history:")?;
                super::history::print_history(&trainer, console)
            }
            "7" => break,
            _ => {
                console.say("Invalid choice. Please enter a number between 1 and 7.")?;
                Ok(())
            }
        };

        if let Err(e) = result {
            if is_end_of_input(&e) {
                break;
            }
            match e.downcast_ref::<QuizError>() {
                Some(quiz) if quiz.is_recoverable() => console.say(quiz.to_string())?,
                _ => return Err(e),
            }
        }
    }

    console.say("Goodbye.")?;
    Ok(())
}

fn is_end_of_input(e: &anyhow::Error) -> bool {
    let io_err = match e.downcast_ref::<QuizError>() {
        Some(QuizError::Input(io_err)) => Some(io_err),
        _ => e.downcast_ref::<io::Error>(),
    };
    io_err.is_some_and(|io_err| io_err.kind() == io::ErrorKind::UnexpectedEof)
}
