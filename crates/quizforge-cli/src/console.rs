//! Line-based terminal I/O and the console [`Responder`].

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use quizforge_core::evaluator::{Outcome, Presentation};
use quizforge_core::session::Responder;
use quizforge_core::QuizError;

/// Prompts and output over any line reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one line, without its line ending.
    ///
    /// End of input is reported as [`io::ErrorKind::UnexpectedEof`].
    pub fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until the answer is yes or no.
    pub fn confirm(&mut self, label: &str) -> io::Result<bool> {
        loop {
            match self.prompt(label)?.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" | "stop" | "q" | "quit" => return Ok(false),
                _ => self.say("Please answer yes or no.")?,
            }
        }
    }

    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }
}

impl<R: BufRead, W: Write> Responder for Console<R, W> {
    fn respond(&mut self, presentation: &Presentation) -> io::Result<String> {
        self.say("")?;
        self.say(&presentation.text)?;
        match &presentation.options {
            Some(options) => {
                for (i, option) in options.iter().enumerate() {
                    self.say(format!("  {}. {option}", i + 1))?;
                }
                self.prompt(&format!("Choose 1-{}: ", options.len()))
            }
            None => self.prompt("Your answer: "),
        }
    }

    fn on_invalid(&mut self, error: &QuizError) {
        let _ = self.say(format!("{error}. Try again."));
    }

    fn on_outcome(&mut self, outcome: &Outcome) {
        let message = if outcome.correct {
            "Correct!".to_string()
        } else {
            format!("Incorrect. The answer is: {}", outcome.answer)
        };
        let _ = self.say(message);
    }

    fn continue_practice(&mut self) -> io::Result<bool> {
        self.confirm("Continue practicing? (y/n): ")
    }
}
