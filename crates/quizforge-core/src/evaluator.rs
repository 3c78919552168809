//! Presenting questions and checking answers.
//!
//! Multiple-choice options are reshuffled on every presentation so the
//! position of the correct answer carries no information. Answers given by
//! number refer to the order that was actually displayed.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{QuizError, Result};
use crate::model::{QuestionKind, QuestionRecord};

/// What the user sees for one presentation of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    /// Id of the presented record.
    pub id: u32,
    /// The question text.
    pub text: String,
    /// Options in displayed order; `None` for free-form questions.
    pub options: Option<Vec<String>>,
}

/// The result of evaluating one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub id: u32,
    pub correct: bool,
    /// The canonical answer, for feedback.
    pub answer: String,
    /// What the user's response resolved to (the option text for quizzes).
    pub response: String,
}

/// Build a presentation for `record`, shuffling quiz options with `rng`.
pub fn present<R: Rng + ?Sized>(record: &QuestionRecord, rng: &mut R) -> Presentation {
    let options = match &record.kind {
        QuestionKind::FreeForm => None,
        QuestionKind::MultipleChoice { options } => {
            let mut shuffled = options.clone();
            shuffled.shuffle(rng);
            Some(shuffled)
        }
    };

    Presentation {
        id: record.id,
        text: record.text.clone(),
        options,
    }
}

/// Check `response` against `record`.
///
/// For multiple-choice questions `response` must be a 1-based index into
/// `presentation.options`. Anything else is a [`QuizError::Validation`].
pub fn evaluate(
    record: &QuestionRecord,
    presentation: &Presentation,
    response: &str,
) -> Result<Outcome> {
    if presentation.id != record.id {
        return Err(QuizError::validation(format!(
            "presentation is for question {}, not {}",
            presentation.id, record.id
        )));
    }

    let resolved = match &presentation.options {
        None => response.trim().to_string(),
        Some(options) => resolve_choice(options, response)?.to_string(),
    };

    Ok(Outcome {
        id: record.id,
        correct: answers_match(&resolved, &record.answer),
        answer: record.answer.clone(),
        response: resolved,
    })
}

fn resolve_choice<'a>(options: &'a [String], response: &str) -> Result<&'a str> {
    let trimmed = response.trim();
    let index: usize = trimmed.parse().map_err(|_| {
        QuizError::validation(format!(
            "'{trimmed}' is not an option number (1-{})",
            options.len()
        ))
    })?;

    if index == 0 || index > options.len() {
        return Err(QuizError::validation(format!(
            "choice {index} is out of range (1-{})",
            options.len()
        )));
    }

    Ok(&options[index - 1])
}

/// Trim and case-fold for answer comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Whether two answers are equal after normalisation.
pub fn answers_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
