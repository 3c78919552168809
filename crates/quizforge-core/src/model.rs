//! Core data model types for quizforge.
//!
//! A [`QuestionRecord`] is what the repository persists. A [`NewQuestion`] is
//! what a user types in; it never carries counters, which belong to the
//! repository.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QuizError, Result};
use crate::evaluator::answers_match;

/// One persisted question with its metadata and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Unique, positive, never reused.
    pub id: u32,
    /// The prompt shown to the user.
    pub text: String,
    /// The canonical answer.
    pub answer: String,
    /// Free-form or multiple-choice, with the options for the latter.
    pub kind: QuestionKind,
    /// Whether the question takes part in practice and tests.
    pub active: bool,
    /// Number of times the question has been presented.
    pub shown: u32,
    /// Number of times it was answered correctly.
    pub correct: u32,
}

impl QuestionRecord {
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::MultipleChoice { .. })
    }

    /// The options in stored order, or `None` for free-form questions.
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            QuestionKind::FreeForm => None,
            QuestionKind::MultipleChoice { options } => Some(options),
        }
    }

    /// Percentage of presentations answered correctly; 0 when never shown.
    pub fn accuracy(&self) -> f64 {
        if self.shown == 0 {
            0.0
        } else {
            self.correct as f64 / self.shown as f64 * 100.0
        }
    }
}

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Typed answer compared against the stored one.
    FreeForm,
    /// Pick one of the listed options.
    MultipleChoice { options: Vec<String> },
}

/// Which counter [`crate::repository::QuestionRepository::increment_counter`]
/// bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Counter {
    Shown,
    Correct,
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counter::Shown => write!(f, "shown"),
            Counter::Correct => write!(f, "correct"),
        }
    }
}

/// A question as entered by the user, before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewQuestion {
    pub text: String,
    pub answer: String,
    /// `Some` makes this a multiple-choice question.
    pub options: Option<Vec<String>>,
}

impl NewQuestion {
    pub fn free_form(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
            options: None,
        }
    }

    pub fn multiple_choice<I, S>(
        text: impl Into<String>,
        answer: impl Into<String>,
        options: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            answer: answer.into(),
            options: Some(options.into_iter().map(Into::into).collect()),
        }
    }

    /// Check the input and turn it into a fresh record with the given id.
    ///
    /// Counters start at zero and the record starts active.
    pub fn into_record(self, id: u32) -> Result<QuestionRecord> {
        let text = self.text.trim().to_string();
        let answer = self.answer.trim().to_string();

        if text.is_empty() {
            return Err(QuizError::validation("question text cannot be empty"));
        }
        if answer.is_empty() {
            return Err(QuizError::validation("question answer cannot be empty"));
        }

        let kind = match self.options {
            None => QuestionKind::FreeForm,
            Some(options) => {
                let options: Vec<String> = options
                    .into_iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                validate_options(&answer, &options)?;
                QuestionKind::MultipleChoice { options }
            }
        };

        Ok(QuestionRecord {
            id,
            text,
            answer,
            kind,
            active: true,
            shown: 0,
            correct: 0,
        })
    }
}

/// A quiz needs at least one option and the answer has to be one of them.
pub(crate) fn validate_options(answer: &str, options: &[String]) -> Result<()> {
    if options.is_empty() {
        return Err(QuizError::validation(
            "multiple-choice question needs at least one option",
        ));
    }
    if !options.iter().any(|o| answers_match(o, answer)) {
        return Err(QuizError::validation(format!(
            "answer '{answer}' is not one of the options"
        )));
    }
    Ok(())
}
