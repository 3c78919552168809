//! Error types for the quiz engine.
//!
//! Callers match on the variant to decide whether to re-prompt
//! (`Validation`), report and continue (`InsufficientPool`), or give up on the
//! operation (`StorageRead`, `StorageWrite`).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the repository, evaluator, and sessions.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The user supplied something unusable: empty text, a quiz whose answer
    /// is not among its options, an out-of-range choice.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The question store or results log is missing or malformed.
    #[error("failed to read {}: {reason}", path.display())]
    StorageRead { path: PathBuf, reason: String },

    /// Persisting a change failed.
    #[error("failed to write {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The responder could not supply an answer (input closed, terminal gone).
    #[error("failed to read response: {0}")]
    Input(#[source] std::io::Error),

    /// Not enough active questions to start a session.
    #[error("not enough active questions: have {available}, need at least {required}")]
    InsufficientPool { available: usize, required: usize },
}

impl QuizError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        QuizError::Validation(message.into())
    }

    pub(crate) fn storage_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        QuizError::StorageRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn storage_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuizError::StorageWrite {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuizError::Validation(_) | QuizError::InsufficientPool { .. }
        )
    }
}

/// Result alias used throughout `quizforge-core`.
pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(QuizError::validation("empty").is_recoverable());
        assert!(QuizError::InsufficientPool {
            available: 2,
            required: 5
        }
        .is_recoverable());
        assert!(!QuizError::storage_read("q.csv", "missing").is_recoverable());
    }

    #[test]
    fn messages_name_the_file() {
        let err = QuizError::storage_read("data/questions.csv", "no such file");
        assert_eq!(
            err.to_string(),
            "failed to read data/questions.csv: no such file"
        );
    }
}
