//! Practice and test sessions.
//!
//! A session never reads input itself. It hands each [`Presentation`] to a
//! [`Responder`] and applies the result through the repository: `shown` is
//! incremented for the presentation first, then `correct` if the answer was
//! right, so `correct <= shown` holds after every round.

use std::io;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::evaluator::{evaluate, present, Outcome, Presentation};
use crate::model::{Counter, QuestionRecord};
use crate::repository::QuestionRepository;
use crate::results_log::{ResultsLog, TestReport};
use crate::selector::{ensure_pool, sample_uniform, WeightedSelector, MIN_POOL_SIZE};

/// The collaborator that answers questions on the user's behalf.
pub trait Responder {
    /// Produce the raw answer for `presentation`. For multiple-choice
    /// questions this is the 1-based number of the chosen option.
    fn respond(&mut self, presentation: &Presentation) -> io::Result<String>;

    /// The last response was unusable; the same presentation is asked again.
    fn on_invalid(&mut self, _error: &QuizError) {}

    /// Called once per evaluated answer, after the counters are saved.
    fn on_outcome(&mut self, _outcome: &Outcome) {}

    /// Asked after each practice round. `false` ends the session.
    fn continue_practice(&mut self) -> io::Result<bool>;
}

/// Apply an evaluated answer to the repository: `shown` first, then
/// `correct` when the answer was right.
pub fn record_outcome(repo: &mut QuestionRepository, outcome: &Outcome) -> Result<()> {
    repo.increment_counter(outcome.id, Counter::Shown)?;
    if outcome.correct {
        repo.increment_counter(outcome.id, Counter::Correct)?;
    }
    Ok(())
}

/// Present `record`, collect a valid answer, and save the counters.
fn ask<R, P>(
    repo: &mut QuestionRepository,
    record: &QuestionRecord,
    rng: &mut R,
    responder: &mut P,
) -> Result<Outcome>
where
    R: Rng + ?Sized,
    P: Responder + ?Sized,
{
    let presentation = present(record, rng);
    let outcome = loop {
        let response = responder
            .respond(&presentation)
            .map_err(QuizError::Input)?;
        match evaluate(record, &presentation, &response) {
            Ok(outcome) => break outcome,
            Err(err @ QuizError::Validation(_)) => {
                tracing::debug!(id = record.id, "rejected response: {err}");
                responder.on_invalid(&err);
            }
            Err(err) => return Err(err),
        }
    };

    record_outcome(repo, &outcome)?;
    responder.on_outcome(&outcome);
    Ok(outcome)
}

/// What a practice session did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSummary {
    pub rounds: u32,
    pub correct: u32,
}

/// Open-ended practice with exposure-weighted selection.
#[derive(Debug, Default, Clone)]
pub struct PracticeSession {
    selector: WeightedSelector,
}

impl PracticeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run rounds until the responder declines to continue.
    ///
    /// Fails up front with [`QuizError::InsufficientPool`] when fewer than
    /// [`MIN_POOL_SIZE`] questions are active.
    pub fn run<R, P>(
        &self,
        repo: &mut QuestionRepository,
        rng: &mut R,
        responder: &mut P,
    ) -> Result<PracticeSummary>
    where
        R: Rng + ?Sized,
        P: Responder + ?Sized,
    {
        ensure_pool(repo.active().len(), MIN_POOL_SIZE)?;

        let mut summary = PracticeSummary::default();
        loop {
            // Rebuilt every round so the weights see the latest `shown`.
            let pool = repo.active();
            let record = self.selector.select(&pool, rng)?.clone();

            let outcome = ask(repo, &record, rng, responder)?;
            summary.rounds += 1;
            summary.correct += u32::from(outcome.correct);

            if !responder.continue_practice().map_err(QuizError::Input)? {
                break;
            }
        }

        tracing::info!(
            rounds = summary.rounds,
            correct = summary.correct,
            "practice session finished"
        );
        Ok(summary)
    }
}

/// A fixed-length scored test over distinct, uniformly drawn questions.
#[derive(Debug, Clone)]
pub struct TestSession {
    log: ResultsLog,
}

impl TestSession {
    pub fn new(log: ResultsLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &ResultsLog {
        &self.log
    }

    /// Ask `count` distinct active questions and append the score to the
    /// results log.
    ///
    /// Nothing is read or written when the pool is too small or `count` is 0.
    /// If the responder fails part-way, answers already given keep their
    /// counter updates and no score line is written.
    pub fn run<R, P>(
        &self,
        repo: &mut QuestionRepository,
        count: usize,
        rng: &mut R,
        responder: &mut P,
    ) -> Result<TestReport>
    where
        R: Rng + ?Sized,
        P: Responder + ?Sized,
    {
        if count == 0 {
            return Err(QuizError::validation(
                "a test needs at least one question",
            ));
        }

        let pool = repo.active();
        ensure_pool(pool.len(), count.max(MIN_POOL_SIZE))?;
        let drawn: Vec<QuestionRecord> = sample_uniform(&pool, count, rng)?
            .into_iter()
            .cloned()
            .collect();

        let mut score = 0u32;
        for record in &drawn {
            let outcome = ask(repo, record, rng, responder)?;
            score += u32::from(outcome.correct);
        }

        let report = TestReport::now(score, drawn.len() as u32);
        self.log.append(&report)?;
        tracing::info!(score, total = report.total, "test session finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewQuestion;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Answers from a script; `None` in the script means "give the right
    /// answer".
    struct Scripted<'a> {
        repo_answers: Vec<(u32, String)>,
        script: VecDeque<Option<&'a str>>,
        rounds_left: u32,
        invalid: u32,
        seen: Vec<u32>,
    }

    impl<'a> Scripted<'a> {
        fn new(repo: &QuestionRepository, script: Vec<Option<&'a str>>, rounds: u32) -> Self {
            Self {
                repo_answers: repo
                    .records()
                    .iter()
                    .map(|r| (r.id, r.answer.clone()))
                    .collect(),
                script: script.into(),
                rounds_left: rounds,
                invalid: 0,
                seen: Vec::new(),
            }
        }
    }

    impl Responder for Scripted<'_> {
        fn respond(&mut self, p: &Presentation) -> io::Result<String> {
            self.seen.push(p.id);
            let step = self
                .script
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))?;
            Ok(match step {
                Some(text) => text.to_string(),
                None => {
                    let answer = &self.repo_answers.iter().find(|(id, _)| *id == p.id).unwrap().1;
                    match &p.options {
                        Some(opts) => {
                            (opts.iter().position(|o| o == answer).unwrap() + 1).to_string()
                        }
                        None => answer.clone(),
                    }
                }
            })
        }

        fn on_invalid(&mut self, _error: &QuizError) {
            self.invalid += 1;
        }

        fn continue_practice(&mut self) -> io::Result<bool> {
            self.rounds_left = self.rounds_left.saturating_sub(1);
            Ok(self.rounds_left > 0)
        }
    }

    fn repo_with(n: u32) -> (tempfile::TempDir, QuestionRepository) {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = QuestionRepository::open_or_init(dir.path().join("q.csv")).unwrap();
        for i in 1..=n {
            repo.append(NewQuestion::free_form(format!("Q{i}"), format!("A{i}")))
                .unwrap();
        }
        (dir, repo)
    }

    #[test]
    fn practice_needs_five_active_questions() {
        let (_dir, mut repo) = repo_with(5);
        repo.set_active(1, false).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut responder = Scripted::new(&repo, vec![None], 1);

        let err = PracticeSession::new()
            .run(&mut repo, &mut rng, &mut responder)
            .unwrap_err();
        assert!(matches!(err, QuizError::InsufficientPool { available: 4, required: 5 }));
        assert!(responder.seen.is_empty());
    }

    #[test]
    fn practice_runs_until_told_to_stop() {
        let (_dir, mut repo) = repo_with(5);
        let mut rng = StdRng::seed_from_u64(2);
        let mut responder = Scripted::new(&repo, vec![None, Some("wrong"), None, None], 4);

        let summary = PracticeSession::new()
            .run(&mut repo, &mut rng, &mut responder)
            .unwrap();
        assert_eq!(summary, PracticeSummary { rounds: 4, correct: 3 });

        let shown: u32 = repo.records().iter().map(|r| r.shown).sum();
        let correct: u32 = repo.records().iter().map(|r| r.correct).sum();
        assert_eq!((shown, correct), (4, 3));
        assert!(repo.records().iter().all(|r| r.correct <= r.shown));
    }

    #[test]
    fn invalid_choice_is_reasked_without_counting() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = QuestionRepository::open_or_init(dir.path().join("q.csv")).unwrap();
        for i in 1..=5 {
            repo.append(NewQuestion::multiple_choice(
                format!("Q{i}"),
                "right",
                ["right", "wrong", "other", "none"],
            ))
            .unwrap();
        }
        let mut rng = StdRng::seed_from_u64(3);
        let mut responder = Scripted::new(&repo, vec![Some("5"), Some("x"), None], 1);

        let summary = PracticeSession::new()
            .run(&mut repo, &mut rng, &mut responder)
            .unwrap();
        assert_eq!(summary.rounds, 1);
        assert_eq!(responder.invalid, 2);
        // the same presentation was asked three times
        assert!(responder.seen.windows(2).all(|w| w[0] == w[1]));

        let shown: u32 = repo.records().iter().map(|r| r.shown).sum();
        assert_eq!(shown, 1);
    }

    #[test]
    fn test_draws_distinct_questions_and_logs() {
        let (dir, mut repo) = repo_with(6);
        let log = ResultsLog::new(dir.path().join("results.txt"));
        let session = TestSession::new(log.clone());
        let mut rng = StdRng::seed_from_u64(4);
        let mut responder = Scripted::new(&repo, vec![None; 5], 0);

        let report = session.run(&mut repo, 5, &mut rng, &mut responder).unwrap();
        assert_eq!((report.score, report.total), (5, 5));

        let mut seen = responder.seen.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 5);

        let history = log.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].score, 5);
    }

    #[test]
    fn test_rejects_small_pools_before_touching_anything() {
        let (dir, mut repo) = repo_with(5);
        let log = ResultsLog::new(dir.path().join("results.txt"));
        let session = TestSession::new(log.clone());
        let mut rng = StdRng::seed_from_u64(5);
        let before = std::fs::read(repo.path()).unwrap();

        let mut responder = Scripted::new(&repo, vec![], 0);
        let err = session.run(&mut repo, 6, &mut rng, &mut responder).unwrap_err();
        assert!(matches!(err, QuizError::InsufficientPool { available: 5, required: 6 }));

        repo.set_active(5, false).unwrap();
        let after_disable = std::fs::read(repo.path()).unwrap();
        let err = session.run(&mut repo, 3, &mut rng, &mut responder).unwrap_err();
        assert!(matches!(err, QuizError::InsufficientPool { available: 4, required: 5 }));

        let err = session.run(&mut repo, 0, &mut rng, &mut responder).unwrap_err();
        assert!(matches!(err, QuizError::Validation(_)));

        assert_ne!(before, after_disable);
        assert_eq!(std::fs::read(repo.path()).unwrap(), after_disable);
        assert!(!log.path().exists());
    }

    #[test]
    fn aborted_test_writes_no_score() {
        let (dir, mut repo) = repo_with(5);
        let log = ResultsLog::new(dir.path().join("results.txt"));
        let mut rng = StdRng::seed_from_u64(6);
        let mut responder = Scripted::new(&repo, vec![None], 0);

        let err = TestSession::new(log.clone())
            .run(&mut repo, 3, &mut rng, &mut responder)
            .unwrap_err();
        assert!(matches!(err, QuizError::Input(_)));
        assert!(!log.path().exists());

        let shown: u32 = repo.records().iter().map(|r| r.shown).sum();
        assert_eq!(shown, 1);
    }
}
