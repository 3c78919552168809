//! End-to-end session tests through the public core API.
//!
//! These drive whole practice and test sessions against a real CSV store,
//! answering through a scripted responder, and check what ends up on disk.

use std::collections::VecDeque;
use std::io;

use rand::rngs::StdRng;
use rand::SeedableRng;

use quizforge_core::engine::{Trainer, TrainerConfig};
use quizforge_core::evaluator::{evaluate, present, Presentation};
use quizforge_core::model::NewQuestion;
use quizforge_core::repository::QuestionRepository;
use quizforge_core::results_log::ResultsLog;
use quizforge_core::session::{record_outcome, Responder};
use quizforge_core::QuizError;

#[derive(Clone, Copy)]
enum Step {
    Right,
    Wrong,
}

/// Every question's answer is `A<id>`, so the right answer can be derived
/// from the presentation alone.
struct Scripted {
    steps: VecDeque<Step>,
    practice_rounds: u32,
}

impl Scripted {
    fn new(steps: &[Step], practice_rounds: u32) -> Self {
        Self {
            steps: steps.iter().copied().collect(),
            practice_rounds,
        }
    }
}

impl Responder for Scripted {
    fn respond(&mut self, p: &Presentation) -> io::Result<String> {
        let step = self
            .steps
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more answers"))?;
        let answer = format!("A{}", p.id);
        Ok(match (step, &p.options) {
            (Step::Right, None) => answer,
            (Step::Wrong, None) => "definitely wrong".to_string(),
            (Step::Right, Some(opts)) => {
                (opts.iter().position(|o| *o == answer).unwrap() + 1).to_string()
            }
            (Step::Wrong, Some(opts)) => {
                (opts.iter().position(|o| *o != answer).unwrap() + 1).to_string()
            }
        })
    }

    fn continue_practice(&mut self) -> io::Result<bool> {
        self.practice_rounds = self.practice_rounds.saturating_sub(1);
        Ok(self.practice_rounds > 0)
    }
}

fn free_form_pool(n: u32) -> (tempfile::TempDir, Trainer) {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = QuestionRepository::open_or_init(dir.path().join("questions.csv")).unwrap();
    for id in 1..=n {
        repo.append(NewQuestion::free_form(format!("Q{id}"), format!("A{id}")))
            .unwrap();
    }
    let log = ResultsLog::new(dir.path().join("results.txt"));
    let config = TrainerConfig {
        seed: Some(1234),
        ..TrainerConfig::default()
    };
    (dir, Trainer::new(repo, log, config))
}

fn counters(path: &std::path::Path) -> Vec<(u32, u32, u32)> {
    QuestionRepository::open(path)
        .unwrap()
        .records()
        .iter()
        .map(|r| (r.id, r.shown, r.correct))
        .collect()
}

#[test]
fn all_correct_three_question_test() {
    let (_dir, mut trainer) = free_form_pool(5);
    let mut responder = Scripted::new(&[Step::Right; 3], 0);

    let report = trainer.test(Some(3), &mut responder).unwrap();
    assert_eq!((report.score, report.total), (3, 3));
    assert!((report.percentage - 100.0).abs() < f64::EPSILON);
    assert!(report.to_string().starts_with("Score: 3/3 (100.00%) - "));

    let after = counters(trainer.repository().path());
    let touched: Vec<_> = after.iter().filter(|(_, shown, _)| *shown > 0).collect();
    assert_eq!(touched.len(), 3);
    assert!(touched.iter().all(|(_, shown, correct)| (*shown, *correct) == (1, 1)));
    assert_eq!(after.iter().filter(|(_, shown, _)| *shown == 0).count(), 2);
}

#[test]
fn two_of_three_test() {
    let (_dir, mut trainer) = free_form_pool(5);
    let mut responder = Scripted::new(&[Step::Right, Step::Right, Step::Wrong], 0);

    let report = trainer.test(Some(3), &mut responder).unwrap();
    assert_eq!((report.score, report.total), (2, 3));
    assert_eq!(format!("{:.2}", report.percentage), "66.67");

    let after = counters(trainer.repository().path());
    let shown: u32 = after.iter().map(|c| c.1).sum();
    let correct: u32 = after.iter().map(|c| c.2).sum();
    assert_eq!((shown, correct), (3, 2));

    let history = trainer.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score, 2);
}

#[test]
fn correct_never_exceeds_shown_across_sessions() {
    let (_dir, mut trainer) = free_form_pool(6);
    let pattern = [Step::Right, Step::Wrong, Step::Right, Step::Right, Step::Wrong];

    for _ in 0..4 {
        let mut practice = Scripted::new(&pattern, 5);
        trainer.practice(&mut practice).unwrap();
        let mut test = Scripted::new(&pattern, 0);
        trainer.test(Some(5), &mut test).unwrap();
    }

    let after = counters(trainer.repository().path());
    assert!(after.iter().all(|(_, shown, correct)| correct <= shown));
    let shown: u32 = after.iter().map(|c| c.1).sum();
    let correct: u32 = after.iter().map(|c| c.2).sum();
    assert_eq!(shown, 40);
    assert_eq!(correct, 24);
    assert_eq!(trainer.history().unwrap().len(), 4);
}

#[test]
fn correct_answer_bumps_only_its_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = QuestionRepository::open_or_init(dir.path().join("questions.csv")).unwrap();
    for id in 1..=3 {
        repo.append(NewQuestion::free_form(format!("Q{id}"), format!("A{id}")))
            .unwrap();
    }
    let mut rng = StdRng::seed_from_u64(8);

    let record = repo.get(2).unwrap().clone();
    let view = present(&record, &mut rng);
    let outcome = evaluate(&record, &view, " a2 ").unwrap();
    assert!(outcome.correct);
    record_outcome(&mut repo, &outcome).unwrap();

    assert_eq!(
        counters(repo.path()),
        vec![(1, 0, 0), (2, 1, 1), (3, 0, 0)]
    );
}

#[test]
fn out_of_range_choice_mutates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = QuestionRepository::open_or_init(dir.path().join("questions.csv")).unwrap();
    repo.append(NewQuestion::multiple_choice("Q1", "A1", ["A1", "B", "C", "D"]))
        .unwrap();
    let before = std::fs::read(repo.path()).unwrap();
    let mut rng = StdRng::seed_from_u64(9);

    let record = repo.get(1).unwrap().clone();
    let view = present(&record, &mut rng);
    let err = evaluate(&record, &view, "5").unwrap_err();
    assert!(matches!(err, QuizError::Validation(_)));
    assert_eq!(std::fs::read(repo.path()).unwrap(), before);
}

#[test]
fn multiple_choice_test_uses_displayed_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = QuestionRepository::open_or_init(dir.path().join("questions.csv")).unwrap();
    for id in 1..=5 {
        repo.append(NewQuestion::multiple_choice(
            format!("Q{id}"),
            format!("A{id}"),
            [format!("A{id}"), "x".into(), "y".into(), "z".into()],
        ))
        .unwrap();
    }
    let log = ResultsLog::new(dir.path().join("results.txt"));
    let mut trainer = Trainer::new(repo, log, TrainerConfig::default());
    let steps = [Step::Right, Step::Wrong, Step::Right, Step::Right, Step::Right];
    let mut responder = Scripted::new(&steps, 0);

    let report = trainer.test(Some(5), &mut responder).unwrap();
    assert_eq!(report.score, 4);
}

#[test]
fn disabled_questions_are_never_asked() {
    let (_dir, mut trainer) = free_form_pool(7);
    trainer.set_active(1, false).unwrap();
    trainer.set_active(2, false).unwrap();

    let mut responder = Scripted::new(&[Step::Right; 5], 0);
    trainer.test(Some(5), &mut responder).unwrap();

    let after = counters(trainer.repository().path());
    assert_eq!(&after[..2], &[(1, 0, 0), (2, 0, 0)]);
    assert!(after[2..].iter().all(|c| c.1 == 1));
}

#[test]
fn reload_sees_questions_added_by_another_writer() {
    let (_dir, mut trainer) = free_form_pool(4);
    let mut responder = Scripted::new(&[Step::Right; 5], 0);
    assert!(matches!(
        trainer.test(Some(5), &mut responder),
        Err(QuizError::InsufficientPool { available: 4, .. })
    ));

    let mut other = QuestionRepository::open(trainer.repository().path()).unwrap();
    other.append(NewQuestion::free_form("Q5", "A5")).unwrap();

    trainer.reload().unwrap();
    assert_eq!(trainer.repository().records().len(), 5);
    let report = trainer.test(Some(5), &mut responder).unwrap();
    assert_eq!(report.score, 5);
}
