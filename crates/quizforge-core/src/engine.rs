//! The trainer: one object owning the repository, the results log, and the
//! RNG, exposing everything the menu layer needs.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::QuizConfig;
use crate::error::Result;
use crate::model::{NewQuestion, QuestionRecord};
use crate::repository::QuestionRepository;
use crate::results_log::{ResultsLog, TestReport};
use crate::session::{PracticeSession, PracticeSummary, Responder, TestSession};
use crate::statistics::{statistics_report, StatisticsRow, Totals};

/// Settings the trainer needs beyond file locations.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Questions per test when the caller does not say.
    pub default_test_size: usize,
    /// Characters of question text in statistics rows.
    pub stats_text_width: usize,
    /// Fixed seed for reproducible shuffles and draws.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        let config = QuizConfig::default();
        Self {
            default_test_size: config.default_test_size,
            stats_text_width: config.stats_text_width,
            seed: None,
        }
    }
}

impl From<&QuizConfig> for TrainerConfig {
    fn from(config: &QuizConfig) -> Self {
        Self {
            default_test_size: config.default_test_size,
            stats_text_width: config.stats_text_width,
            seed: config.seed,
        }
    }
}

/// Question store plus practice and test sessions.
pub struct Trainer {
    repo: QuestionRepository,
    tests: TestSession,
    practice: PracticeSession,
    rng: StdRng,
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(repo: QuestionRepository, log: ResultsLog, config: TrainerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            repo,
            tests: TestSession::new(log),
            practice: PracticeSession::new(),
            rng,
            config,
        }
    }

    /// Open (or create) the files named in `config`.
    pub fn from_config(config: &QuizConfig) -> Result<Self> {
        let repo = QuestionRepository::open_or_init(&config.questions_path)?;
        let log = ResultsLog::new(&config.results_path);
        Ok(Self::new(repo, log, TrainerConfig::from(config)))
    }

    pub fn repository(&self) -> &QuestionRepository {
        &self.repo
    }

    pub fn results_log(&self) -> &ResultsLog {
        self.tests.log()
    }

    pub fn default_test_size(&self) -> usize {
        self.config.default_test_size
    }

    pub fn add_question(&mut self, question: NewQuestion) -> Result<QuestionRecord> {
        self.repo.append(question)
    }

    /// Returns whether a question with `id` exists.
    pub fn set_active(&mut self, id: u32, active: bool) -> Result<bool> {
        self.repo.set_active(id, active)
    }

    pub fn statistics(&self) -> Vec<StatisticsRow> {
        statistics_report(self.repo.records(), self.config.stats_text_width)
    }

    pub fn totals(&self) -> Totals {
        Totals::from_records(self.repo.records())
    }

    pub fn practice(&mut self, responder: &mut dyn Responder) -> Result<PracticeSummary> {
        self.practice.run(&mut self.repo, &mut self.rng, responder)
    }

    /// Run a test of `count` questions, or the configured default.
    pub fn test(
        &mut self,
        count: Option<usize>,
        responder: &mut dyn Responder,
    ) -> Result<TestReport> {
        let count = count.unwrap_or(self.config.default_test_size);
        self.tests.run(&mut self.repo, count, &mut self.rng, responder)
    }

    pub fn history(&self) -> Result<Vec<TestReport>> {
        self.tests.log().history()
    }

    /// Pick up changes another process made to the question store.
    pub fn reload(&mut self) -> Result<()> {
        self.repo.load_all()?;
        Ok(())
    }
}
