//! Test score reports and the append-only results log.
//!
//! Each finished test adds one line:
//! `Score: <score>/<total> (<pct>%) - <YYYY-MM-DD HH:MM:SS>`.
//! Lines are never rewritten or removed.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The outcome of one test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub score: u32,
    pub total: u32,
    /// `score / total * 100`.
    pub percentage: f64,
    /// Local time the test finished.
    pub timestamp: NaiveDateTime,
}

impl TestReport {
    pub fn new(score: u32, total: u32, timestamp: NaiveDateTime) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };
        Self {
            score,
            total,
            percentage,
            timestamp,
        }
    }

    /// A report stamped with the current local time.
    pub fn now(score: u32, total: u32) -> Self {
        Self::new(score, total, Local::now().naive_local())
    }

    /// Parse a line written by [`fmt::Display`].
    pub fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let rest = line
            .trim()
            .strip_prefix("Score: ")
            .ok_or_else(|| "missing 'Score: ' prefix".to_string())?;
        let (score_part, timestamp) = rest
            .split_once(" - ")
            .ok_or_else(|| "missing timestamp".to_string())?;
        let (fraction, _) = score_part
            .split_once(" (")
            .ok_or_else(|| "missing percentage".to_string())?;
        let (score, total) = fraction
            .split_once('/')
            .ok_or_else(|| format!("bad score '{fraction}'"))?;

        let score: u32 = score
            .parse()
            .map_err(|_| format!("bad score '{score}'"))?;
        let total: u32 = total
            .parse()
            .map_err(|_| format!("bad total '{total}'"))?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| format!("bad timestamp '{timestamp}': {e}"))?;

        Ok(Self::new(score, total, timestamp))
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {}/{} ({:.2}%) - {}",
            self.score,
            self.total,
            self.percentage,
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }
}

/// The results log file.
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one report line, creating the file and its parent directories
    /// if needed.
    pub fn append(&self, report: &TestReport) -> Result<()> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            writeln!(file, "{report}")
        };
        write().map_err(|e| QuizError::storage_write(&self.path, e))?;

        tracing::info!(path = %self.path.display(), %report, "recorded test result");
        Ok(())
    }

    /// Every report in the log, oldest first. A missing log is empty.
    pub fn history(&self) -> Result<Vec<TestReport>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| QuizError::storage_read(&self.path, e))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                TestReport::parse_line(line).map_err(|reason| {
                    QuizError::storage_read(&self.path, format!("line {}: {reason}", i + 1))
                })
            })
            .collect()
    }
}
