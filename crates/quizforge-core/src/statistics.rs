//! Per-question statistics.

use serde::{Deserialize, Serialize};

use crate::model::QuestionRecord;

/// Default number of characters of question text kept in a report row.
pub const DEFAULT_TEXT_WIDTH: usize = 40;

/// One line of the statistics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRow {
    pub id: u32,
    pub active: bool,
    /// Question text, cut to the requested width.
    pub text: String,
    pub shown: u32,
    pub correct: u32,
    /// `correct / shown * 100`, or 0 for questions never shown.
    pub accuracy: f64,
}

/// Build report rows for `records`, in the order given.
pub fn statistics_report(records: &[QuestionRecord], text_width: usize) -> Vec<StatisticsRow> {
    records
        .iter()
        .map(|r| StatisticsRow {
            id: r.id,
            active: r.active,
            text: truncate(&r.text, text_width),
            shown: r.shown,
            correct: r.correct,
            accuracy: r.accuracy(),
        })
        .collect()
}

/// Overall totals across a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub questions: usize,
    pub active: usize,
    pub shown: u64,
    pub correct: u64,
}

impl Totals {
    pub fn from_records(records: &[QuestionRecord]) -> Self {
        records.iter().fold(Self::default(), |mut t, r| {
            t.questions += 1;
            t.active += usize::from(r.active);
            t.shown += u64::from(r.shown);
            t.correct += u64::from(r.correct);
            t
        })
    }

    pub fn accuracy(&self) -> f64 {
        if self.shown == 0 {
            0.0
        } else {
            self.correct as f64 / self.shown as f64 * 100.0
        }
    }
}

/// Cut `text` to at most `width` characters, marking the cut with `...`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}
