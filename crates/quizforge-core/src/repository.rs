//! Flat-file question repository.
//!
//! The store is a CSV table with the header
//! `question_id,text,answer,is_quiz,options,is_active,shown,correct`.
//! New questions are appended as a single row; every other mutation rewrites
//! the whole file. There is no locking: two processes mutating the same store
//! race, and the last full rewrite wins.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::model::{validate_options, Counter, NewQuestion, QuestionKind, QuestionRecord};

/// Column names, in file order.
pub const HEADER: [&str; 8] = [
    "question_id",
    "text",
    "answer",
    "is_quiz",
    "options",
    "is_active",
    "shown",
    "correct",
];

/// One CSV row as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRow {
    question_id: u32,
    text: String,
    answer: String,
    is_quiz: String,
    options: String,
    is_active: String,
    shown: u32,
    correct: u32,
}

impl StoredRow {
    fn from_record(record: &QuestionRecord) -> serde_json::Result<Self> {
        let (is_quiz, options) = match &record.kind {
            QuestionKind::FreeForm => ("no", String::new()),
            QuestionKind::MultipleChoice { options } => ("yes", serde_json::to_string(options)?),
        };

        Ok(Self {
            question_id: record.id,
            text: record.text.clone(),
            answer: record.answer.clone(),
            is_quiz: is_quiz.to_string(),
            options,
            is_active: if record.active { "True" } else { "False" }.to_string(),
            shown: record.shown,
            correct: record.correct,
        })
    }

    fn into_record(self) -> std::result::Result<QuestionRecord, String> {
        if self.question_id == 0 {
            return Err("question_id must be positive".into());
        }
        if self.text.trim().is_empty() {
            return Err(format!("question {} has empty text", self.question_id));
        }
        if self.answer.trim().is_empty() {
            return Err(format!("question {} has empty answer", self.question_id));
        }
        if self.correct > self.shown {
            return Err(format!(
                "question {} has correct ({}) > shown ({})",
                self.question_id, self.correct, self.shown
            ));
        }

        let kind = if parse_flag(&self.is_quiz, &["yes", "y", "true"], &["no", "n", "false"])
            .ok_or_else(|| format!("invalid is_quiz value '{}'", self.is_quiz))?
        {
            let options: Vec<String> = serde_json::from_str(&self.options).map_err(|e| {
                format!("question {} has unreadable options: {e}", self.question_id)
            })?;
            validate_options(&self.answer, &options)
                .map_err(|e| format!("question {}: {e}", self.question_id))?;
            QuestionKind::MultipleChoice { options }
        } else {
            QuestionKind::FreeForm
        };

        let active = parse_flag(&self.is_active, &["true"], &["false"])
            .ok_or_else(|| format!("invalid is_active value '{}'", self.is_active))?;

        Ok(QuestionRecord {
            id: self.question_id,
            text: self.text,
            answer: self.answer,
            kind,
            active,
            shown: self.shown,
            correct: self.correct,
        })
    }
}

fn parse_flag(value: &str, truthy: &[&str], falsy: &[&str]) -> Option<bool> {
    let value = value.trim().to_lowercase();
    if truthy.contains(&value.as_str()) {
        Some(true)
    } else if falsy.contains(&value.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Read and validate every record in the store at `path`.
fn read_store(path: &Path) -> Result<Vec<QuestionRecord>> {
    if !path.exists() {
        return Err(QuizError::storage_read(path, "question store does not exist"));
    }

    let mut reader =
        csv::Reader::from_path(path).map_err(|e| QuizError::storage_read(path, e))?;

    // A zero-byte file is an empty store; anything else must carry the exact header.
    let headers = reader
        .headers()
        .map_err(|e| QuizError::storage_read(path, e))?;
    if !headers.is_empty() && !headers.iter().eq(HEADER.iter().copied()) {
        return Err(QuizError::storage_read(
            path,
            format!(
                "unexpected header '{}', expected '{}'",
                headers.iter().collect::<Vec<_>>().join(","),
                HEADER.join(",")
            ),
        ));
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in reader.deserialize::<StoredRow>().enumerate() {
        let row = row.map_err(|e| QuizError::storage_read(path, e))?;
        let record = row.into_record().map_err(|reason| {
            QuizError::storage_read(path, format!("record {}: {reason}", index + 1))
        })?;
        if !seen.insert(record.id) {
            return Err(QuizError::storage_read(
                path,
                format!("duplicate question_id {}", record.id),
            ));
        }
        records.push(record);
    }

    Ok(records)
}

fn writer_for<W: io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(inner)
}

/// Write `records` to `path` through a temporary sibling file.
fn write_store(path: &Path, records: &[QuestionRecord]) -> Result<()> {
    let tmp = temp_path(path);
    let write = || -> io::Result<()> {
        let mut writer = writer_for(fs::File::create(&tmp)?);
        writer.write_record(HEADER)?;
        for record in records {
            writer.serialize(StoredRow::from_record(record)?)?;
        }
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&tmp);
        QuizError::storage_write(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// The set of questions, held in memory and mirrored to a CSV file.
#[derive(Debug)]
pub struct QuestionRepository {
    path: PathBuf,
    records: Vec<QuestionRecord>,
}

impl QuestionRepository {
    /// Open an existing store and load it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = read_store(&path)?;
        tracing::debug!(
            path = %path.display(),
            count = records.len(),
            "loaded question store"
        );
        Ok(Self { path, records })
    }

    /// Open the store at `path`, creating an empty one (header only) if it
    /// does not exist yet.
    pub fn open_or_init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| QuizError::storage_write(parent, e))?;
            }
            write_store(&path, &[])?;
            tracing::info!(path = %path.display(), "created empty question store");
        }
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory records, in file order.
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn get(&self, id: u32) -> Option<&QuestionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Re-read the whole store from disk, replacing the in-memory copy.
    pub fn load_all(&mut self) -> Result<&[QuestionRecord]> {
        self.records = read_store(&self.path)?;
        Ok(&self.records)
    }

    /// `max(id) + 1` over what is on disk right now.
    ///
    /// Another process can append between this read and the caller's write;
    /// single-user operation accepts that.
    pub fn next_id(&self) -> Result<u32> {
        let on_disk = read_store(&self.path)?;
        Ok(on_disk.iter().map(|r| r.id).max().unwrap_or(0) + 1)
    }

    /// Validate `question`, give it the next id, and append it as one row.
    pub fn append(&mut self, question: NewQuestion) -> Result<QuestionRecord> {
        let id = self.next_id()?;
        let record = question.into_record(id)?;

        let append = || -> io::Result<()> {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            let empty = file.metadata()?.len() == 0;
            let mut writer = writer_for(file);
            if empty {
                writer.write_record(HEADER)?;
            }
            writer.serialize(StoredRow::from_record(&record)?)?;
            writer.flush()
        };
        append().map_err(|e| QuizError::storage_write(&self.path, e))?;

        tracing::info!(id = record.id, quiz = record.is_multiple_choice(), "added question");
        self.records.push(record.clone());
        Ok(record)
    }

    /// Active records only, in store order.
    pub fn active(&self) -> Vec<QuestionRecord> {
        active_subset(&self.records)
    }

    /// Set the active flag on `id`. Returns `false`, writing nothing, when no
    /// record has that id.
    pub fn set_active(&mut self, id: u32, active: bool) -> Result<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "set_active: no such question");
            return Ok(false);
        };
        let mut updated = self.records[index].clone();
        updated.active = active;
        self.commit(index, updated)?;
        tracing::info!(id, active, "updated question availability");
        Ok(true)
    }

    /// Add one to `counter` on `id` and rewrite the store.
    ///
    /// Returns `false` for an unknown id. Raising `correct` past `shown`, or
    /// past `u32::MAX`, is a [`QuizError::Validation`] and leaves the store
    /// untouched.
    pub fn increment_counter(&mut self, id: u32, counter: Counter) -> Result<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, %counter, "increment_counter: no such question");
            return Ok(false);
        };

        let mut updated = self.records[index].clone();
        let bump = |value: u32| {
            value.checked_add(1).ok_or_else(|| {
                QuizError::validation(format!("question {id} {counter} counter is at its maximum"))
            })
        };
        match counter {
            Counter::Shown => updated.shown = bump(updated.shown)?,
            Counter::Correct => {
                if updated.correct >= updated.shown {
                    return Err(QuizError::validation(format!(
                        "question {id} cannot be correct more often than it was shown"
                    )));
                }
                updated.correct = bump(updated.correct)?;
            }
        }

        tracing::debug!(
            id,
            %counter,
            shown = updated.shown,
            correct = updated.correct,
            "counter updated"
        );
        self.commit(index, updated)?;
        Ok(true)
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Rewrite the store with `records[index]` replaced by `updated`. Memory
    /// only changes once the file has been written.
    fn commit(&mut self, index: usize, updated: QuestionRecord) -> Result<()> {
        let mut next = self.records.clone();
        next[index] = updated;
        write_store(&self.path, &next)?;
        self.records = next;
        Ok(())
    }
}

/// Records with `active = true`, preserving order.
pub fn active_subset(records: &[QuestionRecord]) -> Vec<QuestionRecord> {
    records.iter().filter(|r| r.active).cloned().collect()
}
