//! Schedule sinks: where parsed workouts go once a plan has been read.
//!
//! A schedule holds at most one workout per date and workout name. The JSONL
//! sink reads the keys already in the file and appends only new entries, all
//! under one exclusive lock, so re-exporting a plan (even from several
//! processes at once) adds each workout exactly once.

use crate::{Result, ScheduledWorkout};
use chrono::NaiveDate;
use fs2::FileExt;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Identity of a workout within a schedule
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleKey {
    pub date: NaiveDate,
    pub workout_name: String,
}

impl ScheduleKey {
    pub fn of(entry: &ScheduledWorkout) -> Self {
        Self {
            date: entry.date,
            workout_name: entry.workout.name().to_string(),
        }
    }

    /// Key of a rendered `{date, workout}` document
    pub fn from_document(document: &Value) -> Option<Self> {
        let date = document.get("date")?.as_str()?.parse().ok()?;
        let workout_name = document.get("workout")?.get("workoutName")?.as_str()?;
        Some(Self {
            date,
            workout_name: workout_name.to_string(),
        })
    }
}

impl fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.date.format("%Y-%m-%d"), self.workout_name)
    }
}

/// A document read back from a schedule file
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleEntry {
    pub key: ScheduleKey,
    pub document: Value,
}

/// What an export did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    /// Entries whose key was already scheduled
    pub skipped: usize,
}

/// Destination for scheduled workouts
pub trait ScheduleSink {
    /// Add every entry that is not already scheduled
    fn export(&mut self, entries: &[ScheduledWorkout]) -> Result<ExportSummary>;
}

/// JSONL schedule file, one `{date, workout}` document per line
pub struct JsonlScheduleSink {
    path: PathBuf,
}

impl JsonlScheduleSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn export_locked(&self, file: &File, entries: &[ScheduledWorkout]) -> Result<ExportSummary> {
        let mut scheduled: HashSet<ScheduleKey> = scan_entries(file, &self.path)?
            .into_iter()
            .map(|entry| entry.key)
            .collect();

        let mut summary = ExportSummary::default();
        let mut writer = BufWriter::new(file);

        for entry in entries {
            if !scheduled.insert(ScheduleKey::of(entry)) {
                tracing::info!("Already scheduled, skipping {}", entry);
                summary.skipped += 1;
                continue;
            }
            serde_json::to_writer(&mut writer, &entry.render())?;
            writer.write_all(b"\n")?;
            summary.written += 1;
        }

        writer.flush()?;
        Ok(summary)
    }
}

impl ScheduleSink for JsonlScheduleSink {
    fn export(&mut self, entries: &[ScheduledWorkout]) -> Result<ExportSummary> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let summary = self.export_locked(&file, entries);
        file.unlock()?;

        let summary = summary?;
        tracing::debug!(
            "Exported to {:?}: {} written, {} skipped",
            self.path,
            summary.written,
            summary.skipped
        );
        Ok(summary)
    }
}

/// Read every schedule entry from a JSONL file, in file order
pub fn read_schedule(path: &Path) -> Result<Vec<ScheduleEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;
    let entries = scan_entries(&file, path);
    file.unlock()?;

    let entries = entries?;
    tracing::debug!("Read {} schedule entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Lines that are not JSON or carry no date and workout name are skipped
fn scan_entries(file: &File, path: &Path) -> Result<Vec<ScheduleEntry>> {
    let mut entries = Vec::new();

    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let document = match serde_json::from_str::<Value>(&line) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Corrupt schedule line {} in {:?}: {}", line_num + 1, path, e);
                continue;
            }
        };

        match ScheduleKey::from_document(&document) {
            Some(key) => entries.push(ScheduleEntry { key, document }),
            None => tracing::warn!(
                "Schedule line {} in {:?} has no date or workout name",
                line_num + 1,
                path
            ),
        }
    }

    Ok(entries)
}
