//! Workout cell and training plan parsing.
//!
//! A plan is a table with one row per week and one column per weekday
//! (`Monday`..`Sunday`, any case), plus an optional `WEEK`/`Week` column.
//! Each non-blank day cell holds one workout:
//!
//! ```text
//! running: 10k Speed
//! - warmup: 15:00
//! - repeat: 8
//!   - run: 2:00 @z4
//!   - recover: 1:30 @z1
//! - cooldown: 15:00
//! ```

use crate::tokenizer;
use crate::tree::build_step_tree;
use crate::{Error, Result, ScheduledWorkout, Workout};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Weekday columns in offset order (Monday = 0)
pub const DAY_COLUMNS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Accepted headers for the week-number column
pub const WEEK_COLUMNS: [&str; 2] = ["WEEK", "Week"];

/// The only sport keyword accepted in a cell header
pub const RUNNING_SPORT: &str = "running";

/// Name used when a header carries none
pub const DEFAULT_WORKOUT_NAME: &str = "Workout";

// ============================================================================
// Table Input
// ============================================================================

/// A plan table with every cell kept as text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PlanTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self { headers, rows }
    }

    /// Read a table from CSV text; the first record is the header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(headers, rows))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the column with exactly this (trimmed) header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text; missing cells read as the empty string
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

// ============================================================================
// Cell Parsing
// ============================================================================

/// Parse one workout cell.
///
/// `Ok(None)` means the cell was dropped on purpose (blank, not a running
/// workout, or no usable steps). `Err` means a step carried an impossible
/// value.
pub fn parse_workout_text(cell: &str) -> Result<Option<Workout>> {
    let mut lines = cell.lines().skip_while(|l| l.trim().is_empty());

    let header = match lines.next() {
        Some(header) => header.trim(),
        None => return Ok(None),
    };

    let (sport, name) = match header.split_once(':') {
        Some(parts) => parts,
        None => {
            tracing::warn!("Invalid workout header (no colon): {}", header);
            return Ok(None);
        }
    };

    let sport = sport.trim().to_lowercase();
    if sport != RUNNING_SPORT {
        tracing::warn!(
            "Unsupported workout type: {}. Only '{}' is supported.",
            sport,
            RUNNING_SPORT
        );
        return Ok(None);
    }

    let name = match name.trim() {
        "" => DEFAULT_WORKOUT_NAME,
        name => name,
    };

    let parsed = tokenizer::parse_lines(lines);
    if parsed.is_empty() {
        tracing::warn!("No valid steps found in workout: {}", name);
        return Ok(None);
    }

    let steps = build_step_tree(&parsed)?;
    if steps.is_empty() {
        tracing::warn!("Failed to build step tree for workout: {}", name);
        return Ok(None);
    }

    Workout::new(name, steps).map(Some)
}

// ============================================================================
// Plan Parsing
// ============================================================================

/// Parse every day cell of a plan table into dated workouts.
///
/// Week 1 Monday is `start_date`. Results follow row-then-column order,
/// which is only date order if the week numbers are increasing. A table
/// without any weekday column is an error; a cell that fails is logged and
/// skipped.
pub fn parse_training_plan(table: &PlanTable, start_date: NaiveDate) -> Result<Vec<ScheduledWorkout>> {
    let day_columns: Vec<(usize, &str, usize)> = DAY_COLUMNS
        .iter()
        .enumerate()
        .filter_map(|(offset, day)| {
            table
                .headers()
                .iter()
                .position(|h| h.eq_ignore_ascii_case(day))
                .map(|column| (offset, *day, column))
        })
        .collect();

    if day_columns.is_empty() {
        return Err(Error::Plan(format!(
            "No day columns found. Expected some of: {:?}. Got: {:?}",
            DAY_COLUMNS,
            table.headers()
        )));
    }

    tracing::info!(
        "Found day columns: {:?}",
        day_columns.iter().map(|(_, day, _)| *day).collect::<Vec<_>>()
    );

    let week_column = WEEK_COLUMNS
        .iter()
        .find_map(|name| table.column_index(name));

    let mut result = Vec::new();

    for row in 0..table.row_count() {
        let sequential = row as i64 + 1;
        let week = match week_column {
            Some(column) => {
                let text = table.cell(row, column).trim();
                text.parse::<i64>().unwrap_or_else(|_| {
                    tracing::warn!("Invalid week number at row {}: {:?}", row, text);
                    sequential
                })
            }
            None => sequential,
        };

        let week_start = match Duration::try_weeks(week.saturating_sub(1))
            .and_then(|offset| start_date.checked_add_signed(offset))
        {
            Some(date) => date,
            None => {
                tracing::warn!("Week {} at row {} is out of calendar range", week, row);
                continue;
            }
        };

        for &(offset, day, column) in &day_columns {
            let cell = table.cell(row, column).trim();
            if cell.is_empty() {
                continue;
            }

            let date = match week_start.checked_add_signed(Duration::days(offset as i64)) {
                Some(date) => date,
                None => continue,
            };

            match parse_workout_text(cell) {
                Ok(Some(workout)) => {
                    tracing::debug!("Parsed workout: {} for {}", workout.name(), date);
                    result.push(ScheduledWorkout { date, workout });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Failed to parse workout at Week {}, {}: {}", week, day, e);
                }
            }
        }
    }

    tracing::info!("Parsed {} workouts from training plan", result.len());
    Ok(result)
}

/// Open a CSV plan file and parse it
pub fn parse_training_plan_file(path: &Path, start_date: NaiveDate) -> Result<Vec<ScheduledWorkout>> {
    tracing::info!("Parsing training plan from: {:?}", path);
    let table = PlanTable::from_path(path)?;
    parse_training_plan(&table, start_date)
}
