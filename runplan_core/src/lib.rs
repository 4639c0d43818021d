#![forbid(unsafe_code)]

//! Core domain model and parser for CSV running plans.
//!
//! This crate provides:
//! - Token converters (durations, distances, paces, heart-rate zones)
//! - The typed workout model and its platform document rendering
//! - The line tokenizer, step grammar and indentation tree builder
//! - Cell and plan parsing into dated workouts
//! - Canonical cell text emission and a de-duplicating schedule file

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod convert;
pub mod document;
pub mod tokenizer;
pub mod grammar;
pub mod tree;
pub mod plan;
pub mod emit;
pub mod sink;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use tokenizer::{parse_line, ParsedLine};
pub use grammar::{parse_end_condition_and_target, parse_step, parse_target};
pub use tree::build_step_tree;
pub use plan::{parse_training_plan, parse_training_plan_file, parse_workout_text, PlanTable};
pub use sink::{
    read_schedule, ExportSummary, JsonlScheduleSink, ScheduleEntry, ScheduleKey, ScheduleSink,
};
