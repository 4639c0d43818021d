//! Core domain types for structured running workouts.
//!
//! This module defines the typed workout model produced by the cell parser:
//! - Targets (none, heart-rate zone, pace range)
//! - End conditions (lap button, time, distance)
//! - Steps (executable steps and nested repeat groups)
//! - Workouts and dated plan entries
//!
//! Values with invariants are only reachable through fallible constructors.

use crate::{Error, Result};
use chrono::NaiveDate;
use std::fmt;

// ============================================================================
// Step, Sport and Discriminator Types
// ============================================================================

/// Kind of an executable step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepType {
    Warmup,
    Cooldown,
    Interval,
    Recover,
    Rest,
}

impl StepType {
    /// Numeric id fixed by the workout platform
    pub fn id(self) -> u8 {
        match self {
            StepType::Warmup => 1,
            StepType::Cooldown => 2,
            StepType::Interval => 3,
            StepType::Recover => 4,
            StepType::Rest => 5,
        }
    }

    /// String key paired with [`StepType::id`]
    pub fn key(self) -> &'static str {
        match self {
            StepType::Warmup => "warmup",
            StepType::Cooldown => "cooldown",
            StepType::Interval => "interval",
            StepType::Recover => "recovery",
            StepType::Rest => "rest",
        }
    }
}

/// Step type id used by repeat groups
pub const REPEAT_STEP_TYPE_ID: u8 = 6;
/// Step type key used by repeat groups
pub const REPEAT_STEP_TYPE_KEY: &str = "repeat";

/// Sport of a workout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SportType {
    #[default]
    Running,
    Cycling,
    Other,
    Swimming,
}

impl SportType {
    pub fn id(self) -> u8 {
        match self {
            SportType::Running => 1,
            SportType::Cycling => 2,
            SportType::Other => 3,
            SportType::Swimming => 4,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SportType::Running => "running",
            SportType::Cycling => "cycling",
            SportType::Other => "other",
            SportType::Swimming => "swimming",
        }
    }
}

// ============================================================================
// Targets
// ============================================================================

/// Heart-rate zone target, zone 1..=5
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeartRateZoneTarget {
    zone: u8,
}

impl HeartRateZoneTarget {
    pub fn new(zone: u8) -> Result<Self> {
        if !(1..=5).contains(&zone) {
            return Err(Error::Model(format!(
                "Heart rate zone must be between 1 and 5, got {}",
                zone
            )));
        }
        Ok(Self { zone })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }
}

/// Pace target expressed as a speed band in meters per second
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaceTarget {
    min_speed_mps: f64,
    max_speed_mps: f64,
}

impl PaceTarget {
    /// Build a pace target; speeds given in the wrong order are swapped.
    pub fn new(min_speed_mps: f64, max_speed_mps: f64) -> Result<Self> {
        for speed in [min_speed_mps, max_speed_mps] {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(Error::Model(format!(
                    "Pace speed must be positive, got {}",
                    speed
                )));
            }
        }

        // pace text lists the slow end first; a reversed range lands here
        let (min_speed_mps, max_speed_mps) = if min_speed_mps > max_speed_mps {
            (max_speed_mps, min_speed_mps)
        } else {
            (min_speed_mps, max_speed_mps)
        };

        Ok(Self {
            min_speed_mps,
            max_speed_mps,
        })
    }

    pub fn min_speed_mps(&self) -> f64 {
        self.min_speed_mps
    }

    pub fn max_speed_mps(&self) -> f64 {
        self.max_speed_mps
    }
}

/// What the athlete aims for during a step
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Target {
    #[default]
    NoTarget,
    HeartRateZone(HeartRateZoneTarget),
    Pace(PaceTarget),
}

// ============================================================================
// End Conditions
// ============================================================================

/// Step ends after a fixed number of seconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeEndCondition {
    duration_seconds: u32,
}

impl TimeEndCondition {
    pub fn new(duration_seconds: u32) -> Result<Self> {
        if duration_seconds == 0 {
            return Err(Error::Model("Step duration must be greater than zero".into()));
        }
        Ok(Self { duration_seconds })
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}

/// Step ends after a fixed distance in meters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceEndCondition {
    distance_meters: f64,
}

impl DistanceEndCondition {
    pub fn new(distance_meters: f64) -> Result<Self> {
        if !(distance_meters.is_finite() && distance_meters > 0.0) {
            return Err(Error::Model(format!(
                "Step distance must be greater than zero, got {}",
                distance_meters
            )));
        }
        Ok(Self { distance_meters })
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }
}

/// How a step terminates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EndCondition {
    #[default]
    LapButton,
    Time(TimeEndCondition),
    Distance(DistanceEndCondition),
}

// ============================================================================
// Steps
// ============================================================================

/// A single executable step (warmup, run, recover, cooldown, ...)
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutableStep {
    pub step_type: StepType,
    /// Keyword the step was written with, lowercased (e.g. `run`, `stair`)
    pub step_type_keyword: String,
    pub end_condition: EndCondition,
    pub target: Target,
    pub description: Option<String>,
    pub is_cross_training: bool,
}

impl ExecutableStep {
    pub fn new(
        step_type: StepType,
        step_type_keyword: &str,
        end_condition: EndCondition,
        target: Target,
    ) -> Self {
        Self {
            step_type,
            step_type_keyword: step_type_keyword.trim().to_lowercase(),
            end_condition,
            target,
            description: None,
            is_cross_training: false,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_cross_training(mut self, is_cross_training: bool) -> Self {
        self.is_cross_training = is_cross_training;
        self
    }

    /// Append a note to the description, one note per line
    pub fn append_description(&mut self, note: &str) {
        self.description = Some(match self.description.take() {
            Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, note),
            _ => note.to_string(),
        });
    }
}

/// A repeat group: its children run `iterations` times
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatStep {
    iterations: u32,
    steps: Vec<WorkoutStep>,
}

impl RepeatStep {
    pub fn new(iterations: u32, steps: Vec<WorkoutStep>) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::Model("Repeat count must be at least 1".into()));
        }
        if steps.is_empty() {
            return Err(Error::Model("Repeat group must contain at least one step".into()));
        }
        Ok(Self { iterations, steps })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn steps(&self) -> &[WorkoutStep] {
        &self.steps
    }

    /// Mutable view of the children; the group itself cannot be emptied
    pub fn steps_mut(&mut self) -> &mut [WorkoutStep] {
        &mut self.steps
    }
}

/// A workout step: either a leaf or a nested repeat group
#[derive(Clone, Debug, PartialEq)]
pub enum WorkoutStep {
    Executable(ExecutableStep),
    Repeat(RepeatStep),
}

impl From<ExecutableStep> for WorkoutStep {
    fn from(step: ExecutableStep) -> Self {
        WorkoutStep::Executable(step)
    }
}

impl From<RepeatStep> for WorkoutStep {
    fn from(step: RepeatStep) -> Self {
        WorkoutStep::Repeat(step)
    }
}

// ============================================================================
// Workout and Plan Entries
// ============================================================================

/// Maximum workout name length accepted by the platform
pub const MAX_WORKOUT_NAME_CHARS: usize = 255;

/// A complete workout with metadata and steps
#[derive(Clone, Debug, PartialEq)]
pub struct Workout {
    name: String,
    sport_type: SportType,
    steps: Vec<WorkoutStep>,
    description: Option<String>,
}

impl Workout {
    /// Build a running workout
    pub fn new(name: impl Into<String>, steps: Vec<WorkoutStep>) -> Result<Self> {
        let name = name.into();
        let len = name.chars().count();
        if len == 0 || len > MAX_WORKOUT_NAME_CHARS {
            return Err(Error::Model(format!(
                "Workout name must be 1 to {} characters, got {}",
                MAX_WORKOUT_NAME_CHARS, len
            )));
        }
        if steps.is_empty() {
            return Err(Error::Model(format!("Workout {:?} has no steps", name)));
        }

        Ok(Self {
            name,
            sport_type: SportType::Running,
            steps,
            description: None,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sport_type(&self) -> SportType {
        self.sport_type
    }

    pub fn steps(&self) -> &[WorkoutStep] {
        &self.steps
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A workout scheduled for a specific date
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledWorkout {
    pub date: NaiveDate,
    pub workout: Workout,
}

impl fmt::Display for ScheduledWorkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.date.format("%Y-%m-%d"), self.workout.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_step(seconds: u32) -> WorkoutStep {
        ExecutableStep::new(
            StepType::Interval,
            "run",
            EndCondition::Time(TimeEndCondition::new(seconds).unwrap()),
            Target::NoTarget,
        )
        .into()
    }

    #[test]
    fn test_pace_target_swaps_reversed_speeds() {
        let pace = PaceTarget::new(4.0, 3.0).unwrap();
        assert_eq!(pace.min_speed_mps(), 3.0);
        assert_eq!(pace.max_speed_mps(), 4.0);

        let pace = PaceTarget::new(3.0, 4.0).unwrap();
        assert_eq!(pace.min_speed_mps(), 3.0);
        assert_eq!(pace.max_speed_mps(), 4.0);
    }

    #[test]
    fn test_pace_target_rejects_non_positive() {
        assert!(PaceTarget::new(0.0, 3.0).is_err());
        assert!(PaceTarget::new(3.0, -1.0).is_err());
        assert!(PaceTarget::new(f64::NAN, 3.0).is_err());
    }

    #[test]
    fn test_hr_zone_bounds() {
        assert!(HeartRateZoneTarget::new(0).is_err());
        assert!(HeartRateZoneTarget::new(6).is_err());
        assert_eq!(HeartRateZoneTarget::new(5).unwrap().zone(), 5);
    }

    #[test]
    fn test_end_conditions_must_be_positive() {
        assert!(TimeEndCondition::new(0).is_err());
        assert!(DistanceEndCondition::new(0.0).is_err());
        assert_eq!(TimeEndCondition::new(90).unwrap().duration_seconds(), 90);
        assert_eq!(DistanceEndCondition::new(400.0).unwrap().distance_meters(), 400.0);
    }

    #[test]
    fn test_executable_step_defaults() {
        let step = ExecutableStep::new(
            StepType::Warmup,
            " WarmUp ",
            EndCondition::Time(TimeEndCondition::new(900).unwrap()),
            Target::NoTarget,
        );
        assert_eq!(step.step_type_keyword, "warmup");
        assert!(!step.is_cross_training);
        assert!(step.description.is_none());
    }

    #[test]
    fn test_append_description() {
        let mut step = ExecutableStep::new(
            StepType::Interval,
            "run",
            EndCondition::LapButton,
            Target::NoTarget,
        );
        step.append_description("first");
        assert_eq!(step.description.as_deref(), Some("first"));
        step.append_description("second");
        assert_eq!(step.description.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_repeat_step_invariants() {
        assert!(RepeatStep::new(0, vec![run_step(60)]).is_err());
        assert!(RepeatStep::new(3, vec![]).is_err());

        let repeat = RepeatStep::new(8, vec![run_step(120), run_step(90)]).unwrap();
        assert_eq!(repeat.iterations(), 8);
        assert_eq!(repeat.steps().len(), 2);
    }

    #[test]
    fn test_workout_invariants() {
        assert!(Workout::new("", vec![run_step(60)]).is_err());
        assert!(Workout::new("x".repeat(256), vec![run_step(60)]).is_err());
        assert!(Workout::new("Empty", vec![]).is_err());

        let workout = Workout::new("x".repeat(255), vec![run_step(60)]).unwrap();
        assert_eq!(workout.sport_type(), SportType::Running);
        assert_eq!(workout.steps().len(), 1);
    }

    #[test]
    fn test_scheduled_workout_display() {
        let entry = ScheduledWorkout {
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            workout: Workout::new("Easy Run", vec![run_step(1800)]).unwrap(),
        };
        assert_eq!(entry.to_string(), "2024-01-08: Easy Run");
    }
}
