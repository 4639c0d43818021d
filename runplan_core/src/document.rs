//! Rendering of the workout model into the platform's workout document.
//!
//! Targets and end conditions contribute partial objects that are merged
//! into their step's object. Step order is 0-based among siblings and
//! restarts inside every repeat group.

use crate::types::*;
use serde_json::{json, Map, Value};

/// Step discriminator for executable steps
pub const EXECUTABLE_STEP_DTO: &str = "ExecutableStepDTO";
/// Step discriminator for repeat groups
pub const REPEAT_GROUP_DTO: &str = "RepeatGroupDTO";
/// Marker prefixed to the description of cross-training steps
pub const CROSS_TRAINING_MARKER: &str = "[CROSS TRAINING]";

const END_CONDITION_LAP_BUTTON: u8 = 1;
const END_CONDITION_TIME: u8 = 2;
const END_CONDITION_DISTANCE: u8 = 3;

const TARGET_NO_TARGET: u8 = 1;
const TARGET_HEART_RATE_ZONE: u8 = 4;
const TARGET_PACE: u8 = 6;

impl Target {
    /// Target keys merged into a step document
    pub fn render(&self) -> Map<String, Value> {
        let value = match self {
            Target::NoTarget => json!({
                "targetType": {
                    "workoutTargetTypeId": TARGET_NO_TARGET,
                    "workoutTargetTypeKey": "no.target",
                },
            }),
            Target::HeartRateZone(hr) => json!({
                "targetType": {
                    "workoutTargetTypeId": TARGET_HEART_RATE_ZONE,
                    "workoutTargetTypeKey": "heart.rate.zone",
                },
                "zoneNumber": hr.zone(),
            }),
            Target::Pace(pace) => json!({
                "targetType": {
                    "workoutTargetTypeId": TARGET_PACE,
                    "workoutTargetTypeKey": "pace.zone",
                },
                "targetValueOne": pace.min_speed_mps(),
                "targetValueTwo": pace.max_speed_mps(),
            }),
        };
        into_map(value)
    }
}

impl EndCondition {
    /// End-condition keys merged into a step document
    pub fn render(&self) -> Map<String, Value> {
        let value = match self {
            EndCondition::LapButton => json!({
                "endCondition": {
                    "conditionTypeKey": "lap.button",
                    "conditionTypeId": END_CONDITION_LAP_BUTTON,
                },
                "endConditionValue": null,
            }),
            EndCondition::Time(time) => json!({
                "endCondition": {
                    "conditionTypeKey": "time",
                    "conditionTypeId": END_CONDITION_TIME,
                },
                "endConditionValue": time.duration_seconds(),
                "preferredEndConditionUnit": { "unitKey": "second" },
            }),
            EndCondition::Distance(distance) => json!({
                "endCondition": {
                    "conditionTypeKey": "distance",
                    "conditionTypeId": END_CONDITION_DISTANCE,
                },
                "endConditionValue": distance.distance_meters(),
                "preferredEndConditionUnit": { "unitKey": "meter" },
            }),
        };
        into_map(value)
    }
}

impl ExecutableStep {
    /// Description as sent to the platform, with the cross-training marker applied
    pub fn rendered_description(&self) -> Option<String> {
        let note = self.description.as_deref().filter(|d| !d.is_empty());
        match (self.is_cross_training, note) {
            (true, Some(note)) => Some(format!("{} {}", CROSS_TRAINING_MARKER, note)),
            (true, None) => Some(CROSS_TRAINING_MARKER.to_string()),
            (false, note) => note.map(str::to_string),
        }
    }

    pub fn render(&self, step_order: usize) -> Value {
        let mut doc = into_map(json!({
            "type": EXECUTABLE_STEP_DTO,
            "stepId": null,
            "stepOrder": step_order,
            "childStepId": null,
            "description": self.rendered_description(),
            "stepType": {
                "stepTypeId": self.step_type.id(),
                "stepTypeKey": self.step_type.key(),
            },
        }));
        doc.extend(self.end_condition.render());
        doc.extend(self.target.render());
        Value::Object(doc)
    }
}

impl RepeatStep {
    pub fn render(&self, step_order: usize) -> Value {
        json!({
            "type": REPEAT_GROUP_DTO,
            "stepId": null,
            "stepOrder": step_order,
            "childStepId": null,
            "numberOfIterations": self.iterations(),
            "stepType": {
                "stepTypeId": REPEAT_STEP_TYPE_ID,
                "stepTypeKey": REPEAT_STEP_TYPE_KEY,
            },
            "workoutSteps": render_steps(self.steps()),
        })
    }
}

impl WorkoutStep {
    pub fn render(&self, step_order: usize) -> Value {
        match self {
            WorkoutStep::Executable(step) => step.render(step_order),
            WorkoutStep::Repeat(step) => step.render(step_order),
        }
    }
}

impl Workout {
    /// Full workout payload: one segment holding every step
    pub fn render(&self) -> Value {
        let sport = self.sport_type();
        let sport_doc = json!({
            "sportTypeId": sport.id(),
            "sportTypeKey": sport.key(),
        });

        json!({
            "sportType": sport_doc.clone(),
            "workoutName": self.name(),
            "description": self.description(),
            "workoutSegments": [
                {
                    "segmentOrder": 1,
                    "sportType": sport_doc,
                    "workoutSteps": render_steps(self.steps()),
                }
            ],
        })
    }
}

impl ScheduledWorkout {
    /// `{"date": "YYYY-MM-DD", "workout": <workout document>}`
    pub fn render(&self) -> Value {
        json!({
            "date": self.date.format("%Y-%m-%d").to_string(),
            "workout": self.workout.render(),
        })
    }
}

fn render_steps(steps: &[WorkoutStep]) -> Vec<Value> {
    steps
        .iter()
        .enumerate()
        .map(|(order, step)| step.render(order))
        .collect()
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
