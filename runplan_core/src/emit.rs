//! Canonical cell text for a parsed workout.
//!
//! The output is the same mini-language the parser reads, so a workout can
//! be written back into a plan table and parsed again to an equal tree.

use crate::convert::{PaceUnit, LAP_BUTTON};
use crate::grammar::{NOTE_KEYWORD, REPEAT_KEYWORD};
use crate::plan::RUNNING_SPORT;
use crate::types::*;

const INDENT: &str = "  ";

impl Workout {
    /// Emit the workout as cell text, header line first
    pub fn to_cell_text(&self) -> String {
        let mut lines = vec![format!("{}: {}", RUNNING_SPORT, self.name())];
        for step in self.steps() {
            emit_step(step, 0, &mut lines);
        }
        lines.join("\n")
    }
}

fn emit_step(step: &WorkoutStep, depth: usize, lines: &mut Vec<String>) {
    let prefix = format!("{}- ", INDENT.repeat(depth));

    match step {
        WorkoutStep::Repeat(group) => {
            lines.push(format!("{}{}: {}", prefix, REPEAT_KEYWORD, group.iterations()));
            for child in group.steps() {
                emit_step(child, depth + 1, lines);
            }
        }
        WorkoutStep::Executable(step) => {
            let mut line = format!(
                "{}{}: {}",
                prefix,
                step.step_type_keyword,
                end_condition_text(&step.end_condition)
            );
            if let Some(target) = target_text(&step.target) {
                line.push_str(" @");
                line.push_str(&target);
            }

            // Only a trimmed first line survives the tokenizer inline
            let description: Vec<&str> = step
                .description
                .as_deref()
                .map(|d| d.split('\n').collect())
                .unwrap_or_default();
            let mut note_lines = description.as_slice();
            if let Some((first, rest)) = description.split_first() {
                if !first.is_empty() && *first == first.trim() {
                    line.push_str("; ");
                    line.push_str(first);
                    note_lines = rest;
                }
            }
            lines.push(line);

            for note in note_lines.iter().filter(|n| !n.is_empty()) {
                lines.push(format!("{}{}: \"{}\"", prefix, NOTE_KEYWORD, note));
            }
        }
    }
}

fn end_condition_text(end: &EndCondition) -> String {
    match end {
        EndCondition::LapButton => LAP_BUTTON.to_string(),
        EndCondition::Time(time) => clock_text(time.duration_seconds()),
        EndCondition::Distance(distance) => format!("{}m", distance.distance_meters()),
    }
}

fn target_text(target: &Target) -> Option<String> {
    match target {
        Target::NoTarget => None,
        Target::HeartRateZone(hr) => Some(format!("z{}", hr.zone())),
        Target::Pace(pace) => Some(pace_text(pace)),
    }
}

/// Slow end first; per mile only when that is the exact unit
fn pace_text(pace: &PaceTarget) -> String {
    let speeds = [pace.min_speed_mps(), pace.max_speed_mps()];

    let exact = |unit: PaceUnit| -> Option<[u32; 2]> {
        let mut seconds = [0u32; 2];
        for (slot, speed) in seconds.iter_mut().zip(speeds) {
            let per_unit = (unit.meters() / speed).round();
            if per_unit < 1.0 || unit.meters() / per_unit != speed {
                return None;
            }
            *slot = per_unit as u32;
        }
        Some(seconds)
    };

    let (seconds, suffix) = match (exact(PaceUnit::PerKilometer), exact(PaceUnit::PerMile)) {
        (Some(seconds), _) => (seconds, ""),
        (None, Some(seconds)) => (seconds, "mpm"),
        (None, None) => (
            speeds.map(|speed| (PaceUnit::PerKilometer.meters() / speed).round().max(1.0) as u32),
            "",
        ),
    };

    format!(
        "{}-{}{}",
        clock_text(seconds[0]),
        clock_text(seconds[1]),
        suffix
    )
}

fn clock_text(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::parse_workout_text;

    fn reparse(text: &str) -> (Workout, Workout) {
        let workout = parse_workout_text(text).unwrap().unwrap();
        let emitted = workout.to_cell_text();
        let again = parse_workout_text(&emitted)
            .unwrap()
            .unwrap_or_else(|| panic!("re-emitted text did not parse:\n{}", emitted));
        (workout, again)
    }

    #[test]
    fn test_emit_intervals() {
        let text = "running: Intervals
- warmup: 15:00 @z2
- repeat: 4
  - run: 2:00 @z4
  - recover: 1:30 @z1
- cooldown: lap-button";
        let workout = parse_workout_text(text).unwrap().unwrap();
        assert_eq!(workout.to_cell_text(), text);
    }

    #[test]
    fn test_reparse_is_structurally_equal() {
        let text = "running: Everything
- warmup: 10:00 @5:30-5:00; settle in
- note: 'relax shoulders'
- repeat: 3
  - run: 1km @4:30-4:10
  - repeat: 2
    - go: 400m @z5
    - rest: 1:00
  - recover: 800 meters
  - note: jog
- other: 20:00; elliptical
- stair: 5:00
- cooldown: 1.5mi @z1";
        let (workout, again) = reparse(text);
        assert_eq!(workout, again);
    }

    #[test]
    fn test_reparse_keeps_mile_paces_exact() {
        let (workout, again) = reparse("running: Miles\n- run: 3mi @8:00-7:00mpm");
        assert_eq!(workout, again);
        assert!(workout.to_cell_text().ends_with("@8:00-7:00mpm"));
    }

    #[test]
    fn test_reparse_yards() {
        let (workout, again) = reparse("running: Strides\n- repeat: 6\n  - run: 100yds\n  - rest: 0:45");
        assert_eq!(workout, again);
    }

    #[test]
    fn test_reparse_empty_inline_note() {
        let (workout, again) = reparse("running: X\n- run: 2:00;");
        assert_eq!(workout, again);
        assert_eq!(workout.to_cell_text(), "running: X\n- run: 2:00");
    }

    #[test]
    fn test_reparse_padded_note() {
        let (workout, again) = reparse("running: X\n- run: 2:00\n- note: \"  padded  \"");
        assert_eq!(workout, again);
        assert_eq!(
            workout.to_cell_text(),
            "running: X\n- run: 2:00\n- note: \"  padded  \""
        );
    }

    #[test]
    fn test_multiline_description_emits_note_lines() {
        let text = "running: Notes\n- run: 2:00; first\n- note: second";
        let workout = parse_workout_text(text).unwrap().unwrap();
        assert_eq!(
            workout.to_cell_text(),
            "running: Notes\n- run: 2:00; first\n- note: \"second\""
        );
    }
}
