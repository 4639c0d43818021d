//! Step grammar: end conditions, targets and step keywords.
//!
//! A step value reads `<end condition> [@ <target>]`, for example
//! `15:00 @z2`, `2km @5:00-4:30` or `lap-button`. Targets and end
//! conditions that cannot be read degrade to `NoTarget` and
//! `LapButton` with a warning so that one bad cell never sinks a plan.
//! Tokens that match the grammar but carry impossible values (`15:75`,
//! `0:00`) are still hard errors.

use crate::convert::{self, DISTANCE_RE, DURATION_RE, HR_ZONE_RE, LAP_BUTTON, PACE_TARGET_RE};
use crate::tokenizer::ParsedLine;
use crate::types::*;
use crate::Result;

/// Keyword of a repeat group line
pub const REPEAT_KEYWORD: &str = "repeat";
/// Keyword of a note line
pub const NOTE_KEYWORD: &str = "note";

/// Keywords whose steps are marked as cross-training
pub const CROSS_TRAINING_KEYWORDS: &[&str] = &["other", "stair"];

/// What a line keyword stands for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeywordKind {
    Step(StepType),
    Repeat,
    Note,
}

/// Look up a lowercased keyword in the step keyword table
pub fn lookup_keyword(keyword: &str) -> Option<KeywordKind> {
    let kind = match keyword {
        "warmup" => KeywordKind::Step(StepType::Warmup),
        "cooldown" => KeywordKind::Step(StepType::Cooldown),
        "run" | "interval" | "go" | "other" | "stair" => KeywordKind::Step(StepType::Interval),
        "recover" | "recovery" => KeywordKind::Step(StepType::Recover),
        "rest" => KeywordKind::Step(StepType::Rest),
        REPEAT_KEYWORD => KeywordKind::Repeat,
        NOTE_KEYWORD => KeywordKind::Note,
        _ => return None,
    };
    Some(kind)
}

pub fn is_cross_training(keyword: &str) -> bool {
    CROSS_TRAINING_KEYWORDS.contains(&keyword)
}

/// Parse the text after `@`
pub fn parse_target(text: &str) -> Result<Target> {
    let text = text.trim();

    if HR_ZONE_RE.is_match(text) {
        let zone = convert::parse_hr_zone(text)?;
        return Ok(Target::HeartRateZone(HeartRateZoneTarget::new(zone)?));
    }

    if PACE_TARGET_RE.is_match(text) {
        let (min_speed, max_speed) = convert::parse_pace_range(text)?;
        return Ok(Target::Pace(PaceTarget::new(min_speed, max_speed)?));
    }

    tracing::warn!("Unknown target format: {}, using no target", text);
    Ok(Target::NoTarget)
}

/// Parse a step value such as `15:00 @z2` into its end condition and target
pub fn parse_end_condition_and_target(value: &str) -> Result<(EndCondition, Target)> {
    let value = value.trim();

    let (condition, target) = match value.split_once('@') {
        Some((condition, target)) => (condition.trim(), parse_target(target)?),
        None => (value, Target::NoTarget),
    };

    if condition.eq_ignore_ascii_case(LAP_BUTTON) {
        return Ok((EndCondition::LapButton, target));
    }

    if DURATION_RE.is_match(condition) {
        let end = match convert::parse_duration(condition)? {
            Some(seconds) => EndCondition::Time(TimeEndCondition::new(seconds)?),
            None => EndCondition::LapButton,
        };
        return Ok((end, target));
    }

    if DISTANCE_RE.is_match(condition) {
        let meters = convert::parse_distance(condition)?;
        let end = EndCondition::Distance(DistanceEndCondition::new(meters)?);
        return Ok((end, target));
    }

    tracing::warn!(
        "Could not parse end condition: {}, using lap button",
        condition
    );
    Ok((EndCondition::LapButton, target))
}

/// Turn a tokenized line into an executable step.
///
/// `repeat` and `note` lines never become steps here; the tree builder
/// owns both. Unknown keywords are dropped with a warning.
pub fn parse_step(line: &ParsedLine) -> Result<Option<ExecutableStep>> {
    let step_type = match lookup_keyword(&line.keyword) {
        Some(KeywordKind::Step(step_type)) => step_type,
        Some(KeywordKind::Note) => {
            tracing::debug!("Skipping note: {}", line.value);
            return Ok(None);
        }
        Some(KeywordKind::Repeat) => return Ok(None),
        None => {
            tracing::warn!("Unknown step keyword: {}", line.keyword);
            return Ok(None);
        }
    };

    let (end_condition, target) = parse_end_condition_and_target(&line.value)?;

    let step = ExecutableStep::new(step_type, &line.keyword, end_condition, target)
        .with_description(line.notes.clone())
        .with_cross_training(is_cross_training(&line.keyword));

    Ok(Some(step))
}
