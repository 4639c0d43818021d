//! Converters for the short tokens used inside workout cells.
//!
//! Durations, distances, pace ranges and heart-rate zones are turned into
//! plain numbers here. Every function fails with [`Error::Format`] on input
//! it cannot read; none of them fall back to a default.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

pub const METERS_PER_METER: f64 = 1.0;
pub const METERS_PER_KILOMETER: f64 = 1000.0;
pub const METERS_PER_MILE: f64 = 1609.344;
pub const METERS_PER_YARD: f64 = 0.9144;

/// Literal used for "ends when the lap button is pressed"
pub const LAP_BUTTON: &str = "lap-button";

pub(crate) static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}):(\d{2})$").unwrap());

pub(crate) static DISTANCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(km|kilometers|mi|miles|m|meters|yds|yd)$").unwrap()
});

pub(crate) static PACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})\s*(mpk|mpm)?$").unwrap()
});

/// Pace as written after `@`: the unit suffix must follow the second time directly
pub(crate) static PACE_TARGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\d{1,2}:\d{2}\s*-\s*\d{1,2}:\d{2}(mpk|mpm)?$").unwrap()
});

pub(crate) static HR_ZONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^z([1-5])$").unwrap());

/// Distance unit a pace is expressed against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaceUnit {
    /// Minutes per kilometre (`mpk`, the default)
    PerKilometer,
    /// Minutes per mile (`mpm`)
    PerMile,
}

impl PaceUnit {
    fn from_suffix(suffix: Option<&str>) -> Self {
        match suffix.map(|s| s.to_ascii_lowercase()) {
            Some(s) if s == "mpm" => PaceUnit::PerMile,
            _ => PaceUnit::PerKilometer,
        }
    }

    /// Meters covered by one unit of this pace
    pub fn meters(self) -> f64 {
        match self {
            PaceUnit::PerKilometer => METERS_PER_KILOMETER,
            PaceUnit::PerMile => METERS_PER_MILE,
        }
    }
}

/// Parse a `mm:ss` / `mmm:ss` duration into seconds.
///
/// `lap-button` (any case) yields `Ok(None)`: the step has no fixed duration.
pub fn parse_duration(text: &str) -> Result<Option<u32>> {
    let text = text.trim();
    if text.eq_ignore_ascii_case(LAP_BUTTON) {
        return Ok(None);
    }

    let caps = DURATION_RE.captures(text).ok_or_else(|| {
        Error::Format(format!(
            "Invalid duration format: {}. Expected mm:ss or mmm:ss",
            text
        ))
    })?;

    let minutes = parse_number::<u32>(&caps[1], text)?;
    let seconds = parse_number::<u32>(&caps[2], text)?;
    if seconds >= 60 {
        return Err(Error::Format(format!(
            "Invalid seconds value in {}: {} must be < 60",
            text, seconds
        )));
    }

    Ok(Some(minutes * 60 + seconds))
}

/// Parse a distance with unit (`2km`, `1600m`, `3 mi`, `100yds`) into meters
pub fn parse_distance(text: &str) -> Result<f64> {
    let text = text.trim();
    let caps = DISTANCE_RE
        .captures(text)
        .ok_or_else(|| Error::Format(format!("Invalid distance format: {}", text)))?;

    let value = parse_number::<f64>(&caps[1], text)?;
    let per_unit = match caps[2].to_ascii_lowercase().as_str() {
        "m" | "meters" => METERS_PER_METER,
        "km" | "kilometers" => METERS_PER_KILOMETER,
        "mi" | "miles" => METERS_PER_MILE,
        "yd" | "yds" => METERS_PER_YARD,
        other => {
            return Err(Error::Format(format!("Unknown distance unit: {}", other)));
        }
    };

    Ok(value * per_unit)
}

/// Parse a pace range (`5:00-4:30`, `8:00-7:00mpm`) into `(min, max)` speeds in m/s.
///
/// The first pace is the slow end and becomes the minimum speed; the second
/// is the fast end and becomes the maximum. Nothing is re-sorted here.
pub fn parse_pace_range(text: &str) -> Result<(f64, f64)> {
    let text = text.trim();
    let caps = PACE_RE.captures(text).ok_or_else(|| {
        Error::Format(format!(
            "Invalid pace format: {}. Expected mm:ss-mm:ss",
            text
        ))
    })?;

    let slow_seconds = pace_seconds(&caps[1], &caps[2], text)?;
    let fast_seconds = pace_seconds(&caps[3], &caps[4], text)?;
    let unit = PaceUnit::from_suffix(caps.get(5).map(|m| m.as_str()));

    let min_speed_mps = unit.meters() / f64::from(slow_seconds);
    let max_speed_mps = unit.meters() / f64::from(fast_seconds);

    Ok((min_speed_mps, max_speed_mps))
}

/// Parse a heart-rate zone token `z1`..`z5`
pub fn parse_hr_zone(text: &str) -> Result<u8> {
    let text = text.trim();
    let caps = HR_ZONE_RE
        .captures(text)
        .ok_or_else(|| Error::Format(format!("Invalid HR zone: {}. Expected z1-z5", text)))?;
    parse_number::<u8>(&caps[1], text)
}

fn pace_seconds(minutes: &str, seconds: &str, text: &str) -> Result<u32> {
    let minutes = parse_number::<u32>(minutes, text)?;
    let seconds = parse_number::<u32>(seconds, text)?;
    if seconds >= 60 {
        return Err(Error::Format(format!(
            "Invalid seconds value in pace {}: {} must be < 60",
            text, seconds
        )));
    }

    let total = minutes * 60 + seconds;
    if total == 0 {
        return Err(Error::Format(format!("Pace cannot be zero: {}", text)));
    }
    Ok(total)
}

fn parse_number<T: std::str::FromStr>(digits: &str, text: &str) -> Result<T> {
    digits
        .parse::<T>()
        .map_err(|_| Error::Format(format!("Invalid number {:?} in {}", digits, text)))
}
