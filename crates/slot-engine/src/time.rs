//! Slot times and time-range filters.
//!
//! Appointment records arrive with start times in either `HH:MM` or
//! `HH:MM:SS` form. Every comparison in the engine goes through [`SlotTime`],
//! which keeps minute resolution only, so `"14:30"` and `"14:30:00"` are the
//! same slot.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, Result};

/// A wall-clock slot time with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Build a slot time from hour and minute. Returns `None` when out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(SlotTime)
    }

    /// Parse `HH:MM` or `HH:MM:SS`. Seconds are validated, then dropped.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTime` for anything else (single-digit
    /// hours, fractional seconds, out-of-range fields, stray whitespace).
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidTime(s.to_string());

        let bytes = s.as_bytes();
        let shape_ok = match bytes.len() {
            5 => is_hh_mm(bytes),
            8 => is_hh_mm(bytes) && bytes[5] == b':' && is_two_digits(&bytes[6..8]),
            _ => false,
        };
        if !shape_ok {
            return Err(invalid());
        }

        let format = if bytes.len() == 8 { "%H:%M:%S" } else { "%H:%M" };
        let parsed = NaiveTime::parse_from_str(s, format).map_err(|_| invalid())?;

        Self::new(parsed.hour(), parsed.minute()).ok_or_else(invalid)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

fn is_two_digits(b: &[u8]) -> bool {
    b.len() == 2 && b.iter().all(u8::is_ascii_digit)
}

fn is_hh_mm(b: &[u8]) -> bool {
    is_two_digits(&b[0..2]) && b[2] == b':' && is_two_digits(&b[3..5])
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for SlotTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        SlotTime::parse(s)
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SlotTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Normalize a time string to canonical `HH:MM`.
///
/// Idempotent: `normalize_time(&normalize_time(x)?)? == normalize_time(x)?`.
pub fn normalize_time(s: &str) -> Result<String> {
    SlotTime::parse(s).map(|t| t.to_string())
}

/// A half-open `[start, end)` filter over slot times.
///
/// `end == None` means "until midnight", so [`TimeRange::all_day`] admits
/// every slot. Built only through [`TimeRange::new`] or `FromStr`, so `end`
/// is always after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: SlotTime,
    pub end: Option<SlotTime>,
}

impl TimeRange {
    /// # Errors
    /// Returns `EngineError::InvalidConfig` when `end` is not after `start`.
    pub fn new(start: SlotTime, end: SlotTime) -> Result<Self> {
        if end <= start {
            return Err(EngineError::InvalidConfig(format!(
                "time range end {} must be after start {}",
                end, start
            )));
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    pub fn all_day() -> Self {
        Self {
            start: SlotTime(NaiveTime::MIN),
            end: None,
        }
    }

    pub fn contains(&self, time: SlotTime) -> bool {
        time >= self.start && self.end.is_none_or(|end| time < end)
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::all_day()
    }
}

impl FromStr for TimeRange {
    type Err = EngineError;

    /// Parse `"HH:MM-HH:MM"`, or `"HH:MM-"` for an open-ended range.
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            EngineError::InvalidConfig(format!("time range '{}' must look like HH:MM-HH:MM", s))
        })?;
        let start = SlotTime::parse(start.trim())?;
        match end.trim() {
            "" => Ok(Self { start, end: None }),
            end => TimeRange::new(start, SlotTime::parse(end)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_are_dropped() {
        assert_eq!(normalize_time("14:30:59").unwrap(), "14:30");
    }

    #[test]
    fn rejects_single_digit_hour() {
        assert!(SlotTime::parse("9:00").is_err());
    }

    #[test]
    fn open_ended_range_parses() {
        let range: TimeRange = "18:00-".parse().unwrap();
        assert!(range.contains(SlotTime::new(23, 30).unwrap()));
        assert!(!range.contains(SlotTime::new(17, 59).unwrap()));
    }

    #[test]
    fn reversed_or_empty_range_is_rejected() {
        assert!("18:00-10:00".parse::<TimeRange>().is_err());
        assert!("10:00-10:00".parse::<TimeRange>().is_err());
    }
}
