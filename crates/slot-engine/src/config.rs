//! Deployment configuration: canonical slot lists, opening hours, capacity.
//!
//! Loaded from JSON, e.g.
//!
//! ```json
//! {
//!   "slots": { "normal": ["10:00", "11:30"], "holiday": ["11:00"] },
//!   "business_hours": { "open_hour": 10, "close_hour": 20, "closed_weekday": "Sun" },
//!   "capacity": { "fixed": 3 }
//! }
//! ```
//!
//! Capacity has no default. Different studio views historically used
//! different per-slot limits, so the caller must state which one applies.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::Service;
use crate::time::SlotTime;

/// Which canonical slot list is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Normal,
    Holiday,
}

impl std::str::FromStr for Season {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Season::Normal),
            "holiday" => Ok(Season::Holiday),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown season '{}': expected normal or holiday",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotLists {
    pub normal: Vec<SlotTime>,
    #[serde(default)]
    pub holiday: Vec<SlotTime>,
}

impl SlotLists {
    pub fn for_season(&self, season: Season) -> &[SlotTime] {
        match season {
            Season::Normal => &self.normal,
            Season::Holiday => &self.holiday,
        }
    }
}

/// Opening hours as whole hours, `[open_hour, close_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open_hour: u32,
    pub close_hour: u32,
    #[serde(default = "default_closed_weekday")]
    pub closed_weekday: Option<Weekday>,
}

fn default_closed_weekday() -> Option<Weekday> {
    Some(Weekday::Sun)
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open_hour: 10,
            close_hour: 20,
            closed_weekday: default_closed_weekday(),
        }
    }
}

/// Maximum concurrent standard bookings per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Same limit for every slot.
    Fixed(u32),
    /// The candidate service's `max_participants`, or `fallback` when the
    /// service leaves it unset (zero) or is unknown.
    PerService { fallback: u32 },
}

impl CapacityPolicy {
    pub fn for_service(&self, candidate: Option<&Service>) -> u32 {
        match *self {
            CapacityPolicy::Fixed(n) => n,
            CapacityPolicy::PerService { fallback } => candidate
                .map(|s| s.max_participants)
                .filter(|&n| n > 0)
                .unwrap_or(fallback),
        }
    }

    fn floor(&self) -> u32 {
        match *self {
            CapacityPolicy::Fixed(n) => n,
            CapacityPolicy::PerService { fallback } => fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub slots: SlotLists,
    #[serde(default)]
    pub business_hours: BusinessHours,
    pub capacity: CapacityPolicy,
}

impl SchedulingConfig {
    /// The studio's usual timetable: 90-minute slots from 10:00 in the normal
    /// season, a shorter afternoon list on holidays, open 10–20, closed Sundays.
    pub fn standard_hours(capacity: CapacityPolicy) -> Self {
        let slots = |list: &[(u32, u32)]| {
            list.iter()
                .filter_map(|&(h, m)| SlotTime::new(h, m))
                .collect::<Vec<_>>()
        };
        Self {
            slots: SlotLists {
                normal: slots(&[(10, 0), (11, 30), (13, 0), (14, 30), (16, 0), (17, 30), (19, 0)]),
                holiday: slots(&[(11, 0), (12, 30), (14, 0), (15, 30)]),
            },
            business_hours: BusinessHours::default(),
            capacity,
        }
    }

    /// Parse and validate a JSON configuration. Slot lists are sorted and
    /// de-duplicated.
    ///
    /// # Errors
    /// `EngineError::Json` for malformed JSON or time strings,
    /// `EngineError::InvalidConfig` when [`SchedulingConfig::validate`] fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: SchedulingConfig = serde_json::from_str(json)?;
        for list in [&mut config.slots.normal, &mut config.slots.holiday] {
            list.sort();
            list.dedup();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let hours = &self.business_hours;
        if hours.open_hour >= hours.close_hour || hours.close_hour > 24 {
            return Err(EngineError::InvalidConfig(format!(
                "business hours {}-{} must satisfy open < close <= 24",
                hours.open_hour, hours.close_hour
            )));
        }
        if self.capacity.floor() == 0 {
            return Err(EngineError::InvalidConfig(
                "slot capacity must be at least 1".to_string(),
            ));
        }
        if self.slots.normal.is_empty() {
            return Err(EngineError::InvalidConfig(
                "normal season needs at least one slot".to_string(),
            ));
        }
        Ok(())
    }
}
