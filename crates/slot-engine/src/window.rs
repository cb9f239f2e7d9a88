//! Opening-hours, closed-day and trainer-hours checks for a proposed booking.
//!
//! Separate from the occupancy rules: a slot can be empty and still be
//! rejected here. Results are plain values the booking form turns into
//! field messages.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::config::BusinessHours;
use crate::model::Trainer;
use crate::time::SlotTime;

/// Why a date or time falls outside the bookable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum WindowRejection {
    BeforeOpening { open_hour: u32 },
    AfterClosing { close_hour: u32 },
    ClosedDay { weekday: Weekday },
    OutsideTrainerHours { start: SlotTime, end: SlotTime },
}

impl fmt::Display for WindowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowRejection::BeforeOpening { open_hour } => {
                write!(f, "The studio opens at {:02}:00", open_hour)
            }
            WindowRejection::AfterClosing { close_hour } => {
                write!(f, "The studio closes at {:02}:00", close_hour)
            }
            WindowRejection::ClosedDay { weekday } => {
                write!(f, "The studio is closed on {}", weekday_name(*weekday))
            }
            WindowRejection::OutsideTrainerHours { start, end } => {
                write!(f, "The trainer only works {}-{}", start, end)
            }
        }
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Field-level outcome of the window checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowCheck {
    pub date: Option<WindowRejection>,
    pub time: Option<WindowRejection>,
}

impl WindowCheck {
    pub fn is_ok(&self) -> bool {
        self.date.is_none() && self.time.is_none()
    }
}

pub fn is_closed_day(date: NaiveDate, hours: &BusinessHours) -> bool {
    hours.closed_weekday == Some(date.weekday())
}

/// Check a proposed (date, time) against opening hours, the closed weekday,
/// and, when a trainer is selected, that trainer's working hours.
///
/// Only the hour of `time` is compared with the opening hours, so with
/// `10..20` a booking at 19:30 is accepted and 20:00 is not.
pub fn check_window(
    date: NaiveDate,
    time: SlotTime,
    hours: &BusinessHours,
    trainer: Option<&Trainer>,
) -> WindowCheck {
    let date_rejection = is_closed_day(date, hours).then(|| WindowRejection::ClosedDay {
        weekday: date.weekday(),
    });

    let time_rejection = if time.hour() < hours.open_hour {
        Some(WindowRejection::BeforeOpening {
            open_hour: hours.open_hour,
        })
    } else if time.hour() >= hours.close_hour {
        Some(WindowRejection::AfterClosing {
            close_hour: hours.close_hour,
        })
    } else {
        trainer
            .and_then(|t| t.working_hours)
            .filter(|wh| !wh.contains(time))
            .map(|wh| WindowRejection::OutsideTrainerHours {
                start: wh.start,
                end: wh.end,
            })
    };

    WindowCheck {
        date: date_rejection,
        time: time_rejection,
    }
}
