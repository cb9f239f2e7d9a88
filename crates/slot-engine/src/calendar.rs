//! Read models for the weekly and monthly calendar views.
//!
//! Both views ask about many slots at once, so they take any
//! [`OccupancySource`]; pass a [`SlotIndex`](crate::index::SlotIndex) for
//! large appointment lists.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::config::{SchedulingConfig, Season};
use crate::error::{EngineError, Result};
use crate::occupancy::{OccupancySource, SlotRef};
use crate::time::SlotTime;
use crate::window::{check_window, is_closed_day};

/// One slot of one day in the week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCell {
    pub time: SlotTime,
    pub standard: u32,
    pub vip_blocked: bool,
    pub remaining: u32,
    /// A standard booking could still be made here.
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub closed: bool,
    pub cells: Vec<SlotCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Scheduled bookings at the season's slot times, unknown services
    /// included. Bookings at other times are not counted.
    pub scheduled: u32,
    /// Slots that can still take a standard booking.
    pub open_slots: u32,
}

fn day_column(
    source: &impl OccupancySource,
    trainer_id: &str,
    date: NaiveDate,
    season: Season,
    config: &SchedulingConfig,
) -> DayColumn {
    let capacity = config.capacity.for_service(None);
    let closed = is_closed_day(date, &config.business_hours);

    let cells = config
        .slots
        .for_season(season)
        .iter()
        .map(|&time| {
            let occupancy = source.occupancy(SlotRef::new(trainer_id, date, time));
            let remaining = occupancy.remaining_standard(capacity);
            let in_hours = check_window(date, time, &config.business_hours, None).is_ok();
            SlotCell {
                time,
                standard: occupancy.standard,
                vip_blocked: occupancy.is_vip_blocked(),
                remaining,
                open: in_hours && remaining > 0,
            }
        })
        .collect();

    DayColumn {
        date,
        closed,
        cells,
    }
}

/// Seven day columns, Monday first, for the week containing `date`.
pub fn week_grid(
    source: &impl OccupancySource,
    trainer_id: &str,
    date: NaiveDate,
    season: Season,
    config: &SchedulingConfig,
) -> Vec<DayColumn> {
    date.week(Weekday::Mon)
        .first_day()
        .iter_days()
        .take(7)
        .map(|day| day_column(source, trainer_id, day, season, config))
        .collect()
}

/// One summary per calendar day of `year`-`month`.
///
/// # Errors
/// Returns `EngineError::InvalidDate` when the month does not exist.
pub fn month_summary(
    source: &impl OccupancySource,
    trainer_id: &str,
    year: i32,
    month: u32,
    season: Season,
    config: &SchedulingConfig,
) -> Result<Vec<DaySummary>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidDate(format!("{}-{:02}", year, month)))?;

    let summaries = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let scheduled = config
                .slots
                .for_season(season)
                .iter()
                .map(|&time| {
                    let o = source.occupancy(SlotRef::new(trainer_id, date, time));
                    o.vip + o.standard + o.unknown
                })
                .sum();
            let open_slots = day_column(source, trainer_id, date, season, config)
                .cells
                .iter()
                .filter(|c| c.open)
                .count() as u32;
            DaySummary {
                date,
                scheduled,
                open_slots,
            }
        })
        .collect();

    Ok(summaries)
}
