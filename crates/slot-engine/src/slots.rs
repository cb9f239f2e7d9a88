//! Bookable slots for a trainer on a day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{SchedulingConfig, Season};
use crate::model::Service;
use crate::occupancy::{OccupancySource, SlotRef};
use crate::time::{SlotTime, TimeRange};

/// What the booking form is asking for: everything the calendar view used to
/// hold as selection state, passed in explicitly.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityRequest<'a> {
    pub trainer_id: &'a str,
    pub date: NaiveDate,
    pub candidate: &'a Service,
    pub season: Season,
    pub range: TimeRange,
}

/// A slot that can take the candidate booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookableSlot {
    pub date: NaiveDate,
    pub time: SlotTime,
    /// Standard places left before this booking is made.
    pub remaining: u32,
}

/// Walk the season's canonical slot list and keep the slots inside
/// `request.range` that do not conflict with the candidate service.
///
/// Opening hours and closed days are not applied here; see
/// [`check_window`](crate::window::check_window).
pub fn available_slots(
    source: &impl OccupancySource,
    config: &SchedulingConfig,
    request: &AvailabilityRequest<'_>,
) -> Vec<BookableSlot> {
    let capacity = config.capacity.for_service(Some(request.candidate));

    let slots: Vec<BookableSlot> = config
        .slots
        .for_season(request.season)
        .iter()
        .copied()
        .filter(|&time| request.range.contains(time))
        .filter_map(|time| {
            let occupancy =
                source.occupancy(SlotRef::new(request.trainer_id, request.date, time));
            if occupancy.conflicts_with(request.candidate, capacity) {
                return None;
            }
            Some(BookableSlot {
                date: request.date,
                time,
                remaining: occupancy.remaining_standard(capacity),
            })
        })
        .collect();

    tracing::debug!(
        trainer_id = request.trainer_id,
        date = %request.date,
        service_id = %request.candidate.id,
        capacity,
        available = slots.len(),
        "computed available slots"
    );
    slots
}
