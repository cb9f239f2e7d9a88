//! Validation state for the appointment booking form.
//!
//! Every time the operator changes the date, time, trainer or service, the
//! form calls [`validate_booking`] again and shows whatever messages come
//! back next to the matching fields. Submission is allowed only when
//! [`BookingValidation::is_submittable`] holds.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::ServiceCatalog;
use crate::config::SchedulingConfig;
use crate::model::{Appointment, Trainer};
use crate::occupancy::{occupancy, SlotRef};
use crate::time::SlotTime;
use crate::window::{check_window, WindowRejection};

/// The fields of a booking the operator has filled in so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub member_id: String,
    pub trainer_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub time: SlotTime,
}

/// Everything already loaded by the view that the checks read from.
#[derive(Debug, Clone, Copy)]
pub struct BookingContext<'a> {
    pub appointments: &'a [Appointment],
    pub catalog: &'a ServiceCatalog,
    pub trainers: &'a [Trainer],
    pub config: &'a SchedulingConfig,
}

/// A single reason a field blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingIssue {
    Window(WindowRejection),
    VipReserved,
    SlotFull { capacity: u32 },
    VipNeedsEmptySlot,
    UnknownService,
    InactiveService,
    UnknownTrainer,
}

impl fmt::Display for BookingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingIssue::Window(rejection) => rejection.fmt(f),
            BookingIssue::VipReserved => f.write_str("This slot is reserved for a VIP session"),
            BookingIssue::SlotFull { capacity } => {
                write!(f, "This slot is full ({} places)", capacity)
            }
            BookingIssue::VipNeedsEmptySlot => {
                f.write_str("VIP sessions need a slot with no other bookings")
            }
            BookingIssue::UnknownService => f.write_str("Select a service"),
            BookingIssue::InactiveService => f.write_str("This service is no longer offered"),
            BookingIssue::UnknownTrainer => f.write_str("Select a trainer"),
        }
    }
}

/// Per-field validation state. `None` means the field is fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingValidation {
    pub date: Option<BookingIssue>,
    pub time: Option<BookingIssue>,
    pub trainer: Option<BookingIssue>,
    pub service: Option<BookingIssue>,
    /// Standard places left in the slot, when the slot could be evaluated.
    pub remaining: Option<u32>,
}

/// Field messages as shown next to the form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FieldMessages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub submittable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

impl BookingValidation {
    pub fn is_submittable(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.trainer.is_none() && self.service.is_none()
    }

    pub fn messages(&self) -> FieldMessages {
        let msg = |issue: Option<BookingIssue>| issue.map(|i| i.to_string());
        FieldMessages {
            date: msg(self.date),
            time: msg(self.time),
            trainer: msg(self.trainer),
            service: msg(self.service),
            submittable: self.is_submittable(),
            remaining: self.remaining,
        }
    }
}

/// Run every booking check for `draft`.
///
/// Window problems take precedence on the time field; slot occupancy is only
/// reported when the time itself is acceptable and the service is known.
pub fn validate_booking(draft: &BookingDraft, ctx: &BookingContext<'_>) -> BookingValidation {
    let mut validation = BookingValidation::default();

    let trainer = ctx.trainers.iter().find(|t| t.id == draft.trainer_id);
    if trainer.is_none() {
        validation.trainer = Some(BookingIssue::UnknownTrainer);
    }

    let service = ctx.catalog.get(&draft.service_id);
    match service {
        None => validation.service = Some(BookingIssue::UnknownService),
        Some(s) if !s.is_active => validation.service = Some(BookingIssue::InactiveService),
        Some(_) => {}
    }

    let window = check_window(draft.date, draft.time, &ctx.config.business_hours, trainer);
    validation.date = window.date.map(BookingIssue::Window);
    validation.time = window.time.map(BookingIssue::Window);

    if let (None, Some(service)) = (validation.time, service) {
        let slot = SlotRef::new(&draft.trainer_id, draft.date, draft.time);
        let occupied = occupancy(ctx.appointments, ctx.catalog, slot);
        let capacity = ctx.config.capacity.for_service(Some(service));

        validation.remaining = Some(occupied.remaining_standard(capacity));
        if occupied.conflicts_with(service, capacity) {
            validation.time = Some(if occupied.is_vip_blocked() {
                BookingIssue::VipReserved
            } else if service.is_vip_only {
                BookingIssue::VipNeedsEmptySlot
            } else {
                BookingIssue::SlotFull { capacity }
            });
        }
    }

    tracing::debug!(
        trainer_id = %draft.trainer_id,
        service_id = %draft.service_id,
        date = %draft.date,
        time = %draft.time,
        submittable = validation.is_submittable(),
        "validated booking draft"
    );
    validation
}
