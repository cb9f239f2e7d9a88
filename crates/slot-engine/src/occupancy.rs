//! Slot occupancy and the booking conflict predicate.
//!
//! A slot is a (trainer, date, time) triple. Its occupancy counts the
//! `scheduled` appointments in it, split by whether their service is
//! VIP-only. A VIP booking takes the whole slot; standard bookings share it up
//! to the capacity the caller supplies.
//!
//! Nothing here enforces the rule at storage level. Two sessions that both
//! check a slot before either writes can both pass.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{ServiceCatalog, ServiceClass};
use crate::model::{Appointment, Service};
use crate::time::SlotTime;

/// Identifies one bookable slot of one trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef<'a> {
    pub trainer_id: &'a str,
    pub date: NaiveDate,
    pub time: SlotTime,
}

impl<'a> SlotRef<'a> {
    pub fn new(trainer_id: &'a str, date: NaiveDate, time: SlotTime) -> Self {
        Self {
            trainer_id,
            date,
            time,
        }
    }

    /// True when `appointment` is a scheduled booking in this slot.
    pub fn is_occupied_by(&self, appointment: &Appointment) -> bool {
        appointment.status.occupies_slot()
            && appointment.trainer_id == self.trainer_id
            && appointment.date == self.date
            && appointment.time == self.time
    }
}

/// Scheduled bookings in one slot, by service class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotOccupancy {
    pub vip: u32,
    pub standard: u32,
    /// Bookings whose service is missing from the catalog. Reported, never
    /// counted against capacity.
    pub unknown: u32,
}

impl SlotOccupancy {
    pub(crate) fn record(&mut self, class: ServiceClass) {
        match class {
            ServiceClass::Vip => self.vip += 1,
            ServiceClass::Standard => self.standard += 1,
            ServiceClass::Unknown => self.unknown += 1,
        }
    }

    pub fn is_vip_blocked(&self) -> bool {
        self.vip > 0
    }

    /// Standard places still free. Zero whenever a VIP booking holds the slot.
    pub fn remaining_standard(&self, capacity: u32) -> u32 {
        if self.is_vip_blocked() {
            0
        } else {
            capacity.saturating_sub(self.standard)
        }
    }

    /// Whether booking `candidate` here would break the slot rules.
    ///
    /// A VIP occupant blocks everything. A VIP candidate needs the slot free
    /// of known bookings. A standard candidate needs fewer than `capacity`
    /// standard bookings already present.
    pub fn conflicts_with(&self, candidate: &Service, capacity: u32) -> bool {
        if self.is_vip_blocked() {
            return true;
        }
        if candidate.is_vip_only {
            return self.standard > 0;
        }
        self.standard >= capacity
    }
}

/// Anything that can report the occupancy of a slot.
///
/// Implemented by [`AppointmentScan`] (linear scan per query) and by
/// [`SlotIndex`](crate::index::SlotIndex) (grouped once up front). Both must
/// give identical answers.
pub trait OccupancySource {
    fn occupancy(&self, slot: SlotRef<'_>) -> SlotOccupancy;
}

/// Scans the appointment list on every query.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentScan<'a> {
    pub appointments: &'a [Appointment],
    pub catalog: &'a ServiceCatalog,
}

impl<'a> AppointmentScan<'a> {
    pub fn new(appointments: &'a [Appointment], catalog: &'a ServiceCatalog) -> Self {
        Self {
            appointments,
            catalog,
        }
    }
}

impl OccupancySource for AppointmentScan<'_> {
    fn occupancy(&self, slot: SlotRef<'_>) -> SlotOccupancy {
        occupancy(self.appointments, self.catalog, slot)
    }
}

/// Count the scheduled bookings in `slot`.
pub fn occupancy(
    appointments: &[Appointment],
    catalog: &ServiceCatalog,
    slot: SlotRef<'_>,
) -> SlotOccupancy {
    let mut counts = SlotOccupancy::default();
    for appointment in appointments.iter().filter(|a| slot.is_occupied_by(a)) {
        counts.record(catalog.classify(&appointment.service_id));
    }
    tracing::trace!(
        trainer_id = slot.trainer_id,
        date = %slot.date,
        time = %slot.time,
        vip = counts.vip,
        standard = counts.standard,
        unknown = counts.unknown,
        "slot occupancy"
    );
    counts
}

/// Can `candidate` not be booked into `slot`?
pub fn has_conflict(
    appointments: &[Appointment],
    catalog: &ServiceCatalog,
    slot: SlotRef<'_>,
    candidate: &Service,
    capacity: u32,
) -> bool {
    occupancy(appointments, catalog, slot).conflicts_with(candidate, capacity)
}

/// How many more standard bookings fit in `slot`.
pub fn remaining_standard_slots(
    appointments: &[Appointment],
    catalog: &ServiceCatalog,
    slot: SlotRef<'_>,
    capacity: u32,
) -> u32 {
    occupancy(appointments, catalog, slot).remaining_standard(capacity)
}
