//! Pre-grouped occupancy for views that query many slots at once.
//!
//! The weekly and monthly calendars ask about every slot of every day. Rather
//! than rescanning the appointment list per cell, [`SlotIndex`] groups the
//! scheduled bookings by (trainer, date, time) once.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::catalog::ServiceCatalog;
use crate::model::Appointment;
use crate::occupancy::{OccupancySource, SlotOccupancy, SlotRef};
use crate::time::SlotTime;

#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    by_trainer: HashMap<String, HashMap<(NaiveDate, SlotTime), SlotOccupancy>>,
}

impl SlotIndex {
    /// Group every scheduled appointment. Non-scheduled rows are skipped.
    pub fn build(appointments: &[Appointment], catalog: &ServiceCatalog) -> Self {
        let mut by_trainer: HashMap<String, HashMap<(NaiveDate, SlotTime), SlotOccupancy>> =
            HashMap::new();

        for appointment in appointments.iter().filter(|a| a.status.occupies_slot()) {
            by_trainer
                .entry(appointment.trainer_id.clone())
                .or_default()
                .entry((appointment.date, appointment.time))
                .or_default()
                .record(catalog.classify(&appointment.service_id));
        }

        tracing::debug!(
            trainers = by_trainer.len(),
            slots = by_trainer.values().map(HashMap::len).sum::<usize>(),
            "built slot index"
        );
        Self { by_trainer }
    }

    /// Number of distinct occupied slots across all trainers.
    pub fn occupied_slots(&self) -> usize {
        self.by_trainer.values().map(HashMap::len).sum()
    }
}

impl OccupancySource for SlotIndex {
    fn occupancy(&self, slot: SlotRef<'_>) -> SlotOccupancy {
        self.by_trainer
            .get(slot.trainer_id)
            .and_then(|days| days.get(&(slot.date, slot.time)))
            .copied()
            .unwrap_or_default()
    }
}
