//! Records the engine reads: appointments, services and trainers.
//!
//! These mirror the rows the studio database hands to the booking views.
//! The engine never writes them back; the only mutation modeled here is the
//! status change staff apply to an appointment.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::time::SlotTime;

/// Lifecycle of an appointment. Only `Scheduled` occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn occupies_slot(self) -> bool {
        self == AppointmentStatus::Scheduled
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Status changes a staff member can trigger from the appointment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaffAction {
    Start,
    Complete,
    Cancel,
    /// Deleting from the calendar cancels the booking; the row is kept.
    Delete,
}

impl fmt::Display for StaffAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StaffAction::Start => "start",
            StaffAction::Complete => "complete",
            StaffAction::Cancel => "cancel",
            StaffAction::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// A booked session between a member and a trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub member_id: String,
    pub trainer_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    /// Always normalized to minute resolution on deserialization.
    pub time: SlotTime,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Appointment {
    /// Apply a staff action, moving the appointment to its next status.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTransition` when the action makes no sense
    /// for the current status (e.g. starting a cancelled session).
    pub fn apply(&mut self, action: StaffAction) -> Result<AppointmentStatus> {
        use AppointmentStatus::*;

        let next = match (self.status, action) {
            (Scheduled, StaffAction::Start) => InProgress,
            (Scheduled | InProgress, StaffAction::Complete) => Completed,
            (Scheduled | InProgress, StaffAction::Cancel | StaffAction::Delete) => Cancelled,
            (from, action) => return Err(EngineError::InvalidTransition { from, action }),
        };

        tracing::debug!(
            member_id = %self.member_id,
            date = %self.date,
            time = %self.time,
            from = %self.status,
            to = %next,
            "appointment status changed"
        );
        self.status = next;
        Ok(next)
    }
}

/// A bookable package from the studio's service catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Price in minor currency units.
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub session_count: u32,
    #[serde(default, alias = "duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub max_participants: u32,
    #[serde(default, alias = "isVipOnly")]
    pub is_vip_only: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Daily window during which a trainer takes sessions, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: SlotTime,
    pub end: SlotTime,
}

impl WorkingHours {
    pub fn contains(&self, time: SlotTime) -> bool {
        time >= self.start && time < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
}

/// Everything a booking view has loaded: the JSON shape the CLI and the
/// browser bindings accept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioSnapshot {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub trainers: Vec<Trainer>,
}

impl StudioSnapshot {
    /// # Errors
    /// Returns `EngineError::Json` for malformed JSON, unknown statuses or
    /// time strings that are not `HH:MM`/`HH:MM:SS`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn catalog(&self) -> crate::catalog::ServiceCatalog {
        self.services.iter().cloned().collect()
    }

    pub fn trainer(&self, trainer_id: &str) -> Option<&Trainer> {
        self.trainers.iter().find(|t| t.id == trainer_id)
    }
}
