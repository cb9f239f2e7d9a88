//! # slot-engine
//!
//! Appointment availability and booking rules for a fitness studio.
//!
//! Given the appointments a booking view has already loaded, the engine
//! answers whether a trainer's slot can take another booking, how many
//! standard places remain, and which slots of a day are still bookable. VIP-only
//! packages reserve a slot outright; standard packages share it up to a
//! capacity the caller supplies.
//!
//! Everything is a pure function over in-memory data. There is no I/O and no
//! shared state; the caller owns loading and persisting records.
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` / `HH:MM:SS` normalization and time-range filters
//! - [`model`] — appointments, services, trainers, status transitions
//! - [`catalog`] — service lookup and VIP/standard classification
//! - [`config`] — canonical slot lists, opening hours, capacity policy
//! - [`occupancy`] — per-slot counts and the conflict predicate
//! - [`index`] — grouped occupancy for many-slot queries
//! - [`slots`] — bookable slots for a trainer on a day
//! - [`window`] — opening hours, closed day, trainer hours
//! - [`booking`] — field-level validation for the booking form
//! - [`calendar`] — weekly grid and monthly summary
//! - [`sessions`] — sessions left on a member's package
//! - [`payment`] — proportional splits and card commission
//! - [`error`] — Error types

pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod occupancy;
pub mod payment;
pub mod sessions;
pub mod slots;
pub mod time;
pub mod window;

pub use booking::{validate_booking, BookingContext, BookingDraft, BookingValidation};
pub use catalog::ServiceCatalog;
pub use config::{CapacityPolicy, SchedulingConfig, Season};
pub use error::EngineError;
pub use index::SlotIndex;
pub use model::{Appointment, AppointmentStatus, Service, StudioSnapshot, Trainer};
pub use occupancy::{has_conflict, remaining_standard_slots, AppointmentScan, SlotRef};
pub use slots::{available_slots, AvailabilityRequest, BookableSlot};
pub use time::{normalize_time, SlotTime, TimeRange};
pub use window::check_window;
