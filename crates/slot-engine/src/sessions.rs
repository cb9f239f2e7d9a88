//! Session-count arithmetic for multi-session packages.
//!
//! A package sold with `session_count` sessions is drawn down by every
//! booking that was not cancelled, including future scheduled ones.

use crate::model::{Appointment, AppointmentStatus, Service};

/// Non-cancelled bookings `member_id` has made against `service_id`.
pub fn sessions_used(appointments: &[Appointment], member_id: &str, service_id: &str) -> u32 {
    appointments
        .iter()
        .filter(|a| {
            a.member_id == member_id
                && a.service_id == service_id
                && a.status != AppointmentStatus::Cancelled
        })
        .count() as u32
}

/// Sessions left on the member's package. Never negative; overbooking shows
/// as zero.
pub fn remaining_sessions(appointments: &[Appointment], member_id: &str, service: &Service) -> u32 {
    let used = sessions_used(appointments, member_id, &service.id);
    if used > service.session_count {
        tracing::warn!(
            member_id,
            service_id = %service.id,
            used,
            session_count = service.session_count,
            "member has booked more sessions than the package holds"
        );
    }
    service.session_count.saturating_sub(used)
}
