//! Tests for the window checks and booking-form validation.

use chrono::NaiveDate;
use slot_engine::booking::{validate_booking, BookingContext, BookingDraft, BookingIssue};
use slot_engine::config::{BusinessHours, CapacityPolicy, SchedulingConfig};
use slot_engine::model::{Appointment, AppointmentStatus, Service, Trainer, WorkingHours};
use slot_engine::window::{check_window, WindowRejection};
use slot_engine::{ServiceCatalog, SlotTime};

fn t(s: &str) -> SlotTime {
    s.parse().unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
}

fn service(id: &str, vip: bool, active: bool) -> Service {
    Service {
        id: id.to_string(),
        name: id.to_string(),
        price: 120_00,
        session_count: 8,
        duration_minutes: 90,
        max_participants: 0,
        is_vip_only: vip,
        is_active: active,
    }
}

fn trainers() -> Vec<Trainer> {
    vec![
        Trainer {
            id: "T1".to_string(),
            name: "Ada".to_string(),
            working_hours: None,
        },
        Trainer {
            id: "T2".to_string(),
            name: "Grace".to_string(),
            working_hours: Some(WorkingHours {
                start: t("14:00"),
                end: t("20:00"),
            }),
        },
    ]
}

fn booked(member: &str, service_id: &str, time: &str) -> Appointment {
    Appointment {
        member_id: member.to_string(),
        trainer_id: "T1".to_string(),
        service_id: service_id.to_string(),
        date: monday(),
        time: t(time),
        status: AppointmentStatus::Scheduled,
        note: None,
    }
}

fn draft(trainer: &str, service_id: &str, date: NaiveDate, time: &str) -> BookingDraft {
    BookingDraft {
        member_id: "m-new".to_string(),
        trainer_id: trainer.to_string(),
        service_id: service_id.to_string(),
        date,
        time: t(time),
    }
}

// ── Window checks ───────────────────────────────────────────────────────────

#[test]
fn before_opening_is_rejected_regardless_of_occupancy() {
    let hours = BusinessHours::default();
    let check = check_window(monday(), t("09:00"), &hours, None);
    assert_eq!(
        check.time,
        Some(WindowRejection::BeforeOpening { open_hour: 10 })
    );
    assert!(check.date.is_none());
}

#[test]
fn closed_weekday_is_rejected_regardless_of_time() {
    let hours = BusinessHours::default();
    let check = check_window(sunday(), t("11:30"), &hours, None);
    assert!(matches!(check.date, Some(WindowRejection::ClosedDay { .. })));
    assert!(check.time.is_none());
}

#[test]
fn no_closed_day_when_unset() {
    let hours = BusinessHours {
        closed_weekday: None,
        ..BusinessHours::default()
    };
    assert!(check_window(sunday(), t("11:30"), &hours, None).is_ok());
}

#[test]
fn trainer_hours_are_checked_when_selected() {
    let hours = BusinessHours::default();
    let trainers = trainers();
    let check = check_window(monday(), t("11:30"), &hours, Some(&trainers[1]));
    assert_eq!(
        check.time,
        Some(WindowRejection::OutsideTrainerHours {
            start: t("14:00"),
            end: t("20:00"),
        })
    );
    assert!(check_window(monday(), t("14:30"), &hours, Some(&trainers[1])).is_ok());
}

// ── Booking validation ──────────────────────────────────────────────────────

struct Fixture {
    appointments: Vec<Appointment>,
    catalog: ServiceCatalog,
    trainers: Vec<Trainer>,
    config: SchedulingConfig,
}

impl Fixture {
    fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments,
            catalog: ServiceCatalog::new([
                service("pilates", false, true),
                service("vip-pt", true, true),
                service("retired", false, false),
            ]),
            trainers: trainers(),
            config: SchedulingConfig::standard_hours(CapacityPolicy::Fixed(3)),
        }
    }

    fn ctx(&self) -> BookingContext<'_> {
        BookingContext {
            appointments: &self.appointments,
            catalog: &self.catalog,
            trainers: &self.trainers,
            config: &self.config,
        }
    }
}

#[test]
fn clean_draft_is_submittable() {
    let fx = Fixture::new(vec![booked("m1", "pilates", "11:30")]);
    let v = validate_booking(&draft("T1", "pilates", monday(), "11:30"), &fx.ctx());

    assert!(v.is_submittable());
    assert_eq!(v.remaining, Some(2));
}

#[test]
fn full_slot_blocks_time_field() {
    let fx = Fixture::new(vec![
        booked("m1", "pilates", "11:30"),
        booked("m2", "pilates", "11:30"),
        booked("m3", "pilates", "11:30"),
    ]);
    let v = validate_booking(&draft("T1", "pilates", monday(), "11:30"), &fx.ctx());

    assert_eq!(v.time, Some(BookingIssue::SlotFull { capacity: 3 }));
    assert!(!v.is_submittable());
    assert_eq!(v.messages().time.as_deref(), Some("This slot is full (3 places)"));
}

#[test]
fn vip_slot_blocks_standard_and_vip_drafts() {
    let fx = Fixture::new(vec![booked("m1", "vip-pt", "11:30")]);

    let standard = validate_booking(&draft("T1", "pilates", monday(), "11:30"), &fx.ctx());
    assert_eq!(standard.time, Some(BookingIssue::VipReserved));
    assert_eq!(standard.remaining, Some(0));

    let vip = validate_booking(&draft("T1", "vip-pt", monday(), "11:30"), &fx.ctx());
    assert_eq!(vip.time, Some(BookingIssue::VipReserved));
}

#[test]
fn vip_draft_into_shared_slot_is_rejected() {
    let fx = Fixture::new(vec![booked("m1", "pilates", "11:30")]);
    let v = validate_booking(&draft("T1", "vip-pt", monday(), "11:30"), &fx.ctx());
    assert_eq!(v.time, Some(BookingIssue::VipNeedsEmptySlot));
}

#[test]
fn window_rejection_takes_precedence_over_occupancy() {
    let fx = Fixture::new(vec![]);
    let v = validate_booking(&draft("T1", "pilates", monday(), "09:00"), &fx.ctx());

    assert!(matches!(
        v.time,
        Some(BookingIssue::Window(WindowRejection::BeforeOpening { .. }))
    ));
    assert_eq!(v.remaining, None);
}

#[test]
fn sunday_sets_date_message() {
    let fx = Fixture::new(vec![]);
    let v = validate_booking(&draft("T1", "pilates", sunday(), "11:30"), &fx.ctx());
    let messages = v.messages();

    assert_eq!(messages.date.as_deref(), Some("The studio is closed on Sunday"));
    assert!(messages.time.is_none());
    assert!(!messages.submittable);
}

#[test]
fn inactive_and_unknown_services_flag_service_field() {
    let fx = Fixture::new(vec![]);

    let retired = validate_booking(&draft("T1", "retired", monday(), "11:30"), &fx.ctx());
    assert_eq!(retired.service, Some(BookingIssue::InactiveService));

    let unknown = validate_booking(&draft("T1", "nope", monday(), "11:30"), &fx.ctx());
    assert_eq!(unknown.service, Some(BookingIssue::UnknownService));
    assert_eq!(unknown.remaining, None);
}

#[test]
fn unknown_trainer_flags_trainer_field() {
    let fx = Fixture::new(vec![]);
    let v = validate_booking(&draft("T9", "pilates", monday(), "11:30"), &fx.ctx());
    assert_eq!(v.trainer, Some(BookingIssue::UnknownTrainer));
    assert!(!v.is_submittable());
}

#[test]
fn revalidating_after_a_change_clears_the_message() {
    let fx = Fixture::new(vec![]);
    let mut d = draft("T2", "pilates", monday(), "11:30");

    let before = validate_booking(&d, &fx.ctx());
    assert!(before.time.is_some());

    d.time = t("15:30");
    let after = validate_booking(&d, &fx.ctx());
    assert!(after.is_submittable());
}
