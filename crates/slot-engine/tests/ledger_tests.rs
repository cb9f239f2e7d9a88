//! Tests for status transitions, session counts and payment settlement.

use chrono::NaiveDate;
use slot_engine::model::{Appointment, AppointmentStatus, Service, StaffAction, StudioSnapshot};
use slot_engine::payment::{settle, split_proportionally, PaymentMethod, Tender};
use slot_engine::sessions::{remaining_sessions, sessions_used};
use slot_engine::EngineError;

fn appointment(member: &str, service_id: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        member_id: member.into(),
        trainer_id: "T1".into(),
        service_id: service_id.into(),
        date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        time: "10:00".parse().unwrap(),
        status,
        note: None,
    }
}

fn package(session_count: u32) -> Service {
    Service {
        id: "pack-8".into(),
        name: "8 sessions".into(),
        price: 240_00,
        session_count,
        duration_minutes: 60,
        max_participants: 0,
        is_vip_only: false,
        is_active: true,
    }
}

// ── Status transitions ──────────────────────────────────────────────────────

#[test]
fn scheduled_session_runs_to_completion() {
    let mut a = appointment("m1", "pack-8", AppointmentStatus::Scheduled);
    assert_eq!(a.apply(StaffAction::Start).unwrap(), AppointmentStatus::InProgress);
    assert_eq!(a.apply(StaffAction::Complete).unwrap(), AppointmentStatus::Completed);
    assert_eq!(a.status, AppointmentStatus::Completed);
}

#[test]
fn delete_cancels_a_scheduled_session() {
    let mut a = appointment("m1", "pack-8", AppointmentStatus::Scheduled);
    assert_eq!(a.apply(StaffAction::Delete).unwrap(), AppointmentStatus::Cancelled);
}

#[test]
fn cancelled_session_cannot_be_started() {
    let mut a = appointment("m1", "pack-8", AppointmentStatus::Cancelled);
    let err = a.apply(StaffAction::Start).unwrap_err();

    assert!(matches!(
        err,
        EngineError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            action: StaffAction::Start,
        }
    ));
    assert_eq!(err.to_string(), "Cannot start an appointment that is cancelled");
    assert_eq!(a.status, AppointmentStatus::Cancelled);
}

#[test]
fn in_progress_session_cannot_be_restarted() {
    let mut a = appointment("m1", "pack-8", AppointmentStatus::InProgress);
    assert!(a.apply(StaffAction::Start).is_err());
}

// ── Snapshot parsing ────────────────────────────────────────────────────────

#[test]
fn snapshot_parses_wire_format() {
    let json = r#"{
        "appointments": [
            {"member_id":"m1","trainer_id":"T1","service_id":"s1",
             "date":"2024-06-10","time":"11:30:00","status":"in-progress"}
        ],
        "services": [
            {"id":"s1","name":"VIP","isVipOnly":true,"duration":45,"max_participants":1}
        ]
    }"#;
    let snapshot = StudioSnapshot::from_json_str(json).unwrap();

    assert_eq!(snapshot.appointments[0].time.to_string(), "11:30");
    assert_eq!(snapshot.appointments[0].status, AppointmentStatus::InProgress);
    assert!(snapshot.services[0].is_vip_only);
    assert_eq!(snapshot.services[0].duration_minutes, 45);
    assert!(snapshot.services[0].is_active);
    assert!(snapshot.trainers.is_empty());
}

#[test]
fn snapshot_rejects_free_form_status() {
    let json = r#"{"appointments":[{"member_id":"m1","trainer_id":"T1","service_id":"s1",
        "date":"2024-06-10","time":"11:30","status":"postponed"}]}"#;
    assert!(matches!(
        StudioSnapshot::from_json_str(json),
        Err(EngineError::Json(_))
    ));
}

#[test]
fn snapshot_rejects_malformed_time() {
    let json = r#"{"appointments":[{"member_id":"m1","trainer_id":"T1","service_id":"s1",
        "date":"2024-06-10","time":"11h30"}]}"#;
    assert!(StudioSnapshot::from_json_str(json).is_err());
}

// ── Sessions ────────────────────────────────────────────────────────────────

#[test]
fn cancelled_bookings_do_not_use_sessions() {
    let appointments = vec![
        appointment("m1", "pack-8", AppointmentStatus::Completed),
        appointment("m1", "pack-8", AppointmentStatus::Scheduled),
        appointment("m1", "pack-8", AppointmentStatus::Cancelled),
        appointment("m2", "pack-8", AppointmentStatus::Completed),
        appointment("m1", "other", AppointmentStatus::Completed),
    ];

    assert_eq!(sessions_used(&appointments, "m1", "pack-8"), 2);
    assert_eq!(remaining_sessions(&appointments, "m1", &package(8)), 6);
}

#[test]
fn overbooked_package_reports_zero() {
    let appointments = vec![
        appointment("m1", "pack-8", AppointmentStatus::Completed),
        appointment("m1", "pack-8", AppointmentStatus::Completed),
    ];
    assert_eq!(remaining_sessions(&appointments, "m1", &package(1)), 0);
}

// ── Payments ────────────────────────────────────────────────────────────────

#[test]
fn split_hands_leftover_cents_to_largest_remainders() {
    // 100 split 1:1:1 → 33.33 each; the extra cent goes to the first.
    assert_eq!(split_proportionally(100, &[1, 1, 1]).unwrap(), vec![34, 33, 33]);
    // 1000 split 2:1 → 666.67 / 333.33
    assert_eq!(split_proportionally(1000, &[2, 1]).unwrap(), vec![667, 333]);
}

#[test]
fn split_with_zero_weights_is_an_error() {
    assert!(matches!(
        split_proportionally(100, &[0, 0]),
        Err(EngineError::InvalidSplit(_))
    ));
    assert!(split_proportionally(100, &[]).is_err());
}

#[test]
fn commission_applies_to_card_tenders_only() {
    let tenders = [
        Tender {
            method: PaymentMethod::Cash,
            amount: 100_00,
        },
        Tender {
            method: PaymentMethod::Card,
            amount: 140_00,
        },
    ];
    let settlement = settle(240_00, &tenders, 250).unwrap();

    assert_eq!(settlement.card_total, 140_00);
    assert_eq!(settlement.commission, 3_50);
    assert_eq!(settlement.net, 236_50);
}

#[test]
fn tenders_must_cover_the_total() {
    let tenders = [Tender {
        method: PaymentMethod::Card,
        amount: 100_00,
    }];
    let err = settle(240_00, &tenders, 250).unwrap_err();
    assert!(matches!(
        err,
        EngineError::PaymentMismatch {
            total: 24000,
            tendered: 10000
        }
    ));
}

#[test]
fn overflowing_tenders_are_rejected() {
    let tenders = [
        Tender {
            method: PaymentMethod::Cash,
            amount: u64::MAX,
        },
        Tender {
            method: PaymentMethod::Cash,
            amount: 2,
        },
    ];
    assert!(matches!(
        settle(1, &tenders, 250),
        Err(EngineError::AmountOverflow)
    ));
}

#[test]
fn commission_rate_above_one_hundred_percent_is_rejected() {
    let tenders = [Tender {
        method: PaymentMethod::Card,
        amount: 10_00,
    }];
    assert!(matches!(
        settle(10_00, &tenders, 20_000),
        Err(EngineError::InvalidRate(20_000))
    ));

    let settlement = settle(10_00, &tenders, 10_000).unwrap();
    assert_eq!(settlement.commission, 10_00);
    assert_eq!(settlement.net, 0);
}
