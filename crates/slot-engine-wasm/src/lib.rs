//! WASM bindings for slot-engine.
//!
//! Exposes slot conflicts, availability, booking validation and the calendar
//! read models to the studio's browser views via `wasm-bindgen`. Records are
//! passed as JSON strings in the [`StudioSnapshot`] shape; configuration in the
//! [`SchedulingConfig`] shape.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use std::fmt::Display;

use chrono::NaiveDate;
use serde::Serialize;
use slot_engine::booking::{validate_booking, BookingContext, BookingDraft};
use slot_engine::calendar::week_grid;
use slot_engine::occupancy::{has_conflict, remaining_standard_slots, SlotRef};
use slot_engine::payment::{settle, Tender};
use slot_engine::sessions::remaining_sessions;
use slot_engine::{
    available_slots, AppointmentScan, AvailabilityRequest, SchedulingConfig, Season, Service,
    ServiceCatalog, SlotIndex, SlotTime, StudioSnapshot, TimeRange,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Parsing helpers. Everything below returns `Result<_, String>` so it can be
// exercised natively; the exports convert to `JsValue` at the edge.
// ---------------------------------------------------------------------------

fn describe(context: &str, e: impl Display) -> String {
    format!("{}: {}", context, e)
}

fn parse_snapshot(json: &str) -> Result<StudioSnapshot, String> {
    StudioSnapshot::from_json_str(json).map_err(|e| describe("Invalid studio JSON", e))
}

fn parse_config(json: &str) -> Result<SchedulingConfig, String> {
    SchedulingConfig::from_json_str(json).map_err(|e| describe("Invalid config JSON", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| describe(&format!("Invalid date '{}'", s), e))
}

fn parse_time(s: &str) -> Result<SlotTime, String> {
    SlotTime::parse(s).map_err(|e| e.to_string())
}

fn parse_season(season: Option<&str>) -> Result<Season, String> {
    season.map_or(Ok(Season::Normal), |s| s.parse().map_err(|e| describe("Invalid season", e)))
}

fn find_service<'a>(catalog: &'a ServiceCatalog, service_id: &str) -> Result<&'a Service, String> {
    catalog
        .get(service_id)
        .ok_or_else(|| format!("Unknown service '{}'", service_id))
}

fn to_json(value: &impl Serialize) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| describe("Serialization error", e))
}

fn js<T>(result: Result<T, String>) -> Result<T, JsValue> {
    result.map_err(|e| JsValue::from_str(&e))
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

fn has_conflict_impl(
    studio_json: &str,
    trainer_id: &str,
    date: &str,
    time: &str,
    service_id: &str,
    capacity: u32,
) -> Result<bool, String> {
    let studio = parse_snapshot(studio_json)?;
    let catalog = studio.catalog();
    let candidate = find_service(&catalog, service_id)?;
    let slot = SlotRef::new(trainer_id, parse_date(date)?, parse_time(time)?);
    Ok(has_conflict(&studio.appointments, &catalog, slot, candidate, capacity))
}

fn remaining_impl(
    studio_json: &str,
    trainer_id: &str,
    date: &str,
    time: &str,
    capacity: u32,
) -> Result<u32, String> {
    let studio = parse_snapshot(studio_json)?;
    let catalog = studio.catalog();
    let slot = SlotRef::new(trainer_id, parse_date(date)?, parse_time(time)?);
    Ok(remaining_standard_slots(&studio.appointments, &catalog, slot, capacity))
}

fn available_slots_impl(
    studio_json: &str,
    config_json: &str,
    trainer_id: &str,
    date: &str,
    service_id: &str,
    season: Option<&str>,
    range: Option<&str>,
) -> Result<String, String> {
    let studio = parse_snapshot(studio_json)?;
    let config = parse_config(config_json)?;
    let catalog = studio.catalog();
    let range = match range {
        Some(r) => r.parse::<TimeRange>().map_err(|e| e.to_string())?,
        None => TimeRange::all_day(),
    };
    let request = AvailabilityRequest {
        trainer_id,
        date: parse_date(date)?,
        candidate: find_service(&catalog, service_id)?,
        season: parse_season(season)?,
        range,
    };
    let slots = available_slots(
        &AppointmentScan::new(&studio.appointments, &catalog),
        &config,
        &request,
    );
    to_json(&slots)
}

fn validate_booking_impl(
    studio_json: &str,
    config_json: &str,
    draft_json: &str,
) -> Result<String, String> {
    let studio = parse_snapshot(studio_json)?;
    let config = parse_config(config_json)?;
    let draft: BookingDraft =
        serde_json::from_str(draft_json).map_err(|e| describe("Invalid booking JSON", e))?;
    let catalog = studio.catalog();
    let ctx = BookingContext {
        appointments: &studio.appointments,
        catalog: &catalog,
        trainers: &studio.trainers,
        config: &config,
    };
    to_json(&validate_booking(&draft, &ctx).messages())
}

fn week_grid_impl(
    studio_json: &str,
    config_json: &str,
    trainer_id: &str,
    date: &str,
    season: Option<&str>,
) -> Result<String, String> {
    let studio = parse_snapshot(studio_json)?;
    let config = parse_config(config_json)?;
    let catalog = studio.catalog();
    let index = SlotIndex::build(&studio.appointments, &catalog);
    let week = week_grid(&index, trainer_id, parse_date(date)?, parse_season(season)?, &config);
    to_json(&week)
}

fn remaining_sessions_impl(
    studio_json: &str,
    member_id: &str,
    service_id: &str,
) -> Result<u32, String> {
    let studio = parse_snapshot(studio_json)?;
    let catalog = studio.catalog();
    let service = find_service(&catalog, service_id)?;
    Ok(remaining_sessions(&studio.appointments, member_id, service))
}

fn settle_payment_impl(total: u64, tenders_json: &str, rate_bps: u32) -> Result<String, String> {
    let tenders: Vec<Tender> =
        serde_json::from_str(tenders_json).map_err(|e| describe("Invalid tenders JSON", e))?;
    let settlement = settle(total, &tenders, rate_bps).map_err(|e| e.to_string())?;
    to_json(&settlement)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Normalize `HH:MM` or `HH:MM:SS` to `HH:MM`.
#[wasm_bindgen(js_name = "normalizeTime")]
pub fn normalize_time(time: &str) -> Result<String, JsValue> {
    js(slot_engine::normalize_time(time).map_err(|e| e.to_string()))
}

/// Whether booking `service_id` into the trainer's slot breaks the slot rules.
#[wasm_bindgen(js_name = "hasConflict")]
pub fn has_conflict_js(
    studio_json: &str,
    trainer_id: &str,
    date: &str,
    time: &str,
    service_id: &str,
    capacity: u32,
) -> Result<bool, JsValue> {
    js(has_conflict_impl(studio_json, trainer_id, date, time, service_id, capacity))
}

/// Standard places left in the trainer's slot (0 when a VIP session holds it).
#[wasm_bindgen(js_name = "remainingStandardSlots")]
pub fn remaining_standard_slots_js(
    studio_json: &str,
    trainer_id: &str,
    date: &str,
    time: &str,
    capacity: u32,
) -> Result<u32, JsValue> {
    js(remaining_impl(studio_json, trainer_id, date, time, capacity))
}

/// Bookable slots for a trainer on a date, as a JSON array of
/// `{date, time, remaining}`.
///
/// `season` is `"normal"` (default) or `"holiday"`; `range` is `"HH:MM-HH:MM"`.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots_js(
    studio_json: &str,
    config_json: &str,
    trainer_id: &str,
    date: &str,
    service_id: &str,
    season: Option<String>,
    range: Option<String>,
) -> Result<String, JsValue> {
    js(available_slots_impl(
        studio_json,
        config_json,
        trainer_id,
        date,
        service_id,
        season.as_deref(),
        range.as_deref(),
    ))
}

/// Field messages for a booking draft, as JSON
/// `{date?, time?, trainer?, service?, submittable, remaining?}`.
#[wasm_bindgen(js_name = "validateBooking")]
pub fn validate_booking_js(
    studio_json: &str,
    config_json: &str,
    draft_json: &str,
) -> Result<String, JsValue> {
    js(validate_booking_impl(studio_json, config_json, draft_json))
}

/// Seven-day grid for the week containing `date`.
#[wasm_bindgen(js_name = "weekGrid")]
pub fn week_grid_js(
    studio_json: &str,
    config_json: &str,
    trainer_id: &str,
    date: &str,
    season: Option<String>,
) -> Result<String, JsValue> {
    js(week_grid_impl(studio_json, config_json, trainer_id, date, season.as_deref()))
}

#[wasm_bindgen(js_name = "remainingSessions")]
pub fn remaining_sessions_js(
    studio_json: &str,
    member_id: &str,
    service_id: &str,
) -> Result<u32, JsValue> {
    js(remaining_sessions_impl(studio_json, member_id, service_id))
}

/// Settle a payment. `tenders_json` is `[{method, amount}]`; amounts in minor
/// units, `rate_bps` in basis points.
#[wasm_bindgen(js_name = "settlePayment")]
pub fn settle_payment_js(total: u64, tenders_json: &str, rate_bps: u32) -> Result<String, JsValue> {
    js(settle_payment_impl(total, tenders_json, rate_bps))
}
