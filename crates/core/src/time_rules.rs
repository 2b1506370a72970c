//! # Time Rules
//!
//! Classification of appointment start times against the clinic's calendar.
//! Every rule is evaluated on the wall clock of [`CLINIC_TZ`], re-deriving the
//! zone offset for each instant, so the same instant gives the same answer no
//! matter which zone it was written in.
//!
//! Slot arithmetic ([`compute_slot_end`]) stays on the absolute timeline and
//! is unaffected by daylight-saving transitions.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::{
    errors::{ClinicError, ClinicResult},
    window::TimeWindow,
};

/// The clinic's civil time zone.
pub const CLINIC_TZ: Tz = chrono_tz::America::Chicago;

/// Length of every bookable slot.
pub const SLOT_MINUTES: i64 = 15;

/// First local hour a slot may start in.
pub const OPENING_HOUR: u32 = 9;

/// Local hour at which the clinic closes; no slot may start at or after it.
pub const CLOSING_HOUR: u32 = 17;

/// Wall-clock time of `instant` in the clinic zone.
pub fn local_time(instant: DateTime<Utc>) -> NaiveTime {
    instant.with_timezone(&CLINIC_TZ).time()
}

/// True iff the local minute-of-hour is 0, 15, 30 or 45.
pub fn is_quarter_hour_aligned(instant: DateTime<Utc>) -> bool {
    local_time(instant).minute() % SLOT_MINUTES as u32 == 0
}

/// True iff the local time is within `[09:00, 17:00)`.
///
/// The last slot that passes starts at 16:45 and ends exactly at closing.
pub fn is_within_working_hours(instant: DateTime<Utc>) -> bool {
    let hour = local_time(instant).hour();
    (OPENING_HOUR..CLOSING_HOUR).contains(&hour)
}

/// `start + duration_minutes` on the absolute timeline.
pub fn compute_slot_end(start: DateTime<Utc>, duration_minutes: i64) -> DateTime<Utc> {
    start + Duration::minutes(duration_minutes)
}

/// The standard slot starting at `start`.
pub fn slot_window(start: DateTime<Utc>) -> TimeWindow {
    TimeWindow::new(start, compute_slot_end(start, SLOT_MINUTES))
}

/// Parses an RFC 3339 timestamp (`2025-01-01T15:00:00.000Z`, offsets allowed).
pub fn parse_timestamp(raw: &str) -> ClinicResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| ClinicError::InvalidTimestamp(format!("{raw}: {e}")))
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(raw: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ClinicError::Validation(format!("date must be YYYY-MM-DD, got {raw:?}")))
}

/// Applies the time rules to an already parsed start time, in order:
/// alignment first, then working hours.
pub fn validate_slot_start(start: DateTime<Utc>) -> ClinicResult<TimeWindow> {
    if !is_quarter_hour_aligned(start) {
        return Err(ClinicError::MisalignedSlot);
    }
    if !is_within_working_hours(start) {
        return Err(ClinicError::OutsideWorkingHours);
    }
    Ok(slot_window(start))
}

/// Parses a caller-supplied start time and returns the slot it books.
pub fn validate_and_compute_slot(start_time_raw: &str) -> ClinicResult<TimeWindow> {
    let start = parse_timestamp(start_time_raw)?;
    validate_slot_start(start)
}

/// Resolves a wall-clock time on `date` in `zone` to an instant. Ambiguous
/// times take the earlier instant; times skipped by a transition give `None`.
pub fn resolve_local<Z: TimeZone>(zone: &Z, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// The clinic-local calendar day `date` as an absolute window.
pub fn local_day(date: NaiveDate) -> ClinicResult<TimeWindow> {
    let midnight = NaiveTime::default();
    let next = date
        .succ_opt()
        .ok_or_else(|| ClinicError::Validation(format!("date {date} is out of range")))?;

    match (
        resolve_local(&CLINIC_TZ, date, midnight),
        resolve_local(&CLINIC_TZ, next, midnight),
    ) {
        (Some(start), Some(end)) => Ok(TimeWindow::new(start, end)),
        _ => Err(ClinicError::Validation(format!(
            "local midnight of {date} does not exist in {CLINIC_TZ}"
        ))),
    }
}

/// Presentation label such as `9:00 AM` in the clinic zone.
pub fn format_local_time(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&CLINIC_TZ)
        .format("%-I:%M %p")
        .to_string()
}
