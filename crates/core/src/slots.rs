//! # Slot Enumeration
//!
//! Produces the bookable slot starts of one calendar day: local 09:00 onward,
//! every 15 minutes, 32 slots, minus any slot whose wall-clock start falls in
//! a break window. The result is a plain list and can be recomputed freely.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::warn;

use crate::time_rules::{OPENING_HOUR, SLOT_MINUTES, resolve_local};

/// Number of raw slots generated before breaks are removed.
pub const SLOTS_PER_DAY: usize = 32;

fn wall(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// A recurring daily break `[start, end)` in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl BreakWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// The 12:00-12:30 lunch break.
    pub fn lunch() -> Self {
        Self::new(wall(12, 0), wall(12, 30))
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// How a clinic day is cut into slots.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    pub opening: NaiveTime,
    pub slot_minutes: i64,
    pub slot_count: usize,
    pub breaks: Vec<BreakWindow>,
}

impl Default for DayPlan {
    fn default() -> Self {
        Self {
            opening: wall(OPENING_HOUR, 0),
            slot_minutes: SLOT_MINUTES,
            slot_count: SLOTS_PER_DAY,
            breaks: vec![BreakWindow::lunch()],
        }
    }
}

impl DayPlan {
    fn in_break(&self, time: NaiveTime) -> bool {
        self.breaks.iter().any(|window| window.contains(time))
    }

    /// Slot starts for `date` in `zone`, strictly increasing.
    pub fn enumerate<Z: TimeZone>(&self, date: NaiveDate, zone: &Z) -> Vec<DateTime<Utc>> {
        let Some(first) = resolve_local(zone, date, self.opening) else {
            warn!("Opening time {} does not exist on {}", self.opening, date);
            return Vec::new();
        };

        (0..self.slot_count as i64)
            .map(|i| first + Duration::minutes(i * self.slot_minutes))
            .filter(|slot| !self.in_break(slot.with_timezone(zone).time()))
            .collect()
    }
}

/// The standard clinic day: 32 quarter-hour slots from 09:00 without lunch.
pub fn enumerate_day_slots<Z: TimeZone>(date: NaiveDate, zone: &Z) -> Vec<DateTime<Utc>> {
    DayPlan::default().enumerate(date, zone)
}
