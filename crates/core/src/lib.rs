//! # Clinic Core
//!
//! Domain types and booking rules for the clinic scheduler.
//!
//! - **time_rules**: quarter-hour alignment, working hours and slot end-times,
//!   all evaluated in the clinic's fixed zone
//! - **window**: half-open intervals and their overlap test
//! - **conflict**: the per-doctor overlap check against stored appointments
//! - **slots**: the ordered list of bookable slot starts of a day
//!
//! Nothing here performs I/O. Persistence is reached only through the
//! [`conflict::ConflictQuery`] trait, implemented by the store crate.

pub mod conflict;
pub mod errors;
pub mod models;
pub mod slots;
pub mod time_rules;
pub mod window;
