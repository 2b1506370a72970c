//! # Conflict Policy
//!
//! Decides whether a candidate slot collides with an existing booking for the
//! same doctor. The decision is existential: any one intersecting appointment
//! rejects the candidate, so no ordering is involved.
//!
//! The lookup itself belongs to the store; this module only states the query
//! shape ([`ConflictQuery`]) and the predicate an in-process store applies.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::appointment::Appointment,
    window::TimeWindow,
};

/// The one query the conflict policy needs from persistence.
#[async_trait]
pub trait ConflictQuery: Send + Sync {
    /// Returns one appointment of `doctor_name` with `stored.start < window.end`
    /// and `stored.end > window.start`, skipping the appointment `exclude`.
    async fn find_conflicting(
        &self,
        doctor_name: &str,
        window: &TimeWindow,
        exclude: Option<Uuid>,
    ) -> ClinicResult<Option<Appointment>>;
}

/// The predicate behind [`ConflictQuery::find_conflicting`].
pub fn collides(
    stored: &Appointment,
    doctor_name: &str,
    window: &TimeWindow,
    exclude: Option<Uuid>,
) -> bool {
    stored.doctor_name == doctor_name
        && exclude != Some(stored.id)
        && stored.window().overlaps(window)
}

/// True iff at least one stored appointment collides with the candidate.
pub async fn has_conflict<Q>(
    store: &Q,
    doctor_name: &str,
    window: &TimeWindow,
    exclude: Option<Uuid>,
) -> ClinicResult<bool>
where
    Q: ConflictQuery + ?Sized,
{
    let existing = store.find_conflicting(doctor_name, window, exclude).await?;
    if let Some(appointment) = &existing {
        debug!(
            "Slot {}..{} for {} collides with appointment {}",
            window.start, window.end, doctor_name, appointment.id
        );
    }
    Ok(existing.is_some())
}

/// Like [`has_conflict`] but surfaces a collision as [`ClinicError::SlotConflict`].
pub async fn check_conflict<Q>(
    store: &Q,
    doctor_name: &str,
    window: &TimeWindow,
    exclude: Option<Uuid>,
) -> ClinicResult<()>
where
    Q: ConflictQuery + ?Sized,
{
    if has_conflict(store, doctor_name, window, exclude).await? {
        return Err(ClinicError::SlotConflict);
    }
    Ok(())
}
