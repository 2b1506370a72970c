//! # Appointment Handlers
//!
//! Booking, rescheduling, cancelling and listing appointments.
//!
//! A booking or reschedule runs the same pipeline:
//!
//! 1. Resolve the patient (bookings only, or when a reschedule changes it)
//! 2. Apply the time rules to the requested start and derive the slot
//! 3. Check the doctor's stored appointments for an overlap, excluding the
//!    appointment being moved
//! 4. Write the record
//!
//! The store re-checks the overlap as part of the write, so a booking that
//! loses a race between steps 3 and 4 still fails with a conflict.

use axum::{extract::State, http::StatusCode, Json};
use clinic_core::{
    conflict::check_conflict,
    errors::ClinicError,
    models::appointment::{
        AppointmentDraft, AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest,
    },
    time_rules::{local_day, parse_calendar_date, validate_and_compute_slot},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppPath, AppQuery},
    handlers::{non_blank, parse_patient_id, required},
    middleware::error_handling::AppError,
    ApiState,
};

/// Query parameters for listing one doctor's day
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub doctor_name: Option<String>,
    /// Clinic-local calendar date, `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Lists a doctor's appointments starting on a clinic-local day.
///
/// ```text
/// GET /appointments?doctor_name=Dr.Who&date=2025-01-01
/// ```
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    AppQuery(query): AppQuery<DayQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    const MISSING: &str = "doctor_name and date are required";
    let doctor_name = required(query.doctor_name.as_deref(), MISSING)?;
    let date = required(query.date.as_deref(), MISSING)?;

    let day = local_day(parse_calendar_date(&date)?)?;
    let appointments = state.store.list_appointments(&doctor_name, &day).await?;

    Ok(Json(
        appointments
            .into_iter()
            .map(AppointmentResponse::from)
            .collect(),
    ))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    const MISSING: &str = "patient_id, doctor_name, start_time are required";
    let patient_id = required(payload.patient_id.as_deref(), MISSING)?;
    let doctor_name = required(Some(payload.doctor_name.as_str()), MISSING)?;
    let start_time = required(Some(payload.start_time.as_str()), MISSING)?;
    let patient_id = parse_patient_id(&patient_id)?;

    if state.store.get_patient(patient_id).await?.is_none() {
        return Err(ClinicError::Validation("invalid patient_id".to_string()).into());
    }

    let window = validate_and_compute_slot(&start_time).inspect_err(|e| {
        warn!("Rejected booking for {} at {:?}: {}", doctor_name, start_time, e);
    })?;

    check_conflict(&*state.store, &doctor_name, &window, None)
        .await
        .inspect_err(|e| warn!("Rejected booking for {} at {}: {}", doctor_name, window.start, e))?;

    let draft = AppointmentDraft {
        doctor_name,
        patient_id,
        window,
    };
    let created = state.store.create_appointment(&draft).await?;
    info!(
        "Booked appointment {} for {} at {}",
        created.id, created.doctor_name, created.start_time
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Moves an appointment and/or changes its doctor or patient.
///
/// Fields left out of the body, or sent blank, keep their current value.
/// Without a new `start_time` the current slot is kept, but it is still
/// checked against the (possibly new) doctor's bookings.
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let current = state
        .store
        .get_appointment(id)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;

    let doctor_name = non_blank(payload.doctor_name.as_deref())
        .unwrap_or_else(|| current.doctor_name.clone());

    let patient_id = match non_blank(payload.patient_id.as_deref()) {
        Some(raw) => {
            let patient_id = parse_patient_id(&raw)?;
            if patient_id != current.patient_id
                && state.store.get_patient(patient_id).await?.is_none()
            {
                return Err(ClinicError::Validation("invalid patient_id".to_string()).into());
            }
            patient_id
        }
        None => current.patient_id,
    };

    let window = match non_blank(payload.start_time.as_deref()) {
        Some(raw) => validate_and_compute_slot(&raw)?,
        None => current.window(),
    };

    check_conflict(&*state.store, &doctor_name, &window, Some(id)).await?;

    let draft = AppointmentDraft {
        doctor_name,
        patient_id,
        window,
    };
    let updated = state.store.update_appointment(id, &draft).await?;
    info!("Rescheduled appointment {} to {}", updated.id, updated.start_time);

    Ok(Json(updated.into()))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_appointment(id).await?;
    info!("Cancelled appointment {}", id);

    Ok(StatusCode::NO_CONTENT)
}
