use axum::{extract::State, Json};
use clinic_core::{
    models::slot::{DaySlotsResponse, SlotResponse},
    slots::enumerate_day_slots,
    time_rules::{format_local_time, local_day, parse_calendar_date, slot_window, CLINIC_TZ},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    extract::AppQuery, handlers::required, middleware::error_handling::AppError, ApiState,
};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
    /// When given, each slot is marked with that doctor's booking
    pub doctor_name: Option<String>,
}

/// The bookable slots of a clinic day.
///
/// ```text
/// GET /slots?date=2025-01-01&doctor_name=Dr.Who
/// ```
#[axum::debug_handler]
pub async fn day_slots(
    State(state): State<Arc<ApiState>>,
    AppQuery(query): AppQuery<SlotsQuery>,
) -> Result<Json<DaySlotsResponse>, AppError> {
    let date = parse_calendar_date(&required(query.date.as_deref(), "date is required")?)?;
    let doctor_name = query
        .doctor_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let booked = match &doctor_name {
        Some(doctor_name) => {
            state
                .store
                .list_appointments(doctor_name, &local_day(date)?)
                .await?
        }
        None => Vec::new(),
    };

    let slots = enumerate_day_slots(date, &CLINIC_TZ)
        .into_iter()
        .map(|start| {
            let window = slot_window(start);
            let appointment_id = booked
                .iter()
                .find(|details| details.appointment.window().overlaps(&window))
                .map(|details| details.appointment.id);

            SlotResponse {
                start: window.start,
                end: window.end,
                label: format_local_time(start),
                booked: appointment_id.is_some(),
                appointment_id,
            }
        })
        .collect();

    Ok(Json(DaySlotsResponse {
        date,
        doctor_name,
        slots,
    }))
}
