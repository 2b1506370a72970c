use axum::{extract::State, http::StatusCode, Json};
use clinic_core::models::patient::{CreatePatientRequest, PatientResponse};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppPath},
    handlers::required,
    middleware::error_handling::AppError,
    ApiState,
};

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), AppError> {
    let name = required(Some(payload.name.as_str()), "name is required (string)")?;

    let patient = state.store.create_patient(&name).await?;
    info!("Created patient {}", patient.id);

    Ok((StatusCode::CREATED, Json(patient.into())))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let patients = state.store.list_patients().await?;

    Ok(Json(patients.into_iter().map(PatientResponse::from).collect()))
}

/// Refused with 409 while the patient still has appointments.
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<ApiState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_patient(id).await?;
    info!("Deleted patient {}", id);

    Ok(StatusCode::NO_CONTENT)
}
