//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies of the form
//! `{"error": "<message>"}`, so every handler reports failures the same way.
//!
//! Time-rule rejections are client errors (400). A slot conflict or a
//! patient that is still booked is a 409, since it depends on stored state
//! rather than on the request alone.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinic_core::errors::ClinicError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use clinic_api::middleware::error_handling::AppError;
/// use clinic_core::{errors::ClinicError, time_rules::validate_and_compute_slot};
///
/// async fn handler(raw: String) -> Result<Json<String>, AppError> {
///     let window = validate_and_compute_slot(&raw)?;
///     Ok(Json(window.end.to_rfc3339()))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClinicError::InvalidTimestamp(_)
            | ClinicError::MisalignedSlot
            | ClinicError::OutsideWorkingHours
            | ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::SlotConflict | ClinicError::PatientHasAppointments(_) => {
                StatusCode::CONFLICT
            }
            ClinicError::Database(_) | ClinicError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:?}", self.0);
            "internal_error".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from ClinicError to AppError
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError, as a database failure.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Database(err))
    }
}
