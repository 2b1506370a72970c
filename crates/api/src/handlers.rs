pub mod appointment;
pub mod patient;
pub mod slots;

use clinic_core::errors::ClinicError;
use uuid::Uuid;

/// The trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A required, non-blank text field.
pub(crate) fn required(value: Option<&str>, message: &str) -> Result<String, ClinicError> {
    non_blank(value).ok_or_else(|| ClinicError::Validation(message.to_string()))
}

/// Parses a caller-supplied patient id. A malformed id is reported the same
/// way as one that does not exist.
pub(crate) fn parse_patient_id(raw: &str) -> Result<Uuid, ClinicError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ClinicError::Validation("invalid patient_id".to_string()))
}
