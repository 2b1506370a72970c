use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::window::TimeWindow;

/// A booked slot for one doctor. `end_time` is always `start_time` plus the
/// slot length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_name: String,
    pub patient_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Appointment {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// Fields written by a create or a reschedule, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDraft {
    pub doctor_name: String,
    pub patient_id: Uuid,
    pub window: TimeWindow,
}

/// An appointment joined with its patient's name, as listed for a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    /// Kept raw so a malformed id is reported like an unknown one.
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub start_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub doctor_name: Option<String>,
    pub patient_id: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub doctor_name: String,
    pub patient_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            doctor_name: appointment.doctor_name,
            patient_id: appointment.patient_id,
            patient_name: None,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
        }
    }
}

impl From<AppointmentDetails> for AppointmentResponse {
    fn from(details: AppointmentDetails) -> Self {
        Self {
            patient_name: details.patient_name,
            ..AppointmentResponse::from(details.appointment)
        }
    }
}
