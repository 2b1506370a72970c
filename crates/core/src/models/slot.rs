use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Clinic-local wall time, e.g. `9:00 AM`.
    pub label: String,
    pub booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    pub slots: Vec<SlotResponse>,
}
