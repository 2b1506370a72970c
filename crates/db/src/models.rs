use chrono::{DateTime, Utc};
use clinic_core::models::{
    appointment::{Appointment, AppointmentDetails},
    patient::Patient,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub doctor_name: String,
    pub patient_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment row joined with `patients.name`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointmentWithPatient {
    pub id: Uuid,
    pub doctor_name: String,
    pub patient_id: Uuid,
    pub patient_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Self {
            id: row.id,
            doctor_name: row.doctor_name,
            patient_id: row.patient_id,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

impl From<DbAppointmentWithPatient> for AppointmentDetails {
    fn from(row: DbAppointmentWithPatient) -> Self {
        Self {
            appointment: Appointment {
                id: row.id,
                doctor_name: row.doctor_name,
                patient_id: row.patient_id,
                start_time: row.start_time,
                end_time: row.end_time,
            },
            patient_name: row.patient_name,
        }
    }
}
