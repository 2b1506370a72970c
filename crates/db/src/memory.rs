//! In-process [`ClinicStore`] used by tests and local demos.
//!
//! Every write takes the same lock as its overlap re-check, so two bookings
//! racing for one slot cannot both land.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use clinic_core::{
    conflict::{ConflictQuery, collides},
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{Appointment, AppointmentDetails, AppointmentDraft},
        patient::Patient,
    },
    window::TimeWindow,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::ClinicStore;

#[derive(Debug, Default)]
struct MemoryState {
    // insertion order
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
}

impl MemoryState {
    fn patient(&self, id: Uuid) -> Option<&Patient> {
        self.patients.iter().find(|patient| patient.id == id)
    }

    fn conflicting(
        &self,
        doctor_name: &str,
        window: &TimeWindow,
        exclude: Option<Uuid>,
    ) -> Option<&Appointment> {
        self.appointments
            .iter()
            .find(|stored| collides(stored, doctor_name, window, exclude))
    }

    fn check_write(&self, draft: &AppointmentDraft, exclude: Option<Uuid>) -> ClinicResult<()> {
        if self.patient(draft.patient_id).is_none() {
            return Err(ClinicError::Validation("invalid patient_id".to_string()));
        }
        if self.conflicting(&draft.doctor_name, &draft.window, exclude).is_some() {
            return Err(ClinicError::SlotConflict);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConflictQuery for MemoryStore {
    async fn find_conflicting(
        &self,
        doctor_name: &str,
        window: &TimeWindow,
        exclude: Option<Uuid>,
    ) -> ClinicResult<Option<Appointment>> {
        let state = self.state.read().await;
        Ok(state.conflicting(doctor_name, window, exclude).cloned())
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn create_patient(&self, name: &str) -> ClinicResult<Patient> {
        let patient = Patient {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.state.write().await.patients.push(patient.clone());
        Ok(patient)
    }

    async fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let state = self.state.read().await;
        Ok(state.patients.iter().rev().cloned().collect())
    }

    async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>> {
        Ok(self.state.read().await.patient(id).cloned())
    }

    async fn delete_patient(&self, id: Uuid) -> ClinicResult<()> {
        let mut state = self.state.write().await;
        if state.appointments.iter().any(|a| a.patient_id == id) {
            return Err(ClinicError::PatientHasAppointments(id.to_string()));
        }

        let before = state.patients.len();
        state.patients.retain(|patient| patient.id != id);
        if state.patients.len() == before {
            return Err(ClinicError::NotFound(format!("Patient with ID {} not found", id)));
        }
        Ok(())
    }

    async fn create_appointment(&self, draft: &AppointmentDraft) -> ClinicResult<Appointment> {
        let mut state = self.state.write().await;
        state.check_write(draft, None)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_name: draft.doctor_name.clone(),
            patient_id: draft.patient_id,
            start_time: draft.window.start,
            end_time: draft.window.end,
        };
        state.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        let state = self.state.read().await;
        Ok(state.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn list_appointments(
        &self,
        doctor_name: &str,
        day: &TimeWindow,
    ) -> ClinicResult<Vec<AppointmentDetails>> {
        let state = self.state.read().await;
        let mut listed: Vec<AppointmentDetails> = state
            .appointments
            .iter()
            .filter(|a| a.doctor_name == doctor_name && day.contains(a.start_time))
            .map(|a| AppointmentDetails {
                appointment: a.clone(),
                patient_name: state.patient(a.patient_id).map(|p| p.name.clone()),
            })
            .collect();
        listed.sort_by_key(|details| details.appointment.start_time);
        Ok(listed)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        draft: &AppointmentDraft,
    ) -> ClinicResult<Appointment> {
        let mut state = self.state.write().await;
        if !state.appointments.iter().any(|a| a.id == id) {
            return Err(ClinicError::NotFound(format!("Appointment with ID {} not found", id)));
        }
        state.check_write(draft, Some(id))?;

        let stored = state
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;
        stored.doctor_name = draft.doctor_name.clone();
        stored.patient_id = draft.patient_id;
        stored.start_time = draft.window.start;
        stored.end_time = draft.window.end;
        Ok(stored.clone())
    }

    async fn delete_appointment(&self, id: Uuid) -> ClinicResult<()> {
        let mut state = self.state.write().await;
        let before = state.appointments.len();
        state.appointments.retain(|a| a.id != id);
        if state.appointments.len() == before {
            return Err(ClinicError::NotFound(format!("Appointment with ID {} not found", id)));
        }
        Ok(())
    }

    async fn clear_all(&self) -> ClinicResult<()> {
        let mut state = self.state.write().await;
        state.appointments.clear();
        state.patients.clear();
        Ok(())
    }
}
