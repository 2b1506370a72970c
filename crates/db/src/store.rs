//! The explicit store handle shared by the API layer.
//!
//! [`ClinicStore`] covers every read and write the scheduler performs and
//! extends the core's [`ConflictQuery`]. [`PgStore`] backs it with the
//! repository functions; [`crate::MemoryStore`] keeps everything in process.

use async_trait::async_trait;
use clinic_core::{
    conflict::ConflictQuery,
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{Appointment, AppointmentDetails, AppointmentDraft},
        patient::Patient,
    },
    window::TimeWindow,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    repositories::{appointment, patient},
    DbPool,
};

#[async_trait]
pub trait ClinicStore: ConflictQuery {
    async fn create_patient(&self, name: &str) -> ClinicResult<Patient>;

    /// All patients, newest first.
    async fn list_patients(&self) -> ClinicResult<Vec<Patient>>;

    async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>>;

    /// Fails with `PatientHasAppointments` while any appointment references
    /// the patient.
    async fn delete_patient(&self, id: Uuid) -> ClinicResult<()>;

    /// Inserts the draft. A write that would overlap another booking of the
    /// same doctor fails with `SlotConflict` even if the caller's check passed.
    async fn create_appointment(&self, draft: &AppointmentDraft) -> ClinicResult<Appointment>;

    async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>>;

    /// Appointments of `doctor_name` starting inside `day`, earliest first.
    async fn list_appointments(
        &self,
        doctor_name: &str,
        day: &TimeWindow,
    ) -> ClinicResult<Vec<AppointmentDetails>>;

    async fn update_appointment(
        &self,
        id: Uuid,
        draft: &AppointmentDraft,
    ) -> ClinicResult<Appointment>;

    async fn delete_appointment(&self, id: Uuid) -> ClinicResult<()>;

    /// Removes every appointment and patient.
    async fn clear_all(&self) -> ClinicResult<()>;
}

const EXCLUSION_VIOLATION: &str = "23P01";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn sqlstate(err: &eyre::Report) -> Option<String> {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Maps constraint violations raised by appointment writes onto domain errors.
fn appointment_write_error(err: eyre::Report) -> ClinicError {
    match sqlstate(&err).as_deref() {
        Some(EXCLUSION_VIOLATION) => {
            warn!("Overlapping appointment rejected by the database");
            ClinicError::SlotConflict
        }
        Some(FOREIGN_KEY_VIOLATION) => ClinicError::Validation("invalid patient_id".to_string()),
        _ => ClinicError::Database(err),
    }
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ConflictQuery for PgStore {
    async fn find_conflicting(
        &self,
        doctor_name: &str,
        window: &TimeWindow,
        exclude: Option<Uuid>,
    ) -> ClinicResult<Option<Appointment>> {
        let row = appointment::find_conflicting_appointment(
            &self.pool,
            doctor_name,
            window.start,
            window.end,
            exclude,
        )
        .await?;

        Ok(row.map(Appointment::from))
    }
}

#[async_trait]
impl ClinicStore for PgStore {
    async fn create_patient(&self, name: &str) -> ClinicResult<Patient> {
        let row = patient::create_patient(&self.pool, name).await?;
        Ok(row.into())
    }

    async fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let rows = patient::list_patients(&self.pool).await?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>> {
        let row = patient::get_patient_by_id(&self.pool, id).await?;
        Ok(row.map(Patient::from))
    }

    async fn delete_patient(&self, id: Uuid) -> ClinicResult<()> {
        if patient::count_appointments_for_patient(&self.pool, id).await? > 0 {
            return Err(ClinicError::PatientHasAppointments(id.to_string()));
        }

        // The foreign key still guards a booking that lands after the count.
        let deleted = patient::delete_patient(&self.pool, id)
            .await
            .map_err(|err| match sqlstate(&err).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => ClinicError::PatientHasAppointments(id.to_string()),
                _ => ClinicError::Database(err),
            })?;

        if !deleted {
            return Err(ClinicError::NotFound(format!("Patient with ID {} not found", id)));
        }
        Ok(())
    }

    async fn create_appointment(&self, draft: &AppointmentDraft) -> ClinicResult<Appointment> {
        let row = appointment::create_appointment(
            &self.pool,
            &draft.doctor_name,
            draft.patient_id,
            draft.window.start,
            draft.window.end,
        )
        .await
        .map_err(appointment_write_error)?;

        Ok(row.into())
    }

    async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        let row = appointment::get_appointment_by_id(&self.pool, id).await?;
        Ok(row.map(Appointment::from))
    }

    async fn list_appointments(
        &self,
        doctor_name: &str,
        day: &TimeWindow,
    ) -> ClinicResult<Vec<AppointmentDetails>> {
        let rows =
            appointment::list_appointments_for_doctor(&self.pool, doctor_name, day.start, day.end)
                .await?;
        Ok(rows.into_iter().map(AppointmentDetails::from).collect())
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        draft: &AppointmentDraft,
    ) -> ClinicResult<Appointment> {
        let row = appointment::update_appointment(
            &self.pool,
            id,
            &draft.doctor_name,
            draft.patient_id,
            draft.window.start,
            draft.window.end,
        )
        .await
        .map_err(appointment_write_error)?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;

        Ok(row.into())
    }

    async fn delete_appointment(&self, id: Uuid) -> ClinicResult<()> {
        if !appointment::delete_appointment(&self.pool, id).await? {
            return Err(ClinicError::NotFound(format!("Appointment with ID {} not found", id)));
        }
        Ok(())
    }

    async fn clear_all(&self) -> ClinicResult<()> {
        let appointments = appointment::delete_all_appointments(&self.pool).await?;
        let patients = patient::delete_all_patients(&self.pool).await?;
        tracing::info!("Cleared {} appointments and {} patients", appointments, patients);
        Ok(())
    }
}
