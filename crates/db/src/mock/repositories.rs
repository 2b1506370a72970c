use async_trait::async_trait;
use clinic_core::{
    conflict::ConflictQuery,
    errors::ClinicResult,
    models::{
        appointment::{Appointment, AppointmentDetails, AppointmentDraft},
        patient::Patient,
    },
    window::TimeWindow,
};
use mockall::mock;
use uuid::Uuid;

use crate::store::ClinicStore;

// Mock store for testing
mock! {
    pub Store {}

    #[async_trait]
    impl ConflictQuery for Store {
        async fn find_conflicting(
            &self,
            doctor_name: &str,
            window: &TimeWindow,
            exclude: Option<Uuid>,
        ) -> ClinicResult<Option<Appointment>>;
    }

    #[async_trait]
    impl ClinicStore for Store {
        async fn create_patient(&self, name: &str) -> ClinicResult<Patient>;

        async fn list_patients(&self) -> ClinicResult<Vec<Patient>>;

        async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>>;

        async fn delete_patient(&self, id: Uuid) -> ClinicResult<()>;

        async fn create_appointment(&self, draft: &AppointmentDraft) -> ClinicResult<Appointment>;

        async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>>;

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

        async fn clear_all(&self) -> ClinicResult<()>;
    }
}
