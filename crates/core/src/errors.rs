use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("start_time must be on a quarter hour")]
    MisalignedSlot,

    #[error("outside working hours (09:00-17:00)")]
    OutsideWorkingHours,

    #[error("time slot already taken")]
    SlotConflict,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Patient {0} still has appointments")]
    PatientHasAppointments(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ClinicError {
    /// True for the rejections decided purely from the requested start time.
    pub fn is_time_rule(&self) -> bool {
        matches!(
            self,
            ClinicError::InvalidTimestamp(_)
                | ClinicError::MisalignedSlot
                | ClinicError::OutsideWorkingHours
        )
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
