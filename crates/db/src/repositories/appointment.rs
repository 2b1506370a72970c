use crate::models::{DbAppointment, DbAppointmentWithPatient};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    doctor_name: &str,
    patient_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor={}, patient={}, start={}",
        id, doctor_name, patient_id, start_time
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, doctor_name, patient_id, start_time, end_time, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, doctor_name, patient_id, start_time, end_time, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(doctor_name)
    .bind(patient_id)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, doctor_name, patient_id, start_time, end_time, created_at, updated_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// One appointment of `doctor_name` intersecting `[start_time, end_time)`,
/// other than `exclude_id`.
pub async fn find_conflicting_appointment(
    pool: &Pool<Postgres>,
    doctor_name: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude_id: Option<Uuid>,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, doctor_name, patient_id, start_time, end_time, created_at, updated_at
        FROM appointments
        WHERE doctor_name = $1
          AND start_time < $3
          AND end_time > $2
          AND ($4::uuid IS NULL OR id <> $4)
        LIMIT 1
        "#,
    )
    .bind(doctor_name)
    .bind(start_time)
    .bind(end_time)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Appointments of `doctor_name` starting in `[from, to)`, earliest first.
pub async fn list_appointments_for_doctor(
    pool: &Pool<Postgres>,
    doctor_name: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbAppointmentWithPatient>> {
    let appointments = sqlx::query_as::<_, DbAppointmentWithPatient>(
        r#"
        SELECT a.id, a.doctor_name, a.patient_id, p.name AS patient_name, a.start_time, a.end_time
        FROM appointments a
        LEFT JOIN patients p ON p.id = a.patient_id
        WHERE a.doctor_name = $1
          AND a.start_time >= $2
          AND a.start_time < $3
        ORDER BY a.start_time ASC
        "#,
    )
    .bind(doctor_name)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn update_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    doctor_name: &str,
    patient_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET doctor_name = $2, patient_id = $3, start_time = $4, end_time = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING id, doctor_name, patient_id, start_time, end_time, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(doctor_name)
    .bind(patient_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Returns whether a row was deleted.
pub async fn delete_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_all_appointments(pool: &Pool<Postgres>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM appointments").execute(pool).await?;

    Ok(result.rows_affected())
}
