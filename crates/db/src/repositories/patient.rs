use crate::models::DbPatient;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_patient(pool: &Pool<Postgres>, name: &str) -> Result<DbPatient> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating patient: id={}", id);

    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        INSERT INTO patients (id, name, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(patient)
}

/// All patients, most recently created first.
pub async fn list_patients(pool: &Pool<Postgres>) -> Result<Vec<DbPatient>> {
    let patients = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM patients
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(patients)
}

pub async fn get_patient_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM patients
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(patient)
}

pub async fn count_appointments_for_patient(pool: &Pool<Postgres>, id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE patient_id = $1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Returns whether a row was deleted.
pub async fn delete_patient(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM patients
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_all_patients(pool: &Pool<Postgres>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM patients").execute(pool).await?;

    Ok(result.rows_affected())
}
