use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use clinic_core::{errors::ClinicError, models::appointment::Appointment, models::patient::Patient};
use clinic_db::mock::repositories::MockStore;
use mockall::predicate;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::serve_mock;

fn patient(id: Uuid) -> Patient {
    Patient {
        id,
        name: "Mocked".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_database_failure_is_internal_error() {
    let mut store = MockStore::new();
    store
        .expect_list_patients()
        .times(1)
        .returning(|| Err(ClinicError::Database(eyre::eyre!("connection refused"))));

    let response = serve_mock(store).get("/patients").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": "internal_error" }));
}

#[tokio::test]
async fn test_conflict_is_checked_before_any_write() {
    let patient_id = Uuid::new_v4();
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 15, 0, 0).unwrap();

    let mut store = MockStore::new();
    store
        .expect_get_patient()
        .with(predicate::eq(patient_id))
        .returning(|id| Ok(Some(patient(id))));
    store
        .expect_find_conflicting()
        .withf(move |doctor, window, exclude| {
            doctor.to_string() == "Dr.Who" && window.start == start && exclude.is_none()
        })
        .times(1)
        .returning(move |doctor, window, _| {
            Ok(Some(Appointment {
                id: Uuid::new_v4(),
                doctor_name: doctor.to_string(),
                patient_id: Uuid::new_v4(),
                start_time: window.start,
                end_time: window.end,
            }))
        });
    store.expect_create_appointment().times(0);

    let response = serve_mock(store)
        .post("/appointments")
        .json(&json!({
            "patient_id": patient_id,
            "doctor_name": "Dr.Who",
            "start_time": "2025-01-01T15:00:00.000Z",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_time_rules_run_before_the_conflict_query() {
    let patient_id = Uuid::new_v4();

    let mut store = MockStore::new();
    store
        .expect_get_patient()
        .returning(|id| Ok(Some(patient(id))));
    store.expect_find_conflicting().times(0);
    store.expect_create_appointment().times(0);

    let response = serve_mock(store)
        .post("/appointments")
        .json(&json!({
            "patient_id": patient_id,
            "doctor_name": "Dr.Who",
            "start_time": "2025-01-01T15:07:00.000Z",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_write_side_conflict_is_reported() {
    // The check passes but another booking lands first; the store's own
    // constraint rejects the write.
    let mut store = MockStore::new();
    store
        .expect_get_patient()
        .returning(|id| Ok(Some(patient(id))));
    store
        .expect_find_conflicting()
        .returning(|_, _, _| Ok(None));
    store
        .expect_create_appointment()
        .times(1)
        .returning(|_| Err(ClinicError::SlotConflict));

    let response = serve_mock(store)
        .post("/appointments")
        .json(&json!({
            "patient_id": Uuid::new_v4(),
            "doctor_name": "Dr.Who",
            "start_time": "2025-01-01T15:00:00.000Z",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}
