use axum::http::StatusCode;
use clinic_db::ClinicStore;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_book_valid_appointment() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Test User").await;

    let (status, created) = ctx
        .book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z")
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["doctor_name"], json!("Dr.Who"));
    assert_eq!(created["patient_id"], json!(patient_id));
    assert_eq!(created["start_time"], json!("2025-01-01T15:00:00Z"));
    assert_eq!(created["end_time"], json!("2025-01-01T15:15:00Z"));

    let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();
    let stored = ctx.store.get_appointment(id).await.unwrap().expect("stored appointment");
    assert_eq!(stored.doctor_name, "Dr.Who");
    assert_eq!(stored.patient_id.to_string(), patient_id);

    let listed = ctx
        .server
        .get("/appointments")
        .add_query_param("doctor_name", "Dr.Who")
        .add_query_param("date", "2025-01-01")
        .await
        .json::<Value>();

    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["patient_id"], json!(patient_id));
    assert_eq!(listed[0]["patient_name"], json!("Test User"));
}

#[tokio::test]
async fn test_same_slot_twice_conflicts() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Overlap User").await;

    let (first, _) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;
    let (second, body) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("time slot already taken"));
}

#[tokio::test]
async fn test_adjacent_slot_and_other_doctor_are_free() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Busy Day").await;

    let (first, _) = ctx.book(&patient_id, "Dr.X", "2025-01-01T16:00:00.000Z").await;
    let (adjacent, _) = ctx.book(&patient_id, "Dr.X", "2025-01-01T16:15:00.000Z").await;
    let (other_doctor, _) = ctx.book(&patient_id, "Dr.Y", "2025-01-01T16:00:00.000Z").await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(adjacent, StatusCode::CREATED);
    assert_eq!(other_doctor, StatusCode::CREATED);
}

#[rstest]
#[case("2025-01-09T15:07:00.000Z", "start_time must be on a quarter hour")]
#[case("2025-01-09T00:00:00.000Z", "outside working hours (09:00-17:00)")]
// local midnight
#[case("2025-01-09T06:00:00.000Z", "outside working hours (09:00-17:00)")]
// 17:00 local
#[case("2025-01-09T23:00:00.000Z", "outside working hours (09:00-17:00)")]
#[tokio::test]
async fn test_time_rules_reject_booking(#[case] start_time: &str, #[case] error: &str) {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Rules User").await;

    let (status, body) = ctx.book(&patient_id, "Dr.Z", start_time).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(error));
}

#[tokio::test]
async fn test_unparseable_start_time() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Typo").await;

    let (status, body) = ctx.book(&patient_id, "Dr.Z", "next tuesday").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid timestamp"));
}

#[tokio::test]
async fn test_unknown_patient_is_rejected() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .book(&Uuid::new_v4().to_string(), "Dr.Who", "2025-01-01T15:00:00.000Z")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Validation error: invalid patient_id"));
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Incomplete").await;

    let (status, _) = ctx.book(&patient_id, "  ", "2025-01-01T15:00:00.000Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = ctx
        .server
        .post("/appointments")
        .json(&json!({ "doctor_name": "Dr.Who", "start_time": "2025-01-01T15:00:00.000Z" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        json!("Validation error: patient_id, doctor_name, start_time are required")
    );

    let listing = ctx
        .server
        .get("/appointments")
        .add_query_param("doctor_name", "Dr.Who")
        .await;
    assert_eq!(listing.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reschedule_to_own_time_is_not_a_conflict() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Same Time").await;
    let (_, created) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;
    let id = created["id"].as_str().unwrap();

    let response = ctx
        .server
        .patch(&format!("/appointments/{id}"))
        .json(&json!({ "start_time": "2025-01-01T15:00:00.000Z" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), created);
}

#[tokio::test]
async fn test_reschedule_moves_and_revalidates() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Mover").await;
    let (_, first) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;
    ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:30:00.000Z").await;
    let path = format!("/appointments/{}", first["id"].as_str().unwrap());

    let clash = ctx
        .server
        .patch(&path)
        .json(&json!({ "start_time": "2025-01-01T15:30:00.000Z" }))
        .await;
    assert_eq!(clash.status_code(), StatusCode::CONFLICT);

    let misaligned = ctx
        .server
        .patch(&path)
        .json(&json!({ "start_time": "2025-01-01T15:20:00.000Z" }))
        .await;
    assert_eq!(misaligned.status_code(), StatusCode::BAD_REQUEST);

    let moved = ctx
        .server
        .patch(&path)
        .json(&json!({ "start_time": "2025-01-01T15:15:00.000Z" }))
        .await;
    moved.assert_status_ok();
    let moved = moved.json::<Value>();
    assert_eq!(moved["start_time"], json!("2025-01-01T15:15:00Z"));
    assert_eq!(moved["end_time"], json!("2025-01-01T15:30:00Z"));
}

#[tokio::test]
async fn test_doctor_change_keeps_slot_and_checks_new_doctor() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Switcher").await;
    let (_, mine) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;
    ctx.book(&patient_id, "Dr.Lee", "2025-01-01T15:00:00.000Z").await;
    let path = format!("/appointments/{}", mine["id"].as_str().unwrap());

    let taken = ctx
        .server
        .patch(&path)
        .json(&json!({ "doctor_name": "Dr.Lee" }))
        .await;
    assert_eq!(taken.status_code(), StatusCode::CONFLICT);

    let moved = ctx
        .server
        .patch(&path)
        .json(&json!({ "doctor_name": "Dr.Khan" }))
        .await
        .json::<Value>();
    assert_eq!(moved["doctor_name"], json!("Dr.Khan"));
    assert_eq!(moved["start_time"], mine["start_time"]);
}

#[tokio::test]
async fn test_reschedule_to_unknown_patient_is_rejected() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Original").await;
    let (_, created) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;

    let response = ctx
        .server
        .patch(&format!("/appointments/{}", created["id"].as_str().unwrap()))
        .json(&json!({ "patient_id": Uuid::new_v4() }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_appointment_is_not_found() {
    let ctx = TestContext::new();
    let path = format!("/appointments/{}", Uuid::new_v4());

    let patched = ctx
        .server
        .patch(&path)
        .json(&json!({ "start_time": "2025-01-01T15:00:00.000Z" }))
        .await;
    assert_eq!(patched.status_code(), StatusCode::NOT_FOUND);

    let deleted = ctx.server.delete(&path).await;
    assert_eq!(deleted.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_frees_the_slot() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Canceller").await;
    let (_, created) = ctx.book(&patient_id, "Dr.Adams", "2025-01-01T20:00:00.000Z").await;

    assert_eq!(
        ctx.server.delete(&format!("/appointments/{}", created["id"].as_str().unwrap())).await.status_code(),
        StatusCode::NO_CONTENT
    );

    let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(ctx.store.get_appointment(id).await.unwrap(), None);

    let (status, _) = ctx.book(&patient_id, "Dr.Adams", "2025-01-01T20:00:00.000Z").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_malformed_patient_id_is_an_invalid_patient() {
    let ctx = TestContext::new();

    let (status, body) = ctx.book("abc", "Dr.Who", "2025-01-01T15:00:00.000Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Validation error: invalid patient_id" }));

    let patient_id = ctx.create_patient("Kept").await;
    let (_, created) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;
    let response = ctx
        .server
        .patch(&format!("/appointments/{}", created["id"].as_str().unwrap()))
        .json(&json!({ "patient_id": "abc" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Validation error: invalid patient_id" })
    );
}

#[tokio::test]
async fn test_malformed_path_id_gets_json_error() {
    let ctx = TestContext::new();

    let responses = [
        ctx.server.delete("/appointments/not-a-uuid").await,
        ctx.server
            .patch("/appointments/not-a-uuid")
            .json(&json!({ "doctor_name": "Dr.Who" }))
            .await,
        ctx.server.delete("/patients/not-a-uuid").await,
    ];
    for response in responses {
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({ "error": "Validation error: invalid id" }));
    }
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/appointments")
        .json(&json!({ "patient_id": "abc", "doctor_name": 5, "start_time": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap_or_default().to_string();
    assert!(error.starts_with("Validation error: "), "{error}");
}

#[tokio::test]
async fn test_blank_patch_fields_keep_current_values() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Blank Patch").await;
    let (_, created) = ctx.book(&patient_id, "Dr.Who", "2025-01-01T15:00:00.000Z").await;

    let response = ctx
        .server
        .patch(&format!("/appointments/{}", created["id"].as_str().unwrap()))
        .json(&json!({ "start_time": "", "doctor_name": "  ", "patient_id": "" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), created);
}
