use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_create_and_list_patients() {
    let ctx = TestContext::new();
    let first = ctx.create_patient("Alice Johnson").await;
    let second = ctx.create_patient("Bob Smith").await;

    let listed = ctx.server.get("/patients").await.json::<Value>();

    assert_eq!(
        listed,
        json!([
            { "id": second, "name": "Bob Smith" },
            { "id": first, "name": "Alice Johnson" },
        ])
    );
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let ctx = TestContext::new();

    for body in [json!({}), json!({ "name": "   " })] {
        let response = ctx.server.post("/patients").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            json!("Validation error: name is required (string)")
        );
    }
}

#[tokio::test]
async fn test_booked_patient_cannot_be_deleted() {
    let ctx = TestContext::new();
    let patient_id = ctx.create_patient("Still Booked").await;
    let (status, booked) = ctx.book(&patient_id, "Dr.Lee", "2025-01-01T15:00:00.000Z").await;
    assert_eq!(status, StatusCode::CREATED);

    let blocked = ctx.server.delete(&format!("/patients/{patient_id}")).await;
    assert_eq!(blocked.status_code(), StatusCode::CONFLICT);

    let appointment_id = booked["id"].as_str().unwrap();
    assert_eq!(
        ctx.server.delete(&format!("/appointments/{appointment_id}")).await.status_code(),
        StatusCode::NO_CONTENT
    );

    assert_eq!(
        ctx.server.delete(&format!("/patients/{patient_id}")).await.status_code(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        ctx.server.delete(&format!("/patients/{patient_id}")).await.status_code(),
        StatusCode::NOT_FOUND
    );
}
