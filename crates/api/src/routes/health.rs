use axum::{routing::get, Json, Router};
use clinic_core::time_rules::{CLINIC_TZ, SLOT_MINUTES};
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
}

/// Build version plus the fixed booking parameters clients render against.
#[derive(Serialize)]
struct VersionResponse {
    version: &'static str,
    timezone: &'static str,
    slot_minutes: i64,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        timezone: CLINIC_TZ.name(),
        slot_minutes: SLOT_MINUTES,
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
