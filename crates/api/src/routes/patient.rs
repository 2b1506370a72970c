use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/patients",
            get(handlers::patient::list_patients).post(handlers::patient::create_patient),
        )
        .route("/patients/:id", delete(handlers::patient::delete_patient))
}
