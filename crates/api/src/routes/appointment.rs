use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/appointments",
            get(handlers::appointment::list_appointments)
                .post(handlers::appointment::create_appointment),
        )
        .route(
            "/appointments/:id",
            patch(handlers::appointment::update_appointment)
                .delete(handlers::appointment::delete_appointment),
        )
}
