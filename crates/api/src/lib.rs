//! # Clinic API
//!
//! The API crate provides the web server for the clinic scheduler. It
//! exposes RESTful endpoints for patients, appointments and the bookable
//! slots of a day.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Compose the booking rules from `clinic-core` with store writes
//! - **Middleware**: Error to HTTP status mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Persistence is reached only through
//! the [`ClinicStore`] handle held in [`ApiState`].

/// Configuration module for API settings
pub mod config;
/// Extractors that report rejections as JSON errors
pub mod extract;
/// Request handlers that implement the booking flow
pub mod handlers;
/// Error handling shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use clinic_db::ClinicStore;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use clinic_api::ApiState;
/// use clinic_db::MemoryStore;
///
/// let state = Arc::new(ApiState::new(Arc::new(MemoryStore::new())));
/// let app = clinic_api::router(state);
/// ```
pub struct ApiState {
    /// Patient and appointment store
    pub store: Arc<dyn ClinicStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }
}

/// Builds the application router with all routes and the shared state.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Patient endpoints
        .merge(routes::patient::routes())
        // Booking, rescheduling and cancellation endpoints
        .merge(routes::appointment::routes())
        // Day slot listing
        .merge(routes::slots::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let origin = match origins {
        Some(origins) => AllowOrigin::list(origins.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!("Ignoring invalid CORS origin {:?}", origin))
                .ok()
        })),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origin)
}

/// Starts the API server with the provided configuration and store
///
/// Initializes logging, assembles the router with CORS, tracing and request
/// timeout layers, and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn ClinicStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(store));

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .layer(cors_layer(config.cors_origins.as_deref())),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
