// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

/// Booking routes are public: patients reach them from the booking page
/// without a session.
pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_appointment))
        .with_state(state)
}

pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{professional_id}", get(handlers::list_services))
        .with_state(state)
}
