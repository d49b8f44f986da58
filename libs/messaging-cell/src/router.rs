// libs/messaging-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::post,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Provider callbacks: public, Twilio calls in without a session.
pub fn webhook_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/twilio-status", post(handlers::twilio_status_webhook))
        .with_state(state)
}

/// Outbound sends require the professional's session.
pub fn message_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::send_message))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
