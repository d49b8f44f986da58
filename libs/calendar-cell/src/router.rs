// libs/calendar-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn calendar_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/connect", get(handlers::connect_calendar))
        .route("/events", get(handlers::list_events))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Google redirects to the callback without a session
    Router::new()
        .merge(protected_routes)
        .route("/callback", get(handlers::oauth_callback))
        .with_state(state)
}
