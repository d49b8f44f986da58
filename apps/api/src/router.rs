use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use account_cell::router::account_routes;
use booking_cell::router::{booking_routes, catalog_routes};
use calendar_cell::router::calendar_routes;
use messaging_cell::router::{message_routes, webhook_routes};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Agendux API is running!" }))
        .nest("/api/appointments", booking_routes(state.clone()))
        .nest("/api/services", catalog_routes(state.clone()))
        .nest("/api/messages", message_routes(state.clone()))
        .nest("/api/webhooks", webhook_routes(state.clone()))
        .nest("/api/calendar", calendar_routes(state.clone()))
        .nest("/api/account", account_routes(state.clone()))
}
