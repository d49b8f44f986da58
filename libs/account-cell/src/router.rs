// libs/account-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::delete,
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn account_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", delete(handlers::erase_account))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
