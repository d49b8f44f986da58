// libs/calendar-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    response::Redirect,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CalendarError, CallbackQuery, ConnectQuery};
use crate::services::events::CalendarEventsService;
use crate::services::oauth::GoogleOAuthService;

/// Start the OAuth flow: redirect the professional to Google's consent
/// screen, carrying the post-consent landing URL through `state`.
#[axum::debug_handler]
pub async fn connect_calendar(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Query(query): Query<ConnectQuery>,
) -> Result<Redirect, AppError> {
    let redirect_url = query.redirect_url
        .ok_or_else(|| AppError::BadRequest("Missing redirectUrl parameter".to_string()))?;

    let oauth_service = GoogleOAuthService::new(&state);

    let auth_url = oauth_service.authorization_url(&user.id, &redirect_url)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Redirect::to(&auth_url))
}

/// Google redirects here after consent. Exchanges the code, stores the
/// refresh token, and sends the professional back where they started.
#[axum::debug_handler]
pub async fn oauth_callback(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    if let Some(error) = query.error {
        return Err(AppError::BadRequest(format!("Authorization declined: {}", error)));
    }

    let code = query.code
        .ok_or_else(|| AppError::BadRequest("Missing code parameter".to_string()))?;
    let oauth_state = query.state
        .ok_or_else(|| AppError::BadRequest("Missing state parameter".to_string()))?;

    let (user_id, redirect_url) = GoogleOAuthService::parse_state(&oauth_state)
        .ok_or_else(|| AppError::BadRequest("Malformed state parameter".to_string()))?;

    let oauth_service = GoogleOAuthService::new(&state);

    let refresh_token = oauth_service.exchange_code(&code).await
        .map_err(|e| match e {
            CalendarError::TokenExchangeFailed(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    oauth_service.store_refresh_token(&user_id, &refresh_token).await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Redirect::to(&redirect_url))
}

/// Upcoming events for the session user. Always 200: failures degrade to an
/// empty list rather than surfacing an error to the dashboard.
#[axum::debug_handler]
pub async fn list_events(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Json<Value> {
    let events_service = CalendarEventsService::new(&state);

    let events = events_service.upcoming_events(&user.id).await;

    Json(json!({
        "events": events
    }))
}
