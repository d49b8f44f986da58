// libs/messaging-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Form, Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{MessagingError, SendMessageRequest, StatusCallback};
use crate::services::status::StatusIngestionService;
use crate::services::whatsapp::WhatsappService;

/// Delivery-status webhook. Twilio posts here out of band; the response is
/// success whether or not the callback matched a stored message.
#[axum::debug_handler]
pub async fn twilio_status_webhook(
    State(state): State<Arc<AppConfig>>,
    Form(callback): Form<StatusCallback>,
) -> Result<Json<Value>, AppError> {
    let ingestion_service = StatusIngestionService::new(&state);

    ingestion_service.ingest_status(callback).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "success": true
    })))
}

/// Authenticated outbound send on behalf of the session professional.
#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let whatsapp_service = WhatsappService::new(&state);

    let message = whatsapp_service.send_message(&user, request).await
        .map_err(|e| match e {
            MessagingError::NotConfigured => {
                AppError::Internal("Messaging provider is not configured".to_string())
            },
            MessagingError::SendFailed(msg) => AppError::ExternalService(msg),
            MessagingError::DatabaseError(msg) => AppError::Database(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}
