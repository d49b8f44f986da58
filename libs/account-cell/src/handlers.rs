// libs/account-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::services::erasure::AccountErasureService;

/// Delete the session user's account and every record they own. The
/// middleware guarantees a session; without one this handler is never
/// reached and no deletion is issued.
#[axum::debug_handler]
pub async fn erase_account(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let erasure_service = AccountErasureService::new(&state);

    erasure_service.erase_account(&user).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Account and all associated data deleted"
    })))
}
