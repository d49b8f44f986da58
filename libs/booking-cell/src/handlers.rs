// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::BookAppointmentRequest;
use crate::services::booking::BookingService;
use crate::services::catalog::CatalogService;

/// Public booking endpoint used by the booking pages. No session required.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let confirmation = booking_service.create_booking(request).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "appointment_id": confirmation.appointment_id
    })))
}

/// Public listing of a professional's bookable services.
#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<AppConfig>>,
    Path(professional_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let catalog_service = CatalogService::new(&state);

    let services = catalog_service.list_bookable_services(&professional_id).await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "services": services
    })))
}
