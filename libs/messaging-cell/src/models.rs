// libs/messaging-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// MESSAGE MODELS
// ==============================================================================

/// Outbound WhatsApp message row. Inserted by the send path; mutated only by
/// status ingestion matching on `twilio_sid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsappMessage {
    pub id: Uuid,
    pub twilio_sid: String,
    pub status: String,
    pub delivered_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub appointment_id: Option<Uuid>,
    pub profile_id: String,
    pub sent_at: DateTime<Utc>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Delivery-status callback Twilio posts form-encoded. Delivered
/// at-least-once; there is no dedup on our side.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCallback {
    #[serde(rename = "MessageSid")]
    pub message_sid: String,
    #[serde(rename = "MessageStatus")]
    pub message_status: String,
    #[serde(rename = "ErrorCode")]
    pub error_code: Option<String>,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub to: String,
    pub body: String,
    pub appointment_id: Option<Uuid>,
}

/// Subset of the Twilio Messages API response we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioMessageResponse {
    pub sid: String,
    pub status: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum MessagingError {
    #[error("Messaging provider is not configured")]
    NotConfigured,

    #[error("Failed to send message: {0}")]
    SendFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
