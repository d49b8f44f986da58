// libs/calendar-cell/src/models.rs
use serde::{Deserialize, Serialize};

// ==============================================================================
// TOKEN MODELS
// ==============================================================================

/// Long-lived Google credential, one row per professional. Upserted by the
/// OAuth callback, read by the events endpoint, removed only by erasure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarToken {
    pub user_id: String,
    pub refresh_token: String,
}

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "redirectUrl")]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

// ==============================================================================
// GOOGLE API MODELS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleEventsResponse {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

/// Google events carry either a datetime or an all-day date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub date: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar provider is not configured")]
    NotConfigured,

    #[error("No calendar connection for this user")]
    NotConnected,

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Calendar provider error: {0}")]
    ProviderError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
