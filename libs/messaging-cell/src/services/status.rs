// libs/messaging-cell/src/services/status.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{MessagingError, StatusCallback};

pub struct StatusIngestionService {
    supabase: SupabaseClient,
    service_key: String,
}

impl StatusIngestionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            service_key: config.supabase_service_role_key.clone(),
        }
    }

    /// Apply a delivery-status callback to the message row whose `twilio_sid`
    /// matches. A callback for an unknown sid updates zero rows and is still
    /// reported as success. `delivered_at` is restamped on every delivered
    /// callback, so repeated deliveries move the timestamp forward.
    pub async fn ingest_status(&self, callback: StatusCallback) -> Result<(), MessagingError> {
        debug!("Ingesting status '{}' for message {}", callback.message_status, callback.message_sid);

        let mut update_data = serde_json::Map::new();
        update_data.insert("status".to_string(), json!(callback.message_status));

        if callback.message_status == "delivered" {
            update_data.insert("delivered_at".to_string(), json!(Utc::now().to_rfc3339()));
        }

        if let Some(code) = &callback.error_code {
            let message = callback.error_message.as_deref().unwrap_or_default();
            update_data.insert("error_message".to_string(), json!(format!("{}: {}", code, message)));
        }

        let path = format!(
            "/rest/v1/whatsapp_messages?twilio_sid=eq.{}",
            urlencoding::encode(&callback.message_sid)
        );

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let updated: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(&self.service_key),
            Some(Value::Object(update_data)),
            Some(headers),
        ).await.map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        // Zero matched rows and a real update both land here.
        info!("Status '{}' applied to {} row(s) for {}",
              callback.message_status, updated.len(), callback.message_sid);

        Ok(())
    }
}
