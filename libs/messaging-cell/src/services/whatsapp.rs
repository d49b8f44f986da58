// libs/messaging-cell/src/services/whatsapp.rs
use chrono::Utc;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::{error, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{MessagingError, SendMessageRequest, TwilioMessageResponse, WhatsappMessage};

/// Twilio WhatsApp sender. Dispatches through the Messages API and records
/// the resulting row (with the provider sid) for status ingestion to mutate.
pub struct WhatsappService {
    http: Client,
    supabase: SupabaseClient,
    service_key: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_base_url: String,
    configured: bool,
}

impl WhatsappService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            supabase: SupabaseClient::new(config),
            service_key: config.supabase_service_role_key.clone(),
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.twilio_whatsapp_number.clone(),
            api_base_url: config.twilio_api_base_url.clone(),
            configured: config.is_messaging_configured(),
        }
    }

    pub async fn send_message(
        &self,
        user: &User,
        request: SendMessageRequest,
    ) -> Result<WhatsappMessage, MessagingError> {
        if !self.configured {
            return Err(MessagingError::NotConfigured);
        }

        let twilio_response = self.dispatch_to_twilio(&request).await?;
        self.record_message(user, &request, &twilio_response).await
    }

    async fn dispatch_to_twilio(
        &self,
        request: &SendMessageRequest,
    ) -> Result<TwilioMessageResponse, MessagingError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base_url, self.account_sid
        );

        let to = format!("whatsapp:{}", request.to);
        let from = format!("whatsapp:{}", self.from_number);
        let params = [
            ("To", to.as_str()),
            ("From", from.as_str()),
            ("Body", request.body.as_str()),
        ];

        info!("Sending WhatsApp message to {}", request.to);

        let response = self.http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| MessagingError::SendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Twilio returned {}: {}", status, body);
            return Err(MessagingError::SendFailed(format!("Twilio error {}: {}", status, body)));
        }

        response.json::<TwilioMessageResponse>().await
            .map_err(|e| MessagingError::SendFailed(format!("Failed to parse Twilio response: {}", e)))
    }

    async fn record_message(
        &self,
        user: &User,
        request: &SendMessageRequest,
        twilio_response: &TwilioMessageResponse,
    ) -> Result<WhatsappMessage, MessagingError> {
        let message_data = json!({
            "twilio_sid": twilio_response.sid,
            "status": twilio_response.status,
            "appointment_id": request.appointment_id,
            "profile_id": user.id,
            "sent_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/whatsapp_messages",
            Some(&self.service_key),
            Some(message_data),
            Some(headers),
        ).await.map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next()
            .ok_or_else(|| MessagingError::DatabaseError("Failed to record message".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| MessagingError::DatabaseError(format!("Failed to parse message row: {}", e)))
    }
}
